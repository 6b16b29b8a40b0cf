#![forbid(unsafe_code)]

//! Cardgrid Layout
//!
//! A draggable, resizable card grid: cards occupy whole cells on a grid with
//! a fixed column count and unbounded rows, and the engine keeps them from
//! overlapping while the user moves or resizes one.
//!
//! # Key Components
//!
//! - [`compact`] - Remove vertical or horizontal gaps, statics stay put
//! - [`move_element`] - Relocate one card, cascading displacement onto neighbours
//! - [`resize_element`] - Resize one card within its limits and the grid bounds
//! - [`re_layout`] - Normalize untrusted host data into a valid layout
//! - [`Grid`] - One grid instance with its drag/resize state machine
//! - [`GroupRegistry`] / [`CrossGridDrag`] - Dragging a card between grids
//!
//! # How it fits together
//! Every algorithm takes a layout slice and returns a new `Vec`; only
//! [`Grid`] owns state. A host forwards pointer positions to
//! [`Grid::drag_update`], which maps them to a cell, moves the card there,
//! recompacts, and hands back a [`Placeholder`] to draw. Geometry never fails:
//! bad input is clamped once, on the way in.

pub mod collision;
pub mod compact;
pub mod grid;
pub mod group;
pub mod height;
pub mod item;
pub mod movement;
pub mod normalize;
pub mod params;
pub mod position;
pub mod resize;

pub use cardgrid_core::geometry::{GridRect, PixelBox, Spacing};

pub use collision::{collides, get_all_collisions, get_first_collision};
pub use compact::compact;
pub use grid::{DragPointer, Grid, LayoutChange, Placeholder};
pub use group::{CrossGridDrag, GridHandle, GroupRegistry, grid_handle};
pub use height::get_container_height;
pub use item::{
    LayoutItem, RawLayoutItem, UNBOUNDED, bottom, get_layout_item, get_statics, layouts_equal,
    sort_layout_items,
};
pub use movement::{MoveOptions, MoveOutcome, move_element};
pub use normalize::{correct_bounds, re_layout, re_layout_with_defaults};
pub use params::{CompactType, GridConfig, GridConfigError, ItemDefaults, PositionParams};
pub use position::{calc_col_width, calc_grid_item_position, calc_wh, calc_xy, get_wh};
pub use resize::resize_element;
