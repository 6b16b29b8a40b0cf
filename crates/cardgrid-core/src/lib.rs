#![forbid(unsafe_code)]

//! Core: geometry shared by the card grid engine and its hosts.
//!
//! # Role in cardgrid
//! `cardgrid-core` holds the plain value types that cross the boundary between
//! the layout engine (`cardgrid-layout`) and whatever renders it: cell-space
//! rectangles, pixel boxes, and margin/padding pairs. It has no behavior
//! beyond arithmetic on those values.

pub mod geometry;

pub use geometry::{GridRect, PixelBox, Spacing};
