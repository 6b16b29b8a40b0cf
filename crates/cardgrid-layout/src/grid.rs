//! One grid instance and its drag/resize state machine.
//!
//! A [`Grid`] owns its committed layout. At most one interaction (a drag or a
//! resize of a single card) runs at a time; it starts from a snapshot of the
//! layout so a cancel can restore it exactly. Every update moves the card
//! through [`move_element`] or [`resize_element`] and recompacts.
//!
//! Drags can cross grids. The grid a card starts on is its *origin*: when the
//! pointer leaves, the origin [`detach`](Grid::detach)es the card and keeps
//! its snapshot until the drag settles. A grid the pointer enters
//! [`adopt`](Grid::adopt)s the card as a placeholder and
//! [`release`](Grid::release)s it again if the pointer moves on. The
//! [`CrossGridDrag`](crate::CrossGridDrag) session sequences these calls.
//!
//! # Lifecycle
//!
//! ```text
//! idle ── drag_start ──▶ holding ── drag_update* ──▶ drag_stop ──▶ idle
//!                          │  ▲                         (change reported
//!                   detach │  │ adopt                    if layout differs
//!                          ▼  │                          from snapshot)
//!                        detached ── drag_stop / drag_cancel ──▶ idle
//!
//! idle ── adopt ──▶ holding (visitor) ── release / drag_cancel ──▶ idle
//! ```

use cardgrid_core::geometry::{GridRect, PixelBox};
use serde::{Deserialize, Serialize};

use crate::compact::compact;
use crate::height::get_container_height;
use crate::item::{LayoutItem, RawLayoutItem, bottom, get_layout_item, layouts_equal, position_of};
use crate::movement::{MoveOptions, move_element};
use crate::normalize::re_layout_with_defaults;
use crate::params::{GridConfig, GridConfigError};
use crate::position::{calc_grid_item_position, calc_wh, calc_xy};
use crate::resize::resize_element;

/// Where the dragged card's top-left corner is, in container pixels, plus the
/// scroll offsets of the container's scrollable ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragPointer {
    pub left: f64,
    pub top: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl DragPointer {
    pub const fn new(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    #[must_use]
    pub const fn with_scroll(mut self, scroll_left: f64, scroll_top: f64) -> Self {
        self.scroll_left = scroll_left;
        self.scroll_top = scroll_top;
        self
    }
}

/// The in-progress drop target, for the host to draw as a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub item_id: String,
    pub cell: GridRect,
    pub pixels: PixelBox,
}

/// A committed layout that differs from the one captured when the interaction started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChange {
    pub grid_id: String,
    pub layout: Vec<LayoutItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InteractionKind {
    Drag,
    Resize,
}

#[derive(Debug, Clone)]
struct Interaction {
    kind: InteractionKind,
    item_id: String,
    /// Layout when the interaction reached this grid; restored on cancel.
    snapshot: Vec<LayoutItem>,
    /// Layout before the card was last adopted; restored on release.
    before_adopt: Option<Vec<LayoutItem>>,
    /// The card started on this grid.
    is_origin: bool,
    /// The card is currently part of this grid's layout.
    holds_item: bool,
}

/// One independently compacting grid.
#[derive(Debug, Clone)]
pub struct Grid {
    id: String,
    config: GridConfig,
    layout: Vec<LayoutItem>,
    interaction: Option<Interaction>,
    relayout_pending: bool,
}

impl Grid {
    /// Build a grid from host layout data.
    pub fn new(
        id: impl Into<String>,
        config: GridConfig,
        raw: &[RawLayoutItem],
    ) -> Result<Self, GridConfigError> {
        config.validate()?;
        let layout = re_layout_with_defaults(
            raw,
            config.compact_type,
            config.params.cols,
            config.item_defaults,
        );
        Ok(Self {
            id: id.into(),
            config,
            layout,
            interaction: None,
            relayout_pending: false,
        })
    }

    /// Build a grid from typed items. They are normalized like host data.
    pub fn with_items(
        id: impl Into<String>,
        config: GridConfig,
        items: &[LayoutItem],
    ) -> Result<Self, GridConfigError> {
        let raw: Vec<RawLayoutItem> = items.iter().map(RawLayoutItem::from).collect();
        Self::new(id, config, &raw)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn layout(&self) -> &[LayoutItem] {
        &self.layout
    }

    pub fn item(&self, item_id: &str) -> Option<&LayoutItem> {
        get_layout_item(&self.layout, item_id)
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Pixel height the container needs for the current layout.
    pub fn container_height(&self) -> f64 {
        get_container_height(&self.layout, &self.config.params)
    }

    /// Pixel box of one card.
    pub fn item_pixels(&self, item_id: &str) -> Option<PixelBox> {
        self.item(item_id)
            .map(|item| calc_grid_item_position(&self.config.params, item.x, item.y, item.w, item.h))
    }

    /// Replace the layout with new host data. Ignored (returns `false`) mid-interaction.
    pub fn set_layout(&mut self, raw: &[RawLayoutItem]) -> bool {
        if self.interaction.is_some() {
            tracing::debug!(message = "grid.set_layout.deferred", grid = %self.id);
            return false;
        }
        self.layout = self.normalized(raw);
        true
    }

    /// Swap configuration. The layout is revalidated now if idle, otherwise
    /// when the running interaction settles.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), GridConfigError> {
        config.validate()?;
        self.config = config;
        if self.interaction.is_some() {
            self.relayout_pending = true;
        } else {
            self.relayout();
        }
        Ok(())
    }

    /// Delete a card at the host's request. Ignored mid-interaction.
    pub fn remove_item(&mut self, item_id: &str) -> Option<LayoutItem> {
        if self.interaction.is_some() {
            return None;
        }
        let idx = position_of(&self.layout, item_id)?;
        let removed = self.layout.remove(idx);
        self.layout = self.compacted(&self.layout);
        tracing::debug!(message = "grid.item.removed", grid = %self.id, item = item_id);
        Some(removed)
    }

    /// The card being dragged or resized, as a drop-target preview.
    pub fn placeholder(&self) -> Option<Placeholder> {
        let interaction = self.interaction.as_ref().filter(|i| i.holds_item)?;
        let item = self.item(&interaction.item_id)?;
        Some(Placeholder {
            item_id: item.id.clone(),
            cell: item.rect(),
            pixels: calc_grid_item_position(&self.config.params, item.x, item.y, item.w, item.h),
        })
    }

    // ========================================================================
    // Drag
    // ========================================================================

    /// Begin dragging a card that lives on this grid.
    pub fn drag_start(&mut self, item_id: &str) -> bool {
        if self.interaction.is_some() {
            return false;
        }
        let Some(idx) = position_of(&self.layout, item_id) else {
            return false;
        };
        if self.layout[idx].is_static || !self.layout[idx].is_draggable {
            return false;
        }
        self.begin(InteractionKind::Drag, item_id, idx);
        tracing::debug!(message = "grid.drag.start", grid = %self.id, item = item_id);
        true
    }

    /// Move the dragged card under the pointer, displacing neighbours.
    pub fn drag_update(&mut self, item_id: &str, pointer: DragPointer) -> Option<Placeholder> {
        self.active(InteractionKind::Drag, item_id)?;
        let item = self.item(item_id)?;
        let (x, y) = self.cell_under(pointer, item.w);
        let outcome = move_element(&self.layout, item_id, x, y, self.move_options());
        self.layout = self.compacted(&outcome.layout);
        self.placeholder()
    }

    /// Commit the drag. Reports a change only if the layout differs from the
    /// snapshot taken when the drag reached this grid.
    pub fn drag_stop(&mut self, item_id: &str) -> Option<LayoutChange> {
        self.active(InteractionKind::Drag, item_id)?;
        let change = self.commit();
        tracing::debug!(
            message = "grid.drag.stop",
            grid = %self.id,
            item = item_id,
            changed = change.is_some()
        );
        change
    }

    /// Abandon the interaction and restore the snapshot verbatim.
    pub fn drag_cancel(&mut self) {
        let Some(interaction) = self.interaction.take() else {
            return;
        };
        self.layout = interaction.snapshot;
        tracing::debug!(message = "grid.interaction.cancel", grid = %self.id, item = %interaction.item_id);
        self.apply_pending_relayout();
    }

    /// Take the dragged card off this grid because the pointer moved to
    /// another one. The drag stays open so a cancel can restore it.
    pub fn detach(&mut self, item_id: &str) -> Option<LayoutItem> {
        let interaction = self.interaction.as_mut()?;
        if interaction.kind != InteractionKind::Drag
            || interaction.item_id != item_id
            || !interaction.holds_item
        {
            return None;
        }
        let idx = position_of(&self.layout, item_id)?;
        interaction.holds_item = false;
        let mut item = self.layout.remove(idx);
        item.placeholder = false;
        self.layout = self.compacted(&self.layout);
        tracing::debug!(message = "grid.item.removed", grid = %self.id, item = item_id);
        Some(item)
    }

    /// Take in a card dragged over from another grid, placed under the pointer
    /// as a placeholder.
    ///
    /// Accepted when idle, or when this grid is the card's origin and
    /// currently does not hold it.
    pub fn adopt(&mut self, mut item: LayoutItem, pointer: DragPointer) -> Option<Placeholder> {
        // The origin takes its card back into its old slot and group.
        let returning = match &self.interaction {
            None => None,
            Some(current) => {
                if current.kind != InteractionKind::Drag
                    || current.item_id != item.id
                    || current.holds_item
                {
                    return None;
                }
                let slot = position_of(&current.snapshot, &item.id);
                Some((slot, slot.and_then(|i| current.snapshot[i].group.clone())))
            }
        };
        let (slot, group) = match returning {
            Some((slot, group)) => {
                let before = self.layout.clone();
                if let Some(current) = self.interaction.as_mut() {
                    current.before_adopt = Some(before);
                    current.holds_item = true;
                }
                let len = self.layout.len();
                (slot.map_or(len, |i| i.min(len)), group)
            }
            None => {
                if position_of(&self.layout, &item.id).is_some() {
                    tracing::warn!(message = "grid.adopt.duplicate", grid = %self.id, item = %item.id);
                    return None;
                }
                self.interaction = Some(Interaction {
                    kind: InteractionKind::Drag,
                    item_id: item.id.clone(),
                    snapshot: self.layout.clone(),
                    before_adopt: Some(self.layout.clone()),
                    is_origin: false,
                    holds_item: true,
                });
                (self.layout.len(), Some(self.id.clone()))
            }
        };

        let cols = self.config.params.cols;
        item.w = item.w.clamp(1, cols);
        item.x = 0;
        item.y = bottom(&self.layout);
        item.group = group;
        item.placeholder = true;
        let item_id = item.id.clone();
        let (x, y) = self.cell_under(pointer, item.w);
        self.layout.insert(slot, item);

        let outcome = move_element(&self.layout, &item_id, x, y, self.move_options());
        self.layout = self.compacted(&outcome.layout);
        tracing::debug!(message = "grid.adopt", grid = %self.id, item = %item_id, x, y);
        self.placeholder()
    }

    /// Hand back an adopted card: restore the layout from before it arrived.
    pub fn release(&mut self, item_id: &str) -> bool {
        let Some(interaction) = self.interaction.as_mut() else {
            return false;
        };
        if interaction.item_id != item_id || !interaction.holds_item {
            return false;
        }
        let Some(before) = interaction.before_adopt.take() else {
            return false;
        };
        interaction.holds_item = false;
        let is_origin = interaction.is_origin;
        self.layout = before;
        if !is_origin {
            self.interaction = None;
            self.apply_pending_relayout();
        }
        tracing::debug!(message = "grid.release", grid = %self.id, item = item_id);
        true
    }

    // ========================================================================
    // Resize
    // ========================================================================

    pub fn resize_start(&mut self, item_id: &str) -> bool {
        if self.interaction.is_some() {
            return false;
        }
        let Some(idx) = position_of(&self.layout, item_id) else {
            return false;
        };
        if self.layout[idx].is_static || !self.layout[idx].is_resizable {
            return false;
        }
        self.begin(InteractionKind::Resize, item_id, idx);
        tracing::debug!(message = "grid.resize.start", grid = %self.id, item = item_id);
        true
    }

    /// Resize the card to `w` x `h` cells.
    pub fn resize_update(&mut self, item_id: &str, w: u32, h: u32) -> Option<Placeholder> {
        self.active(InteractionKind::Resize, item_id)?;
        let outcome = resize_element(
            &self.layout,
            item_id,
            w,
            h,
            &self.config.params,
            self.config.compact_type,
            self.config.prevent_collision,
        );
        self.layout = self.compacted(&outcome.layout);
        self.placeholder()
    }

    /// Resize the card to the cell size nearest `width` x `height` pixels.
    pub fn resize_update_pixels(
        &mut self,
        item_id: &str,
        width: f64,
        height: f64,
    ) -> Option<Placeholder> {
        let item = self.item(item_id)?;
        let (w, h) = calc_wh(&self.config.params, width, height, item.x, item.y);
        self.resize_update(item_id, w, h)
    }

    pub fn resize_stop(&mut self, item_id: &str) -> Option<LayoutChange> {
        self.active(InteractionKind::Resize, item_id)?;
        let change = self.commit();
        tracing::debug!(
            message = "grid.resize.stop",
            grid = %self.id,
            item = item_id,
            changed = change.is_some()
        );
        change
    }

    pub fn resize_cancel(&mut self) {
        self.drag_cancel();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn begin(&mut self, kind: InteractionKind, item_id: &str, idx: usize) {
        let snapshot = self.layout.clone();
        self.layout[idx].placeholder = true;
        self.interaction = Some(Interaction {
            kind,
            item_id: item_id.to_owned(),
            snapshot,
            before_adopt: None,
            is_origin: true,
            holds_item: true,
        });
    }

    /// The running interaction, if it is of `kind` and concerns `item_id`.
    fn active(&self, kind: InteractionKind, item_id: &str) -> Option<&Interaction> {
        self.interaction
            .as_ref()
            .filter(|i| i.kind == kind && i.item_id == item_id)
    }

    fn commit(&mut self) -> Option<LayoutChange> {
        let interaction = self.interaction.take()?;
        for item in &mut self.layout {
            item.placeholder = false;
        }
        self.layout = self.compacted(&self.layout);
        self.apply_pending_relayout();
        (!layouts_equal(&self.layout, &interaction.snapshot)).then(|| LayoutChange {
            grid_id: self.id.clone(),
            layout: self.layout.clone(),
        })
    }

    fn cell_under(&self, pointer: DragPointer, w: u32) -> (u32, u32) {
        calc_xy(
            &self.config.params,
            pointer.top + pointer.scroll_top,
            pointer.left + pointer.scroll_left,
            w,
        )
    }

    fn move_options(&self) -> MoveOptions {
        MoveOptions {
            is_user_action: true,
            prevent_collision: self.config.prevent_collision,
            compact_type: self.config.compact_type,
            cols: self.config.params.cols,
        }
    }

    fn compacted(&self, layout: &[LayoutItem]) -> Vec<LayoutItem> {
        compact(layout, self.config.compact_type, self.config.params.cols)
    }

    fn normalized(&self, raw: &[RawLayoutItem]) -> Vec<LayoutItem> {
        re_layout_with_defaults(
            raw,
            self.config.compact_type,
            self.config.params.cols,
            self.config.item_defaults,
        )
    }

    fn relayout(&mut self) {
        let raw: Vec<RawLayoutItem> = self.layout.iter().map(RawLayoutItem::from).collect();
        self.layout = self.normalized(&raw);
    }

    fn apply_pending_relayout(&mut self) {
        if std::mem::take(&mut self.relayout_pending) {
            self.relayout();
        }
    }
}
