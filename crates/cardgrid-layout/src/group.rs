//! Coordination between independently compacting grids.
//!
//! The host builds one [`GroupRegistry`] and registers every grid it shows.
//! The registry keeps weak handles only: dropping a grid is enough to retire
//! it, and stale entries are skipped with a warning rather than treated as
//! errors. A [`CrossGridDrag`] session then walks a single card across grids:
//!
//! - the origin grid gives the card up once, the first time the pointer leaves;
//! - whichever grid the pointer entered last holds the card as a placeholder;
//!   every grid left behind releases it;
//! - a drop commits the holder and the origin, a cancel restores both.
//!
//! Hover marks are cleared when the session ends, whichever way it ends.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::grid::{DragPointer, Grid, LayoutChange, Placeholder};
use crate::item::LayoutItem;

/// Shared, host-owned handle to a grid.
pub type GridHandle = Rc<RefCell<Grid>>;

/// Wrap a grid for registration.
pub fn grid_handle(grid: Grid) -> GridHandle {
    Rc::new(RefCell::new(grid))
}

/// Which grids exist and which ones the current drag has hovered.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    grids: FxHashMap<String, Weak<RefCell<Grid>>>,
    hovered: Vec<String>,
    anonymous: u64,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `grid_id`, replacing any previous entry.
    pub fn register(&mut self, grid_id: impl Into<String>, handle: &GridHandle) {
        let grid_id = grid_id.into();
        tracing::debug!(message = "registry.register", grid = %grid_id);
        self.grids.insert(grid_id, Rc::downgrade(handle));
    }

    /// Register `handle` under the grid's own id. A grid with an empty id is
    /// renamed to the next anonymous group first. Returns the id used, or
    /// `None` if the grid is borrowed elsewhere.
    pub fn register_grid(&mut self, handle: &GridHandle) -> Option<String> {
        let Ok(mut grid) = handle.try_borrow_mut() else {
            tracing::warn!(message = "registry.register.grid_busy");
            return None;
        };
        if grid.id().is_empty() {
            grid.set_id(self.next_anonymous_group());
        }
        let grid_id = grid.id().to_owned();
        drop(grid);
        self.register(grid_id.clone(), handle);
        Some(grid_id)
    }

    /// Forget `grid_id`. Returns `true` if it was registered.
    pub fn unregister(&mut self, grid_id: &str) -> bool {
        self.hovered.retain(|id| id != grid_id);
        self.grids.remove(grid_id).is_some()
    }

    pub fn contains(&self, grid_id: &str) -> bool {
        self.grids.contains_key(grid_id)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Live handle for `grid_id`, or `None` if unknown or already dropped.
    pub fn resolve(&self, grid_id: &str) -> Option<GridHandle> {
        let handle = self.grids.get(grid_id)?.upgrade();
        if handle.is_none() {
            tracing::warn!(message = "registry.stale_entry", grid = grid_id);
        }
        handle
    }

    /// Record that the current drag has visited `grid_id`.
    pub fn mark_hovered(&mut self, grid_id: &str) {
        if !self.hovered.iter().any(|id| id == grid_id) {
            self.hovered.push(grid_id.to_owned());
        }
    }

    pub fn clear_hovered(&mut self) {
        self.hovered.clear();
    }

    /// Grids visited by the current drag, in first-visit order.
    pub fn hovered(&self) -> &[String] {
        &self.hovered
    }

    /// Fresh name for a grid the host did not name: `group-1`, `group-2`, ...
    pub fn next_anonymous_group(&mut self) -> String {
        self.anonymous += 1;
        format!("group-{}", self.anonymous)
    }

    /// Run `f` against a live, unborrowed grid. Stale or busy grids are skipped.
    fn with_grid<R>(&self, grid_id: &str, f: impl FnOnce(&mut Grid) -> R) -> Option<R> {
        let handle = self.resolve(grid_id)?;
        let Ok(mut grid) = handle.try_borrow_mut() else {
            tracing::warn!(message = "registry.grid_busy", grid = grid_id);
            return None;
        };
        Some(f(&mut grid))
    }
}

/// One card being dragged, possibly across several grids.
#[derive(Debug)]
pub struct CrossGridDrag {
    item: LayoutItem,
    origin: String,
    /// Grid currently holding the card, if any.
    holder: Option<String>,
    origin_released: bool,
}

impl CrossGridDrag {
    /// Start dragging `item_id` on `grid_id`. `None` if the grid is unknown or
    /// refuses the drag.
    pub fn begin(registry: &mut GroupRegistry, grid_id: &str, item_id: &str) -> Option<Self> {
        let item = registry.with_grid(grid_id, |grid| {
            if grid.drag_start(item_id) {
                grid.item(item_id).cloned()
            } else {
                None
            }
        })??;
        registry.clear_hovered();
        registry.mark_hovered(grid_id);
        Some(Self {
            item,
            origin: grid_id.to_owned(),
            holder: Some(grid_id.to_owned()),
            origin_released: false,
        })
    }

    pub fn item_id(&self) -> &str {
        &self.item.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Grid currently holding the card as a placeholder.
    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    /// Whether the origin grid has given the card up.
    pub fn origin_released(&self) -> bool {
        self.origin_released
    }

    /// Pointer over `grid_id`. Moves the card there if it is a different grid
    /// than the current holder, then drags it under the pointer.
    pub fn hover(
        &mut self,
        registry: &mut GroupRegistry,
        grid_id: &str,
        pointer: DragPointer,
    ) -> Option<Placeholder> {
        if self.holder.as_deref() == Some(grid_id) {
            let item_id = self.item.id.clone();
            let placeholder =
                registry.with_grid(grid_id, |grid| grid.drag_update(&item_id, pointer))?;
            self.refresh(registry);
            return placeholder;
        }

        self.leave_holder(registry);
        let item = self.item.clone();
        let placeholder = registry.with_grid(grid_id, |grid| grid.adopt(item, pointer)).flatten();
        if placeholder.is_some() {
            self.holder = Some(grid_id.to_owned());
            registry.mark_hovered(grid_id);
            self.refresh(registry);
            tracing::debug!(message = "drag.enter", grid = grid_id, item = %self.item.id);
        }
        placeholder
    }

    /// Pointer over no grid: whoever holds the card gives it back.
    pub fn leave(&mut self, registry: &mut GroupRegistry) {
        self.leave_holder(registry);
    }

    /// Commit the drag. Returns the change of every grid whose committed
    /// layout differs from its snapshot. Dropping outside every grid cancels.
    pub fn drop(self, registry: &mut GroupRegistry) -> Vec<LayoutChange> {
        let Some(holder) = self.holder.clone() else {
            self.cancel(registry);
            return Vec::new();
        };
        let item_id = self.item.id.as_str();
        let mut changes = Vec::new();
        changes.extend(registry.with_grid(&holder, |grid| grid.drag_stop(item_id)).flatten());
        if holder != self.origin {
            changes.extend(
                registry
                    .with_grid(&self.origin, |grid| grid.drag_stop(item_id))
                    .flatten(),
            );
        }
        registry.clear_hovered();
        tracing::debug!(
            message = "drag.drop",
            item = item_id,
            grid = %holder,
            changes = changes.len()
        );
        changes
    }

    /// Abandon the drag: the holder releases the card and the origin is
    /// restored to its snapshot.
    pub fn cancel(self, registry: &mut GroupRegistry) {
        if let Some(holder) = self.holder.as_deref().filter(|h| *h != self.origin) {
            let item_id = self.item.id.as_str();
            registry.with_grid(holder, |grid| grid.drag_cancel());
            tracing::trace!(message = "drag.release", grid = holder, item = item_id);
        }
        registry.with_grid(&self.origin, Grid::drag_cancel);
        registry.clear_hovered();
        tracing::debug!(message = "drag.cancel", item = %self.item.id, origin = %self.origin);
    }

    fn leave_holder(&mut self, registry: &mut GroupRegistry) {
        let Some(holder) = self.holder.take() else {
            return;
        };
        let item_id = self.item.id.clone();
        if holder == self.origin && !self.origin_released {
            if let Some(item) = registry.with_grid(&holder, |grid| grid.detach(&item_id)).flatten() {
                self.item = item;
            }
            self.origin_released = true;
        } else {
            registry.with_grid(&holder, |grid| grid.release(&item_id));
        }
    }

    /// Keep the carried copy in step with the holder so sizes survive transfers.
    fn refresh(&mut self, registry: &GroupRegistry) {
        let Some(holder) = self.holder.as_deref() else {
            return;
        };
        let item_id = self.item.id.as_str();
        if let Some(item) = registry
            .with_grid(holder, |grid| grid.item(item_id).cloned())
            .flatten()
        {
            self.item = item;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GridConfig;

    fn handle(id: &str, items: &[LayoutItem]) -> GridHandle {
        grid_handle(Grid::with_items(id, GridConfig::default(), items).expect("valid config"))
    }

    #[test]
    fn anonymous_groups_count_up() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.next_anonymous_group(), "group-1");
        assert_eq!(registry.next_anonymous_group(), "group-2");
    }

    #[test]
    fn unnamed_grids_get_anonymous_ids() {
        let mut registry = GroupRegistry::new();
        let named = handle("left", &[]);
        let unnamed = handle("", &[LayoutItem::new("a", 0, 0, 1, 1)]);
        let other = handle("", &[]);
        assert_eq!(registry.register_grid(&named).as_deref(), Some("left"));
        assert_eq!(registry.register_grid(&unnamed).as_deref(), Some("group-1"));
        assert_eq!(registry.register_grid(&other).as_deref(), Some("group-2"));
        assert_eq!(unnamed.borrow().id(), "group-1");
        assert!(registry.resolve("group-1").is_some_and(|g| Rc::ptr_eq(&g, &unnamed)));

        let busy = handle("", &[]);
        let _guard = busy.borrow_mut();
        assert_eq!(registry.register_grid(&busy), None);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn dropped_grids_no_longer_resolve() {
        let mut registry = GroupRegistry::new();
        let g = handle("g", &[]);
        registry.register("g", &g);
        assert!(registry.resolve("g").is_some());
        drop(g);
        assert!(registry.contains("g"));
        assert!(registry.resolve("g").is_none());
        assert!(registry.unregister("g"));
        assert!(!registry.unregister("g"));
        assert!(registry.is_empty());
    }

    #[test]
    fn hover_marks_are_unique_and_clearable() {
        let mut registry = GroupRegistry::new();
        registry.mark_hovered("a");
        registry.mark_hovered("b");
        registry.mark_hovered("a");
        assert_eq!(registry.hovered(), ["a", "b"]);
        registry.unregister("a");
        assert_eq!(registry.hovered(), ["b"]);
        registry.clear_hovered();
        assert!(registry.hovered().is_empty());
    }

    #[test]
    fn begin_requires_live_grid_and_draggable_item() {
        let mut registry = GroupRegistry::new();
        assert!(CrossGridDrag::begin(&mut registry, "g", "x").is_none());
        let g = handle("g", &[LayoutItem::new("s", 0, 0, 1, 1).pinned()]);
        registry.register("g", &g);
        assert!(CrossGridDrag::begin(&mut registry, "g", "s").is_none());
        assert!(registry.hovered().is_empty());
    }

    #[test]
    fn busy_grid_is_skipped() {
        let mut registry = GroupRegistry::new();
        let g = handle("g", &[LayoutItem::new("x", 0, 0, 1, 1)]);
        registry.register("g", &g);
        let _guard = g.borrow();
        assert!(CrossGridDrag::begin(&mut registry, "g", "x").is_none());
    }

    #[test]
    fn drop_outside_every_grid_cancels() {
        let mut registry = GroupRegistry::new();
        let g1 = handle("g1", &[LayoutItem::new("x", 0, 0, 2, 1)]);
        registry.register("g1", &g1);
        let before = g1.borrow().layout().to_vec();

        let mut drag = CrossGridDrag::begin(&mut registry, "g1", "x").expect("drag starts");
        drag.leave(&mut registry);
        assert!(g1.borrow().layout().is_empty());
        assert_eq!(drag.holder(), None);

        assert!(drag.drop(&mut registry).is_empty());
        assert_eq!(g1.borrow().layout(), before.as_slice());
        assert!(!g1.borrow().is_interacting());
        assert!(registry.hovered().is_empty());
    }
}
