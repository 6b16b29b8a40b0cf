//! Card placement records and layout-level queries.
//!
//! A layout is a plain `[LayoutItem]` slice. Order is significant: collision
//! enumeration reports hits in stored order, compaction preserves it, and
//! layout equality compares index by index.

use cardgrid_core::geometry::GridRect;
use serde::{Deserialize, Serialize};

use crate::CompactType;

/// Upper bound used for "no maximum" on item size limits.
pub const UNBOUNDED: u32 = u32::MAX;

fn unbounded() -> u32 {
    UNBOUNDED
}

fn one() -> u32 {
    1
}

fn enabled() -> bool {
    true
}

/// One card's placement on a grid.
///
/// Equality ignores the transient [`placeholder`](Self::placeholder) marker so
/// a mid-drag layout compares equal to its committed form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Unique within one grid, stable for the card's lifetime.
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default = "one")]
    pub min_w: u32,
    #[serde(default = "unbounded")]
    pub max_w: u32,
    #[serde(default = "one")]
    pub min_h: u32,
    #[serde(default = "unbounded")]
    pub max_h: u32,
    /// Never moved, resized, or displaced, but still an obstacle.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default = "enabled")]
    pub is_draggable: bool,
    #[serde(default = "enabled")]
    pub is_resizable: bool,
    /// Owning grid once the card has crossed grids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Set while the card's position is provisional (mid-drag or mid-resize).
    #[serde(skip)]
    pub placeholder: bool,
}

impl LayoutItem {
    /// Create a movable item with default size limits.
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: 1,
            max_w: UNBOUNDED,
            min_h: 1,
            max_h: UNBOUNDED,
            is_static: false,
            is_draggable: true,
            is_resizable: true,
            group: None,
            placeholder: false,
        }
    }

    /// Pin the item in place. Static items are neither draggable nor resizable.
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.is_static = true;
        self.is_draggable = false;
        self.is_resizable = false;
        self
    }

    #[must_use]
    pub fn min_size(mut self, min_w: u32, min_h: u32) -> Self {
        self.min_w = min_w;
        self.min_h = min_h;
        self
    }

    #[must_use]
    pub fn max_size(mut self, max_w: u32, max_h: u32) -> Self {
        self.max_w = max_w;
        self.max_h = max_h;
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The cells this item covers.
    #[inline]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    /// Row just below the item.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Column just right of the item.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
}

impl PartialEq for LayoutItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.x == other.x
            && self.y == other.y
            && self.w == other.w
            && self.h == other.h
            && self.min_w == other.min_w
            && self.max_w == other.max_w
            && self.min_h == other.min_h
            && self.max_h == other.max_h
            && self.is_static == other.is_static
            && self.is_draggable == other.is_draggable
            && self.is_resizable == other.is_resizable
            && self.group == other.group
    }
}

impl Eq for LayoutItem {}

/// Untyped item as received from a host, before normalization.
///
/// Every numeric field may be missing or non-finite; [`crate::re_layout`]
/// collapses those to configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLayoutItem {
    pub id: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub min_w: Option<f64>,
    pub max_w: Option<f64>,
    pub min_h: Option<f64>,
    pub max_h: Option<f64>,
    #[serde(rename = "static")]
    pub is_static: Option<bool>,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
    pub group: Option<String>,
}

impl From<&LayoutItem> for RawLayoutItem {
    fn from(item: &LayoutItem) -> Self {
        let limit = |v: u32| (v != UNBOUNDED).then_some(f64::from(v));
        Self {
            id: Some(item.id.clone()),
            x: Some(f64::from(item.x)),
            y: Some(f64::from(item.y)),
            w: Some(f64::from(item.w)),
            h: Some(f64::from(item.h)),
            min_w: Some(f64::from(item.min_w)),
            max_w: limit(item.max_w),
            min_h: Some(f64::from(item.min_h)),
            max_h: limit(item.max_h),
            is_static: Some(item.is_static),
            is_draggable: Some(item.is_draggable),
            is_resizable: Some(item.is_resizable),
            group: item.group.clone(),
        }
    }
}

/// Layout equality: same length and pairwise-equal items, ignoring transient markers.
pub fn layouts_equal(a: &[LayoutItem], b: &[LayoutItem]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Lowest occupied row boundary, `0` for an empty layout.
pub fn bottom(layout: &[LayoutItem]) -> u32 {
    layout.iter().map(LayoutItem::bottom).max().unwrap_or(0)
}

pub fn get_layout_item<'a>(layout: &'a [LayoutItem], id: &str) -> Option<&'a LayoutItem> {
    layout.iter().find(|item| item.id == id)
}

pub(crate) fn position_of(layout: &[LayoutItem], id: &str) -> Option<usize> {
    layout.iter().position(|item| item.id == id)
}

pub fn get_statics(layout: &[LayoutItem]) -> Vec<&LayoutItem> {
    layout.iter().filter(|item| item.is_static).collect()
}

/// Indices of `layout` in compaction order.
///
/// Vertical sorts by `(y, x)`, horizontal by `(x, y)`; ties keep stored order.
/// `None` keeps stored order.
pub(crate) fn sorted_indices(layout: &[LayoutItem], compact_type: CompactType) -> Vec<usize> {
    let mut order: Vec<usize> = (0..layout.len()).collect();
    match compact_type {
        CompactType::Vertical => order.sort_by_key(|&i| (layout[i].y, layout[i].x)),
        CompactType::Horizontal => order.sort_by_key(|&i| (layout[i].x, layout[i].y)),
        CompactType::None => {}
    }
    order
}

/// Items in compaction order. See [`CompactType`] for the ordering per mode.
pub fn sort_layout_items(layout: &[LayoutItem], compact_type: CompactType) -> Vec<&LayoutItem> {
    sorted_indices(layout, compact_type)
        .into_iter()
        .map(|i| &layout[i])
        .collect()
}
