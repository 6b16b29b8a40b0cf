//! The single entry point for layout data coming from a host.
//!
//! Host data is untrusted: sizes may be missing, fractional, negative, NaN or
//! wider than the grid. Everything is clamped into range here so the
//! algorithms downstream can assume non-negative cells, `w, h >= 1` and
//! `w <= cols`.

use rustc_hash::FxHashSet;

use crate::CompactType;
use crate::collision::collides;
use crate::compact::compact;
use crate::item::{LayoutItem, RawLayoutItem, UNBOUNDED};
use crate::params::ItemDefaults;

/// Normalize host layout data with default item sizes, then compact once.
pub fn re_layout(raw: &[RawLayoutItem], compact_type: CompactType, cols: u32) -> Vec<LayoutItem> {
    re_layout_with_defaults(raw, compact_type, cols, ItemDefaults::default())
}

/// Normalize host layout data, substituting `defaults` for unusable sizes,
/// then compact once.
///
/// Items without an id are named after their input index. When two items
/// share an id the first wins and later ones are dropped.
pub fn re_layout_with_defaults(
    raw: &[RawLayoutItem],
    compact_type: CompactType,
    cols: u32,
    defaults: ItemDefaults,
) -> Vec<LayoutItem> {
    let cols = cols.max(1);
    let mut seen = FxHashSet::default();
    let mut layout = Vec::with_capacity(raw.len());

    for (index, entry) in raw.iter().enumerate() {
        let id = match entry.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => index.to_string(),
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(message = "grid.normalize.duplicate_id", id = %id, index);
            continue;
        }
        layout.push(normalize_item(id, entry, defaults));
    }

    let layout = correct_bounds(&layout, cols);
    compact(&layout, compact_type, cols)
}

fn cell(value: Option<f64>, default: u32) -> u32 {
    match value {
        // `as` saturates; negatives land on 0.
        Some(v) if v.is_finite() => v.round() as u32,
        _ => default,
    }
}

fn size(value: Option<f64>, default: u32) -> u32 {
    cell(value, default).max(1)
}

fn normalize_item(id: String, entry: &RawLayoutItem, defaults: ItemDefaults) -> LayoutItem {
    let min_w = size(entry.min_w, 1);
    let min_h = size(entry.min_h, 1);
    let is_static = entry.is_static.unwrap_or(false);
    LayoutItem {
        id,
        x: cell(entry.x, 0),
        y: cell(entry.y, 0),
        w: size(entry.w, defaults.w),
        h: size(entry.h, defaults.h),
        min_w,
        max_w: cell(entry.max_w, UNBOUNDED).max(min_w),
        min_h,
        max_h: cell(entry.max_h, UNBOUNDED).max(min_h),
        is_static,
        is_draggable: !is_static && entry.is_draggable.unwrap_or(true),
        is_resizable: !is_static && entry.is_resizable.unwrap_or(true),
        group: entry.group.clone(),
        placeholder: false,
    }
}

/// Fit every item inside the columns and separate overlapping static items.
///
/// Widths are capped at `cols` and items hanging off the right edge are
/// shifted left. A static item overlapping an earlier static item is moved
/// down until it is clear.
pub fn correct_bounds(layout: &[LayoutItem], cols: u32) -> Vec<LayoutItem> {
    let mut out = layout.to_vec();
    let mut statics: Vec<usize> = Vec::new();
    for i in 0..out.len() {
        let item = &mut out[i];
        item.w = item.w.clamp(1, cols.max(1));
        item.x = item.x.min(cols.saturating_sub(item.w));
        if !out[i].is_static {
            continue;
        }
        while let Some(&s) = statics.iter().find(|&&s| collides(&out[s], &out[i])) {
            out[i].y = out[s].bottom();
        }
        statics.push(i);
    }
    out
}
