//! Resizing one card from its top-left anchor.
//!
//! With collision prevention the card is clipped to the nearest colliding
//! neighbour's leading edge, each axis on its own. That can leave space unused
//! when the only obstacle sits diagonally off the growing corner; hosts rely on
//! this exact clipping, so it is kept as is. Without collision prevention the
//! new size is applied and overlapped neighbours are displaced like a move.

use crate::CompactType;
use crate::collision::get_all_collisions;
use crate::item::{LayoutItem, position_of};
use crate::movement::{MoveOutcome, displace_colliders};
use crate::params::PositionParams;
use crate::position::get_wh;

/// Resize item `id` to `w` x `h` cells.
///
/// The requested size is first bounded by the item's min/max limits and the
/// grid edges (see [`get_wh`]). Rejected for missing or static items, and
/// for sizes that would overlap a static item when `prevent_collision` is off.
pub fn resize_element(
    layout: &[LayoutItem],
    id: &str,
    w: u32,
    h: u32,
    params: &PositionParams,
    compact_type: CompactType,
    prevent_collision: bool,
) -> MoveOutcome {
    let Some(idx) = position_of(layout, id) else {
        return MoveOutcome::rejected(layout);
    };
    let current = &layout[idx];
    if current.is_static {
        return MoveOutcome::rejected(layout);
    }

    let mut resized = current.clone();
    resized.w = w;
    resized.h = h;
    (resized.w, resized.h) = get_wh(&resized, params);
    if resized.w == current.w && resized.h == current.h {
        return MoveOutcome {
            layout: layout.to_vec(),
            accepted: true,
            displaced: Vec::new(),
        };
    }

    let hits = get_all_collisions(layout, &resized);
    if prevent_collision {
        if !hits.is_empty() {
            clip_to_nearest_edges(&mut resized, &hits);
        }
        let mut out = layout.to_vec();
        out[idx] = resized;
        return MoveOutcome {
            layout: out,
            accepted: true,
            displaced: Vec::new(),
        };
    }

    if hits.iter().any(|hit| hit.is_static) {
        tracing::trace!(message = "grid.resize.rejected", item = id, w = resized.w, h = resized.h);
        return MoveOutcome::rejected(layout);
    }

    let mut out = layout.to_vec();
    out[idx] = resized;
    let displaced = displace_colliders(&mut out, idx, compact_type, params.cols);
    MoveOutcome {
        layout: out,
        accepted: true,
        displaced,
    }
}

/// Shrink `item` so it stops at the closest collider starting right of / below it.
fn clip_to_nearest_edges(item: &mut LayoutItem, hits: &[&LayoutItem]) {
    let least_x = hits.iter().filter(|hit| hit.x > item.x).map(|hit| hit.x).min();
    let least_y = hits.iter().filter(|hit| hit.y > item.y).map(|hit| hit.y).min();
    if let Some(edge) = least_x {
        item.w = edge - item.x;
    }
    if let Some(edge) = least_y {
        item.h = edge - item.y;
    }
}
