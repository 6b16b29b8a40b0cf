//! Relocating one card and displacing whatever it lands on.
//!
//! Displacement is a worklist: the moved card seeds the queue, every card it
//! overlaps is pushed past it along the compaction axis and queued in turn,
//! until nothing overlaps. A displaced card only ever moves down (or right,
//! for horizontal grids), so the cascade terminates.

use std::collections::VecDeque;

use crate::CompactType;
use crate::collision::{collides, collision_indices};
use crate::item::{LayoutItem, position_of};

/// Knobs for [`move_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// A direct user gesture, as opposed to a follow-up move issued by the engine.
    /// Only user actions are reported as `grid.move` events.
    pub is_user_action: bool,
    /// Reject the move instead of displacing neighbours.
    pub prevent_collision: bool,
    pub compact_type: CompactType,
    pub cols: u32,
}

/// Result of a move or resize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub layout: Vec<LayoutItem>,
    /// `false` when the request was rejected and the item kept its previous geometry.
    pub accepted: bool,
    /// Ids of neighbours pushed out of the way, in displacement order.
    pub displaced: Vec<String>,
}

impl MoveOutcome {
    pub(crate) fn rejected(layout: &[LayoutItem]) -> Self {
        Self {
            layout: layout.to_vec(),
            accepted: false,
            displaced: Vec::new(),
        }
    }
}

/// Move item `id` so its top-left corner sits at `(x, y)`.
///
/// `x` is clamped into `[0, cols - w]`. The move is rejected, leaving the
/// layout untouched, when the item is missing or static, when the target
/// overlaps a static item, or when `prevent_collision` is set and the target
/// overlaps anything.
pub fn move_element(
    layout: &[LayoutItem],
    id: &str,
    x: u32,
    y: u32,
    opts: MoveOptions,
) -> MoveOutcome {
    let Some(idx) = position_of(layout, id) else {
        return MoveOutcome::rejected(layout);
    };
    let current = &layout[idx];
    if current.is_static {
        return MoveOutcome::rejected(layout);
    }

    let mut moved = current.clone();
    moved.x = x.min(opts.cols.saturating_sub(moved.w));
    moved.y = y;
    if moved.x == current.x && moved.y == current.y {
        return MoveOutcome {
            layout: layout.to_vec(),
            accepted: true,
            displaced: Vec::new(),
        };
    }

    let hits = collision_indices(layout, &moved);
    let blocked = if opts.prevent_collision {
        !hits.is_empty()
    } else {
        hits.iter().any(|&i| layout[i].is_static)
    };
    if blocked {
        tracing::trace!(message = "grid.move.rejected", item = id, x = moved.x, y = moved.y);
        return MoveOutcome::rejected(layout);
    }

    let mut out = layout.to_vec();
    let (to_x, to_y) = (moved.x, moved.y);
    out[idx] = moved;
    let displaced = displace_colliders(&mut out, idx, opts.compact_type, opts.cols);

    if opts.is_user_action {
        tracing::debug!(
            message = "grid.move",
            item = id,
            x = to_x,
            y = to_y,
            displaced = displaced.len()
        );
    }

    MoveOutcome {
        layout: out,
        accepted: true,
        displaced,
    }
}

/// Push every card overlapping `out[mover]` out of the way, cascading.
///
/// `out[mover]` itself never moves and must not overlap a static item.
/// Returns the ids of displaced cards in displacement order, one entry per
/// displacement.
pub(crate) fn displace_colliders(
    out: &mut [LayoutItem],
    mover: usize,
    compact_type: CompactType,
    cols: u32,
) -> Vec<String> {
    let n = out.len();
    // A card can be queued again after yielding to a static or being hit by
    // a later pusher, so the bound is quadratic rather than `n`.
    let step_cap = n.saturating_mul(n).saturating_add(n);
    let mut displaced = Vec::new();
    let mut queue = VecDeque::from([mover]);
    let mut steps = 0usize;

    while let Some(pusher) = queue.pop_front() {
        steps += 1;
        assert!(
            steps <= step_cap,
            "displacement cascade exceeded {step_cap} steps for {n} items; displacement is not monotonic"
        );

        for hit in collision_indices(out, &out[pusher]) {
            if !collides(&out[hit], &out[pusher]) {
                continue;
            }
            if out[hit].is_static || hit == mover {
                // The pusher yields to a fixed obstacle and is re-examined from its new spot.
                let obstacle = out[hit].clone();
                push_past(&mut out[pusher], &obstacle, compact_type, cols);
                displaced.push(out[pusher].id.clone());
                queue.push_back(pusher);
                break;
            }
            let anchor = out[pusher].clone();
            push_past(&mut out[hit], &anchor, compact_type, cols);
            tracing::trace!(
                message = "grid.displace",
                item = %out[hit].id,
                by = %anchor.id,
                x = out[hit].x,
                y = out[hit].y
            );
            displaced.push(out[hit].id.clone());
            queue.push_back(hit);
        }
    }
    displaced
}

/// Move `item` just past `anchor` along the compaction axis.
///
/// Horizontal grids push right while the item still fits the row and fall
/// back to pushing down otherwise. Either way the coordinate only grows.
fn push_past(item: &mut LayoutItem, anchor: &LayoutItem, compact_type: CompactType, cols: u32) {
    match compact_type {
        CompactType::Horizontal if anchor.right().saturating_add(item.w) <= cols => {
            item.x = anchor.right();
        }
        _ => item.y = anchor.bottom(),
    }
}
