//! Gap removal.
//!
//! Static items are laid down first as fixed obstacles. Movable items are then
//! placed one at a time in compaction order; each slides toward the origin one
//! cell at a time until the next step would hit something already placed, and
//! is pushed past anything it still overlaps. The result keeps the input's
//! stored order and every non-geometric field.

use crate::CompactType;
use crate::collision::collides;
use crate::item::{LayoutItem, sorted_indices};

/// Compact `layout` toward the origin along `compact_type`'s axis.
///
/// Idempotent: compacting an already compacted layout changes nothing.
/// `CompactType::None` returns the layout unchanged.
pub fn compact(layout: &[LayoutItem], compact_type: CompactType, cols: u32) -> Vec<LayoutItem> {
    let mut out = layout.to_vec();
    if compact_type == CompactType::None {
        return out;
    }

    let mut placed: Vec<usize> = (0..out.len()).filter(|&i| out[i].is_static).collect();
    for i in sorted_indices(layout, compact_type) {
        if out[i].is_static {
            continue;
        }
        let mut item = out[i].clone();
        match compact_type {
            CompactType::Vertical => compact_vertical(&out, &placed, &mut item),
            CompactType::Horizontal => compact_horizontal(&out, &placed, &mut item, cols),
            CompactType::None => {}
        }
        out[i] = item;
        placed.push(i);
    }
    out
}

fn first_hit<'a>(
    out: &'a [LayoutItem],
    placed: &[usize],
    probe: &LayoutItem,
) -> Option<&'a LayoutItem> {
    placed
        .iter()
        .map(|&i| &out[i])
        .find(|other| collides(other, probe))
}

fn compact_vertical(out: &[LayoutItem], placed: &[usize], item: &mut LayoutItem) {
    // Rows below every placed item are empty, so the slide can start there.
    let floor = placed.iter().map(|&i| out[i].bottom()).max().unwrap_or(0);
    item.y = item.y.min(floor);
    while item.y > 0 {
        item.y -= 1;
        if first_hit(out, placed, item).is_some() {
            item.y += 1;
            break;
        }
    }
    while let Some(hit) = first_hit(out, placed, item) {
        item.y = hit.bottom();
    }
}

fn compact_horizontal(out: &[LayoutItem], placed: &[usize], item: &mut LayoutItem, cols: u32) {
    item.x = item.x.min(cols.saturating_sub(item.w));
    while item.x > 0 {
        item.x -= 1;
        if first_hit(out, placed, item).is_some() {
            item.x += 1;
            break;
        }
    }
    while let Some(hit) = first_hit(out, placed, item) {
        let next = hit.right();
        if next.saturating_add(item.w) > cols {
            // No room further right on this row; retry from the next row's first column.
            item.x = 0;
            item.y += 1;
        } else {
            item.x = next;
        }
    }
}
