//! Overlap tests between cards.

use crate::item::LayoutItem;

/// True when `a` and `b` overlap on both axes. An item never collides with
/// itself (same `id`).
#[inline]
pub fn collides(a: &LayoutItem, b: &LayoutItem) -> bool {
    a.id != b.id && a.rect().intersects(&b.rect())
}

/// First item in stored order that collides with `item`.
pub fn get_first_collision<'a>(layout: &'a [LayoutItem], item: &LayoutItem) -> Option<&'a LayoutItem> {
    layout.iter().find(|other| collides(other, item))
}

/// Every item colliding with `item`, in stored order.
pub fn get_all_collisions<'a>(layout: &'a [LayoutItem], item: &LayoutItem) -> Vec<&'a LayoutItem> {
    layout.iter().filter(|other| collides(other, item)).collect()
}

/// Indices of colliding items, in stored order.
pub(crate) fn collision_indices(layout: &[LayoutItem], item: &LayoutItem) -> Vec<usize> {
    layout
        .iter()
        .enumerate()
        .filter_map(|(i, other)| collides(other, item).then_some(i))
        .collect()
}
