#![no_main]

use arbitrary::Arbitrary;
use cardgrid_layout::{CompactType, RawLayoutItem, collides, compact, layouts_equal, re_layout};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    cols: u8,
    horizontal: bool,
    items: Vec<FuzzItem>,
}

#[derive(Debug, Arbitrary)]
struct FuzzItem {
    id: Option<u8>,
    x: Option<f64>,
    y: Option<f64>,
    w: Option<f64>,
    h: Option<f64>,
    min_w: Option<f64>,
    max_w: Option<f64>,
    is_static: Option<bool>,
}

fuzz_target!(|input: Input| {
    let cols = u32::from(input.cols % 48) + 1;
    let compact_type = if input.horizontal {
        CompactType::Horizontal
    } else {
        CompactType::Vertical
    };
    // Keep far-off coordinates from turning compaction into a long walk.
    let bounded = |v: Option<f64>| v.map(|v| v.clamp(-1e3, 1e3));
    let raw: Vec<RawLayoutItem> = input
        .items
        .iter()
        .take(64)
        .map(|item| RawLayoutItem {
            id: item.id.map(|id| id.to_string()),
            x: bounded(item.x),
            y: bounded(item.y),
            w: bounded(item.w),
            h: bounded(item.h).map(|h| h.min(32.0)),
            min_w: bounded(item.min_w),
            max_w: bounded(item.max_w),
            is_static: item.is_static,
            ..RawLayoutItem::default()
        })
        .collect();

    let layout = re_layout(&raw, compact_type, cols);

    for (i, a) in layout.iter().enumerate() {
        assert!(a.w >= 1 && a.h >= 1, "degenerate size: {a:?}");
        assert!(a.x + a.w <= cols, "off the right edge: {a:?}");
        assert!(a.max_w >= a.min_w, "inverted limits: {a:?}");
        for b in &layout[i + 1..] {
            assert_ne!(a.id, b.id, "duplicate id");
            assert!(!collides(a, b), "{a:?} overlaps {b:?}");
        }
    }
    let again = compact(&layout, compact_type, cols);
    assert!(layouts_equal(&layout, &again), "compaction not idempotent");
});
