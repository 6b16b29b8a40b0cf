#![no_main]

use arbitrary::Arbitrary;
use cardgrid_layout::{
    CompactType, DragPointer, Grid, GridConfig, LayoutItem, PositionParams, collides,
    layouts_equal,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Drag { card: u8, left: i16, top: i16 },
    Resize { card: u8, w: u8, h: u8 },
    ResizePixels { card: u8, width: u16, height: u16 },
    Remove { card: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    cols: u8,
    horizontal: bool,
    prevent_collision: bool,
    cards: Vec<(u8, u8, u8, u8, bool)>,
    ops: Vec<(Op, bool)>,
}

fn assert_valid(grid: &Grid, cols: u32) {
    let layout = grid.layout();
    for (i, a) in layout.iter().enumerate() {
        assert!(a.x + a.w <= cols, "off the right edge: {a:?}");
        for b in &layout[i + 1..] {
            assert!(!collides(a, b), "{a:?} overlaps {b:?}");
        }
    }
}

fuzz_target!(|input: Input| {
    let cols = u32::from(input.cols % 24) + 1;
    let config = GridConfig {
        params: PositionParams {
            cols,
            row_height: 30.0,
            ..PositionParams::default()
        },
        compact_type: if input.horizontal {
            CompactType::Horizontal
        } else {
            CompactType::Vertical
        },
        prevent_collision: input.prevent_collision,
        ..GridConfig::default()
    };
    let cards: Vec<LayoutItem> = input
        .cards
        .iter()
        .take(16)
        .enumerate()
        .map(|(i, &(x, y, w, h, pinned))| {
            let card = LayoutItem::new(
                format!("c{i}"),
                u32::from(x % 32),
                u32::from(y % 32),
                u32::from(w % 6) + 1,
                u32::from(h % 4) + 1,
            );
            if pinned { card.pinned() } else { card }
        })
        .collect();
    let Ok(mut grid) = Grid::with_items("fuzz", config, &cards) else {
        return;
    };
    assert_valid(&grid, cols);

    for (op, cancel) in input.ops.iter().take(64) {
        let before = grid.layout().to_vec();
        match *op {
            Op::Drag { card, left, top } => {
                let id = format!("c{}", card % 16);
                if !grid.drag_start(&id) {
                    continue;
                }
                grid.drag_update(&id, DragPointer::new(f64::from(left), f64::from(top)));
                assert_valid(&grid, cols);
                if *cancel {
                    grid.drag_cancel();
                    assert!(layouts_equal(grid.layout(), &before), "cancel lost the snapshot");
                } else {
                    grid.drag_stop(&id);
                }
            }
            Op::Resize { card, w, h } => {
                let id = format!("c{}", card % 16);
                if !grid.resize_start(&id) {
                    continue;
                }
                grid.resize_update(&id, u32::from(w % 12), u32::from(h % 8));
                assert_valid(&grid, cols);
                if *cancel {
                    grid.resize_cancel();
                    assert!(layouts_equal(grid.layout(), &before), "cancel lost the snapshot");
                } else {
                    grid.resize_stop(&id);
                }
            }
            Op::ResizePixels { card, width, height } => {
                let id = format!("c{}", card % 16);
                if grid.resize_start(&id) {
                    grid.resize_update_pixels(&id, f64::from(width), f64::from(height));
                    grid.resize_stop(&id);
                }
            }
            Op::Remove { card } => {
                grid.remove_item(&format!("c{}", card % 16));
            }
        }
        assert!(!grid.is_interacting());
        assert_valid(&grid, cols);
        for b in before.iter().filter(|i| i.is_static) {
            if let Some(a) = grid.item(&b.id) {
                assert_eq!((a.x, a.y), (b.x, b.y), "static card moved");
            }
        }
    }
});
