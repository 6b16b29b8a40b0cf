//! Property/fuzz-style invariants for compaction, displacement and the grid
//! interaction state machine.
//!
//! Layouts and operation streams come from a seeded LCG so every failure can
//! be replayed from its seed alone.

use cardgrid_layout::{
    CompactType, DragPointer, Grid, GridConfig, LayoutItem, MoveOptions, PositionParams,
    RawLayoutItem, calc_grid_item_position, collides, compact, correct_bounds, layouts_equal,
    move_element,
};
use proptest::prelude::*;

const COLS: u32 = 12;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        if min == max {
            return min;
        }
        let span = u64::from(max - min + 1);
        min + ((self.next_u64() >> 16) % span) as u32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_u64() >> 16) % len as u64) as usize
    }

    fn one_in(&mut self, n: u64) -> bool {
        (self.next_u64() >> 16) % n == 0
    }
}

fn random_layout(rng: &mut Lcg, len: usize) -> Vec<LayoutItem> {
    let items: Vec<LayoutItem> = (0..len)
        .map(|i| {
            let w = rng.next_u32_range(1, 4);
            let h = rng.next_u32_range(1, 3);
            let item = LayoutItem::new(
                format!("c{i}"),
                rng.next_u32_range(0, COLS - 1),
                rng.next_u32_range(0, 10),
                w,
                h,
            );
            if rng.one_in(6) { item.pinned() } else { item }
        })
        .collect();
    correct_bounds(&items, COLS)
}

fn random_compact_type(rng: &mut Lcg) -> CompactType {
    match rng.choose_index(3) {
        0 => CompactType::Vertical,
        1 => CompactType::Horizontal,
        _ => CompactType::None,
    }
}

fn assert_no_overlap(layout: &[LayoutItem], context: &str) {
    for (i, a) in layout.iter().enumerate() {
        for b in &layout[i + 1..] {
            assert!(!collides(a, b), "{context}: {a:?} overlaps {b:?}");
        }
    }
}

fn assert_statics_fixed(before: &[LayoutItem], after: &[LayoutItem], context: &str) {
    for (b, a) in before.iter().zip(after) {
        if b.is_static {
            assert_eq!((a.x, a.y, a.w, a.h), (b.x, b.y, b.w, b.h), "{context}: static {} moved", b.id);
        }
    }
}

fn movable_ids(layout: &[LayoutItem]) -> Vec<String> {
    layout
        .iter()
        .filter(|item| !item.is_static)
        .map(|item| item.id.clone())
        .collect()
}

/// Drive a grid through random drags and resizes, checking invariants after
/// every step. Returns the grid for further checks.
fn run_interactions(seed: u64, steps: usize) -> Grid {
    let mut rng = Lcg::new(seed);
    let len = rng.next_u32_range(1, 9) as usize;
    let layout = random_layout(&mut rng, len);
    let config = GridConfig {
        params: PositionParams {
            cols: COLS,
            row_height: 30.0,
            ..PositionParams::default()
        },
        compact_type: if rng.one_in(2) {
            CompactType::Vertical
        } else {
            CompactType::Horizontal
        },
        prevent_collision: rng.one_in(4),
        ..GridConfig::default()
    };
    let mut grid = Grid::with_items("fuzz", config, &layout).expect("valid config");
    assert_no_overlap(grid.layout(), &format!("seed={seed} initial"));
    let initial = grid.layout().to_vec();

    for step in 0..steps {
        let ids = movable_ids(grid.layout());
        if ids.is_empty() {
            break;
        }
        let id = ids[rng.choose_index(ids.len())].clone();
        let context = format!("seed={seed} step={step} item={id}");
        if rng.one_in(3) {
            assert!(grid.resize_start(&id), "{context}: resize refused");
            let w = rng.next_u32_range(1, 6);
            let h = rng.next_u32_range(1, 4);
            grid.resize_update(&id, w, h);
            assert_no_overlap(grid.layout(), &context);
            grid.resize_stop(&id);
        } else {
            assert!(grid.drag_start(&id), "{context}: drag refused");
            for _ in 0..rng.next_u32_range(1, 4) {
                let x = rng.next_u32_range(0, COLS);
                let y = rng.next_u32_range(0, 12);
                let b = calc_grid_item_position(&grid.config().params, x, y, 1, 1);
                grid.drag_update(&id, DragPointer::new(b.left, b.top));
                assert_no_overlap(grid.layout(), &context);
            }
            if rng.one_in(5) {
                grid.drag_cancel();
            } else {
                grid.drag_stop(&id);
            }
        }
        assert!(!grid.is_interacting(), "{context}: interaction left open");
        assert_no_overlap(grid.layout(), &context);
        assert_statics_fixed(&initial, grid.layout(), &context);
    }
    grid
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn compaction_is_idempotent(seed in any::<u64>(), len in 0usize..14) {
        let mut rng = Lcg::new(seed);
        let layout = random_layout(&mut rng, len);
        let ct = random_compact_type(&mut rng);
        let once = compact(&layout, ct, COLS);
        let twice = compact(&once, ct, COLS);
        prop_assert!(layouts_equal(&once, &twice), "seed={} {:?}", seed, ct);
    }

    #[test]
    fn compaction_removes_overlaps_and_keeps_statics(seed in any::<u64>(), len in 0usize..14) {
        let mut rng = Lcg::new(seed);
        let layout = random_layout(&mut rng, len);
        for ct in [CompactType::Vertical, CompactType::Horizontal] {
            let out = compact(&layout, ct, COLS);
            let context = format!("seed={seed} {ct:?}");
            assert_no_overlap(&out, &context);
            assert_statics_fixed(&layout, &out, &context);
            prop_assert!(out.iter().zip(&layout).all(|(a, b)| a.id == b.id));
        }
    }

    #[test]
    fn displacement_is_monotonic(seed in any::<u64>(), len in 1usize..10) {
        let mut rng = Lcg::new(seed);
        let ct = if rng.one_in(2) { CompactType::Vertical } else { CompactType::Horizontal };
        let layout = compact(&random_layout(&mut rng, len), ct, COLS);
        let ids = movable_ids(&layout);
        prop_assume!(!ids.is_empty());
        let id = ids[rng.choose_index(ids.len())].clone();
        let (x, y) = (rng.next_u32_range(0, COLS), rng.next_u32_range(0, 12));

        let outcome = move_element(
            &layout,
            &id,
            x,
            y,
            MoveOptions { is_user_action: false, prevent_collision: false, compact_type: ct, cols: COLS },
        );
        for (before, after) in layout.iter().zip(&outcome.layout) {
            if before.id == id {
                continue;
            }
            prop_assert!(after.y >= before.y, "seed={} {} moved up", seed, before.id);
            if ct == CompactType::Vertical {
                prop_assert_eq!(after.x, before.x);
            } else if after.y == before.y {
                prop_assert!(after.x >= before.x, "seed={} {} moved left", seed, before.id);
            }
        }
        assert_no_overlap(&outcome.layout, &format!("seed={seed} move {id} to ({x},{y})"));
    }

    #[test]
    fn cancel_restores_snapshot(seed in any::<u64>()) {
        let mut rng = Lcg::new(seed);
        let len = rng.next_u32_range(1, 8) as usize;
        let layout = random_layout(&mut rng, len);
        let mut grid = Grid::with_items("g", GridConfig::default(), &layout).expect("valid config");
        let before = grid.layout().to_vec();
        let ids = movable_ids(&before);
        prop_assume!(!ids.is_empty());
        let id = ids[rng.choose_index(ids.len())].clone();

        prop_assert!(grid.drag_start(&id));
        for _ in 0..3 {
            let b = calc_grid_item_position(
                &grid.config().params,
                rng.next_u32_range(0, COLS),
                rng.next_u32_range(0, 10),
                1,
                1,
            );
            grid.drag_update(&id, DragPointer::new(b.left, b.top));
        }
        grid.drag_cancel();
        prop_assert_eq!(grid.layout(), before.as_slice());
    }

    #[test]
    fn interaction_sequences_preserve_invariants(seed in any::<u64>(), steps in 10usize..60) {
        run_interactions(seed, steps);
    }
}

#[test]
fn normalization_yields_valid_layouts() {
    let mut rng = Lcg::new(7);
    for round in 0..200 {
        let raw: Vec<RawLayoutItem> = (0..rng.next_u32_range(0, 10))
            .map(|i| RawLayoutItem {
                id: Some(format!("r{i}")),
                x: Some(f64::from(rng.next_u32_range(0, 40)) - 10.0),
                y: Some(f64::from(rng.next_u32_range(0, 20)) - 5.0),
                w: Some(f64::from(rng.next_u32_range(0, 20)) - 2.0),
                h: Some(f64::from(rng.next_u32_range(0, 5)) - 1.0),
                is_static: Some(rng.one_in(5)),
                ..RawLayoutItem::default()
            })
            .collect();
        let layout = cardgrid_layout::re_layout(&raw, CompactType::Vertical, COLS);
        let context = format!("round={round}");
        assert_no_overlap(&layout, &context);
        for item in &layout {
            assert!(item.w >= 1 && item.h >= 1, "{context}: {item:?}");
            assert!(item.x + item.w <= COLS, "{context}: {item:?}");
        }
    }
}

#[test]
fn interaction_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        run_interactions(seed, 120);
    }
}
