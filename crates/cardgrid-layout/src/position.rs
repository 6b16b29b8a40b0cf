//! Conversions between grid cells and container pixels.
//!
//! Column width is derived from the container width:
//!
//! ```text
//! col_width = (container_width - margin.x * (cols - 1) - 2 * padding.x) / cols
//! left      = x * (col_width + margin.x) + padding.x
//! top       = y * (row_height + margin.y) + padding.y
//! width     = w * col_width + (w - 1) * margin.x
//! height    = h * row_height + (h - 1) * margin.y
//! ```
//!
//! The inverse conversions round to the nearest cell.

use cardgrid_core::geometry::PixelBox;

use crate::item::LayoutItem;
use crate::params::PositionParams;

/// Pixel width of one column; `0` for degenerate geometry instead of dividing by zero.
pub fn calc_col_width(params: &PositionParams) -> f64 {
    if params.cols == 0 || params.container_width <= 0.0 {
        return 0.0;
    }
    let cols = f64::from(params.cols);
    let padding = params.padding();
    let usable =
        params.container_width - params.margin.x * (cols - 1.0) - 2.0 * padding.x;
    (usable / cols).max(0.0)
}

/// Pixel box of the cell rectangle `(x, y, w, h)`.
pub fn calc_grid_item_position(
    params: &PositionParams,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> PixelBox {
    let col_width = calc_col_width(params);
    let padding = params.padding();
    PixelBox {
        left: f64::from(x) * (col_width + params.margin.x) + padding.x,
        top: f64::from(y) * (params.row_height + params.margin.y) + padding.y,
        width: span(w, col_width, params.margin.x),
        height: span(h, params.row_height, params.margin.y),
    }
}

fn span(cells: u32, cell: f64, gap: f64) -> f64 {
    f64::from(cells) * cell + f64::from(cells.saturating_sub(1)) * gap
}

/// Nearest whole cell for a pixel offset. `as` saturates: NaN and negatives land on 0.
fn nearest_cell(pixels: f64, pitch: f64) -> u32 {
    if pitch <= 0.0 || !pitch.is_finite() {
        return 0;
    }
    (pixels / pitch).round() as u32
}

/// Grid cell under a card whose top-left corner is at `(left, top)` pixels.
///
/// `x` is clamped into `[0, cols - w]` and `y` to `>= 0`. There is no upper
/// row clamp: grids grow downward.
pub fn calc_xy(params: &PositionParams, top: f64, left: f64, w: u32) -> (u32, u32) {
    let col_width = calc_col_width(params);
    let padding = params.padding();
    let x = nearest_cell(left - padding.x, col_width + params.margin.x);
    let y = nearest_cell(top - padding.y, params.row_height + params.margin.y);
    (x.min(params.cols.saturating_sub(w)), y)
}

/// Cell size of a card measuring `width` x `height` pixels, placed at `(x, y)`.
///
/// Clamped to `[1, cols - x]` columns and `[1, max_rows - y]` rows.
pub fn calc_wh(params: &PositionParams, width: f64, height: f64, x: u32, y: u32) -> (u32, u32) {
    let col_width = calc_col_width(params);
    let w = nearest_cell(width + params.margin.x, col_width + params.margin.x);
    let h = nearest_cell(height + params.margin.y, params.row_height + params.margin.y);
    let max_w = params.cols.saturating_sub(x).max(1);
    let max_h = params.max_rows.saturating_sub(y).max(1);
    (w.clamp(1, max_w), h.clamp(1, max_h))
}

/// Effective size of `item` under its own min/max limits and the grid bounds.
///
/// Grid bounds win over item limits: a card never extends past the last
/// column even if its `min_w` asks for more.
pub fn get_wh(item: &LayoutItem, params: &PositionParams) -> (u32, u32) {
    let w = item
        .w
        .min(item.max_w)
        .max(item.min_w)
        .min(params.cols.saturating_sub(item.x))
        .max(1);
    let h = item
        .h
        .min(item.max_h)
        .max(item.min_h)
        .min(params.max_rows.saturating_sub(item.y))
        .max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardgrid_core::geometry::Spacing;

    fn params() -> PositionParams {
        PositionParams {
            cols: 12,
            margin: Spacing::all(10.0),
            container_padding: Some(Spacing::all(10.0)),
            row_height: 30.0,
            max_rows: u32::MAX,
            container_width: 1200.0,
        }
    }

    #[test]
    fn col_width_subtracts_margins_and_padding() {
        // (1200 - 110 - 20) / 12
        let w = calc_col_width(&params());
        assert!((w - 1070.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_geometry_has_zero_col_width() {
        let mut p = params();
        p.container_width = 0.0;
        assert_eq!(calc_col_width(&p), 0.0);
        p.container_width = 1200.0;
        p.cols = 0;
        assert_eq!(calc_col_width(&p), 0.0);
        // Narrower than its own margins.
        p.cols = 12;
        p.container_width = 50.0;
        assert_eq!(calc_col_width(&p), 0.0);
    }

    #[test]
    fn item_position_follows_formula() {
        let p = params();
        let col = calc_col_width(&p);
        let b = calc_grid_item_position(&p, 3, 2, 2, 1);
        assert!((b.left - (3.0 * (col + 10.0) + 10.0)).abs() < 1e-9);
        assert_eq!(b.top, 90.0);
        assert!((b.width - (2.0 * col + 10.0)).abs() < 1e-9);
        assert_eq!(b.height, 30.0);
    }

    #[test]
    fn xy_inverts_item_position() {
        let p = params();
        let b = calc_grid_item_position(&p, 3, 2, 2, 1);
        assert_eq!(calc_xy(&p, b.top, b.left, 2), (3, 2));
    }

    #[test]
    fn xy_clamps_into_columns() {
        let p = params();
        assert_eq!(calc_xy(&p, -500.0, -500.0, 2), (0, 0));
        assert_eq!(calc_xy(&p, 0.0, 5000.0, 4), (8, 0));
        // Far below the last row is fine.
        assert_eq!(calc_xy(&p, 4010.0, 10.0, 1), (0, 100));
        assert_eq!(calc_xy(&p, f64::NAN, f64::INFINITY, 1).1, 0);
    }

    #[test]
    fn wh_inverts_item_size() {
        let p = params();
        let b = calc_grid_item_position(&p, 0, 0, 3, 2);
        assert_eq!(calc_wh(&p, b.width, b.height, 0, 0), (3, 2));
        assert_eq!(calc_wh(&p, 10_000.0, 1.0, 10, 0), (2, 1));
        assert_eq!(calc_wh(&p, 0.0, 0.0, 0, 0), (1, 1));
    }

    #[test]
    fn wh_respects_max_rows() {
        let mut p = params();
        p.max_rows = 5;
        assert_eq!(calc_wh(&p, 100.0, 10_000.0, 0, 3).1, 2);
    }

    #[test]
    fn get_wh_applies_item_limits_then_grid_bounds() {
        let p = params();
        let item = LayoutItem::new("a", 0, 0, 1, 9).min_size(3, 1).max_size(12, 4);
        assert_eq!(get_wh(&item, &p), (3, 4));

        let edge = LayoutItem::new("b", 10, 0, 1, 1).min_size(4, 1);
        assert_eq!(get_wh(&edge, &p), (2, 1));
    }
}
