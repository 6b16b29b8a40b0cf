//! Container height needed to show every card.

use crate::item::{LayoutItem, bottom};
use crate::params::PositionParams;

/// Pixel height of the container: every occupied row, the margins between
/// rows (none after the last), and padding top and bottom. Never negative.
pub fn get_container_height(layout: &[LayoutItem], params: &PositionParams) -> f64 {
    let rows = f64::from(bottom(layout));
    let padding = params.padding();
    let height =
        rows * (params.row_height + params.margin.y) - params.margin.y + 2.0 * padding.y;
    height.max(0.0)
}
