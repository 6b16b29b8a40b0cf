#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces meet here: grid space, where positions and sizes are
//! whole cells, and pixel space, where the host measures and renders.

use serde::{Deserialize, Serialize};

/// The cells a card covers: columns `[x, x + w)` and rows `[y, y + h)`,
/// counted from the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// First column past the right edge.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// First row past the bottom edge.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// True when both axes overlap. Touching edges do not overlap.
    #[inline]
    pub const fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Horizontal and vertical spacing in pixels (margins, container padding).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
}

impl Spacing {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same spacing on both axes.
    pub const fn all(val: f64) -> Self {
        Self { x: val, y: val }
    }
}

impl From<[f64; 2]> for Spacing {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Spacing> for [f64; 2] {
    fn from(spacing: Spacing) -> Self {
        [spacing.x, spacing.y]
    }
}

/// A box in pixel space, relative to the grid container's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}
