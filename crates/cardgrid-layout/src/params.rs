//! Grid geometry and per-grid configuration.
//!
//! All structs deserialize from host JSON with a default for every field, so
//! a host only spells out what it changes:
//!
//! ```
//! use cardgrid_layout::{CompactType, GridConfig};
//!
//! let config: GridConfig = serde_json::from_str(
//!     r#"{"params": {"cols": 6, "rowHeight": 40}, "compactType": "horizontal"}"#,
//! )
//! .unwrap();
//! assert_eq!(config.params.cols, 6);
//! assert_eq!(config.compact_type, CompactType::Horizontal);
//! assert!(config.validate().is_ok());
//! ```

use cardgrid_core::geometry::Spacing;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction in which compaction removes gaps. Fixed per grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactType {
    /// Slide items toward row 0; items are ordered by `(y, x)`.
    #[default]
    Vertical,
    /// Slide items toward column 0; items are ordered by `(x, y)`.
    Horizontal,
    /// Leave items where they are.
    None,
}

/// Grid geometry snapshot, fixed for the duration of one computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionParams {
    pub cols: u32,
    /// Gap between cards, `[x, y]` pixels.
    pub margin: Spacing,
    /// Inset from the container edges; `None` means "same as margin".
    pub container_padding: Option<Spacing>,
    pub row_height: f64,
    /// Row limit for resizing. `u32::MAX` means unbounded.
    pub max_rows: u32,
    pub container_width: f64,
}

impl Default for PositionParams {
    fn default() -> Self {
        Self {
            cols: 12,
            margin: Spacing::all(10.0),
            container_padding: None,
            row_height: 150.0,
            max_rows: u32::MAX,
            container_width: 1200.0,
        }
    }
}

impl PositionParams {
    /// Container padding with the margin fallback applied.
    #[inline]
    pub fn padding(&self) -> Spacing {
        self.container_padding.unwrap_or(self.margin)
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.cols == 0 {
            return Err(GridConfigError::ZeroColumns);
        }
        if self.max_rows == 0 {
            return Err(GridConfigError::ZeroMaxRows);
        }
        let padding = self.padding();
        let fields = [
            ("margin.x", self.margin.x),
            ("margin.y", self.margin.y),
            ("containerPadding.x", padding.x),
            ("containerPadding.y", padding.y),
            ("rowHeight", self.row_height),
            ("containerWidth", self.container_width),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(GridConfigError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(GridConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Sizes substituted for missing or non-finite item sizes during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
    pub w: u32,
    pub h: u32,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self { w: 1, h: 1 }
    }
}

/// Everything one grid instance needs besides its layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub params: PositionParams,
    pub compact_type: CompactType,
    /// Reject moves and clip resizes that would overlap another card.
    pub prevent_collision: bool,
    pub item_defaults: ItemDefaults,
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), GridConfigError> {
        self.params.validate()?;
        if self.item_defaults.w == 0 || self.item_defaults.h == 0 {
            return Err(GridConfigError::ZeroDefaultSize {
                w: self.item_defaults.w,
                h: self.item_defaults.h,
            });
        }
        Ok(())
    }
}

/// Host configuration rejected at the grid boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridConfigError {
    #[error("grid must have at least one column")]
    ZeroColumns,
    #[error("maxRows must be at least 1")]
    ZeroMaxRows,
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("default item size {w}x{h} must be at least 1x1")]
    ZeroDefaultSize { w: u32, h: u32 },
}
