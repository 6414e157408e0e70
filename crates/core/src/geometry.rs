//! Field-of-view geometry and region bounds validation.
//!
//! Coordinate convention used throughout the repository: `x` is the ROW
//! index and `y` the COLUMN index of a rectangle's upper-left corner, in
//! array coordinates. A region therefore occupies rows `x..x + height` and
//! columns `y..y + width` of the field of view.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Field-of-view dimensions in pixels (512x512 in all observed recordings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// Number of columns.
    pub width: i64,
    /// Number of rows.
    pub height: i64,
}

impl FieldOfView {
    pub const DEFAULT: FieldOfView = FieldOfView {
        width: 512,
        height: 512,
    };
}

/// Sensor motion-correction border: pixels on each side of the field of view
/// that are invalid after registration and must not be assigned for labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionBorder {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

impl MotionBorder {
    pub const NONE: MotionBorder = MotionBorder {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };
}

/// A rectangular sub-window of a field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRect {
    /// Row index of the upper-left corner.
    pub x: i64,
    /// Column index of the upper-left corner.
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Validate that a region lies within the field of view, adjusted for the
/// motion border. Applied at region-creation time only; the allocator never
/// re-checks geometry.
pub fn validate_region_bounds(
    rect: &RegionRect,
    fov: FieldOfView,
    border: MotionBorder,
) -> Result<(), CoreError> {
    if rect.width <= 0 || rect.height <= 0 {
        return Err(CoreError::Validation(format!(
            "region dimensions must be positive, got {}x{}",
            rect.width, rect.height
        )));
    }

    let row_min = border.top;
    let row_max = fov.height - border.bottom;
    let col_min = border.left;
    let col_max = fov.width - border.right;

    if rect.x < row_min || rect.x + rect.height > row_max {
        return Err(CoreError::Validation(format!(
            "region rows {}..{} outside valid range {row_min}..{row_max}",
            rect.x,
            rect.x + rect.height
        )));
    }
    if rect.y < col_min || rect.y + rect.width > col_max {
        return Err(CoreError::Validation(format!(
            "region columns {}..{} outside valid range {col_min}..{col_max}",
            rect.y,
            rect.y + rect.width
        )));
    }
    Ok(())
}
