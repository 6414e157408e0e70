//! Region grid derivation and sampling for labeling-job population.
//!
//! A field of view is divided into an even grid of candidate regions inside
//! the motion border; the population step then samples the requested number
//! of regions without replacement across all experiments.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::CoreError;
use crate::geometry::{FieldOfView, MotionBorder, RegionRect};

/// Divide the within-border field of view into a grid of equally sized
/// regions.
///
/// `fov_divisor` divides each within-border dimension; e.g. a 512x512 field
/// of view with no border and a divisor of 4 yields sixteen 128x128 regions.
/// Rows and columns that would extend past the border are not emitted.
pub fn region_grid(
    fov: FieldOfView,
    border: MotionBorder,
    fov_divisor: i64,
) -> Result<Vec<RegionRect>, CoreError> {
    if fov_divisor <= 0 {
        return Err(CoreError::Validation(format!(
            "fov divisor must be positive, got {fov_divisor}"
        )));
    }

    let usable_width = fov.width - border.left - border.right;
    let usable_height = fov.height - border.top - border.bottom;
    let region_width = usable_width / fov_divisor;
    let region_height = usable_height / fov_divisor;

    if region_width <= 0 || region_height <= 0 {
        return Err(CoreError::Validation(format!(
            "motion border leaves no usable area ({usable_width}x{usable_height} \
             for divisor {fov_divisor})"
        )));
    }

    let mut regions = Vec::new();
    let mut row = border.top;
    while row + region_height <= fov.height - border.bottom {
        let mut col = border.left;
        while col + region_width <= fov.width - border.right {
            regions.push(RegionRect {
                x: row,
                y: col,
                width: region_width,
                height: region_height,
            });
            col += region_width;
        }
        row += region_height;
    }
    Ok(regions)
}

/// Sample `n` items without replacement.
///
/// Fails when fewer than `n` items are available rather than silently
/// returning a short job.
pub fn sample_without_replacement<T: Clone, R: Rng + ?Sized>(
    items: &[T],
    n: usize,
    rng: &mut R,
) -> Result<Vec<T>, CoreError> {
    if n > items.len() {
        return Err(CoreError::Validation(format!(
            "requested {n} regions but only {} are available",
            items.len()
        )));
    }
    Ok(items.choose_multiple(rng, n).cloned().collect())
}
