//! Region entity models and DTOs.

use roilabel_core::geometry::RegionRect;
use roilabel_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `job_regions` table.
///
/// `x` is the row index and `y` the column index of the region's upper-left
/// corner, in array coordinates. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRegion {
    pub id: DbId,
    pub job_id: DbId,
    pub experiment_id: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl JobRegion {
    pub fn rect(&self) -> RegionRect {
        RegionRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// DTO for inserting a region into a job.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegion {
    pub experiment_id: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CreateRegion {
    pub fn rect(&self) -> RegionRect {
        RegionRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
