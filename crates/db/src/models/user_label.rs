//! User label entity models and DTOs.

use roilabel_core::labels::RoiLabel;
use roilabel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `user_labels` table: one labeler's verdict set for one
/// region. At most one row per (labeler, region); resubmission updates the
/// row in place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserLabel {
    pub user_id: String,
    pub region_id: DbId,
    pub labels: Json<Vec<RoiLabel>>,
    pub submitted_at: Timestamp,
    /// Elapsed labeling time in seconds, as reported by the client.
    pub duration_secs: Option<f64>,
}

/// One entry of a labeler's submission history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabeledRegion {
    pub region_id: DbId,
    pub experiment_id: String,
    pub submitted_at: Timestamp,
}

/// DTO for `POST /regions/{id}/labels`.
#[derive(Debug, Deserialize)]
pub struct SubmitLabels {
    pub labels: Vec<RoiLabel>,
    pub duration_secs: Option<f64>,
}

/// One row of the full label export.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabelExportRow {
    pub experiment_id: String,
    pub user_id: String,
    pub labels: Json<Vec<RoiLabel>>,
}
