//! Labeling job entity model.

use roilabel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `labeling_jobs` table.
///
/// Jobs are created by the administrative population step and never mutated.
/// The most recently created job is the "current" one for all labeler-facing
/// operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabelingJob {
    pub job_id: DbId,
    pub created_at: Timestamp,
}
