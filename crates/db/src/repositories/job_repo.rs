//! Repository for the `labeling_jobs` table.

use roilabel_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::labeling_job::LabelingJob;

/// Column list for `labeling_jobs` queries.
const COLUMNS: &str = "job_id, created_at";

/// Provides access to labeling jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new labeling job, returning the created row.
    pub async fn create(pool: &SqlitePool) -> Result<LabelingJob, sqlx::Error> {
        let query = format!("INSERT INTO labeling_jobs DEFAULT VALUES RETURNING {COLUMNS}");
        sqlx::query_as::<_, LabelingJob>(&query).fetch_one(pool).await
    }

    /// The current job id: maximal creation timestamp, ties broken by id.
    ///
    /// Returns `RowNotFound` when no job exists; callers surface that as a
    /// user-visible "nothing to label".
    pub async fn current_job_id(pool: &SqlitePool) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT job_id FROM labeling_jobs \
             ORDER BY created_at DESC, job_id DESC \
             LIMIT 1",
        )
        .fetch_one(pool)
        .await
    }

    /// Find a job by its id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        job_id: DbId,
    ) -> Result<Option<LabelingJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM labeling_jobs WHERE job_id = ?");
        sqlx::query_as::<_, LabelingJob>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// List all labeling jobs, newest first.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LabelingJob>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM labeling_jobs ORDER BY created_at DESC, job_id DESC");
        sqlx::query_as::<_, LabelingJob>(&query).fetch_all(pool).await
    }
}
