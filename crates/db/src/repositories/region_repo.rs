//! Repository for the `job_regions` table.

use roilabel_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::region::{CreateRegion, JobRegion};

/// Column list for `job_regions` queries.
const COLUMNS: &str = "id, job_id, experiment_id, x, y, width, height";

/// Provides access to job regions.
pub struct RegionRepo;

impl RegionRepo {
    /// Insert a region into a job, returning the created row.
    ///
    /// Bounds validation happens above this seam (`core::geometry`); the
    /// store persists whatever it is given.
    pub async fn insert(
        pool: &SqlitePool,
        job_id: DbId,
        input: &CreateRegion,
    ) -> Result<JobRegion, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_regions (job_id, experiment_id, x, y, width, height) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRegion>(&query)
            .bind(job_id)
            .bind(&input.experiment_id)
            .bind(input.x)
            .bind(input.y)
            .bind(input.width)
            .bind(input.height)
            .fetch_one(pool)
            .await
    }

    /// Find a region by its id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<JobRegion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_regions WHERE id = ?");
        sqlx::query_as::<_, JobRegion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all regions belonging to a job.
    pub async fn list_by_job(
        pool: &SqlitePool,
        job_id: DbId,
    ) -> Result<Vec<JobRegion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_regions WHERE job_id = ? ORDER BY id");
        sqlx::query_as::<_, JobRegion>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Total number of regions in a job.
    pub async fn count_by_job(pool: &SqlitePool, job_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM job_regions WHERE job_id = ?")
            .bind(job_id)
            .fetch_one(pool)
            .await
    }

    /// Ids of a job's regions minus an exclusion set, as one parameterized
    /// `NOT IN` query.
    pub async fn list_ids_excluding(
        pool: &SqlitePool,
        job_id: DbId,
        excluded: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if excluded.is_empty() {
            return sqlx::query_scalar("SELECT id FROM job_regions WHERE job_id = ? ORDER BY id")
                .bind(job_id)
                .fetch_all(pool)
                .await;
        }

        let placeholders = vec!["?"; excluded.len()].join(", ");
        let query = format!(
            "SELECT id FROM job_regions \
             WHERE job_id = ? AND id NOT IN ({placeholders}) \
             ORDER BY id"
        );
        let mut q = sqlx::query_scalar(&query).bind(job_id);
        for id in excluded {
            q = q.bind(*id);
        }
        q.fetch_all(pool).await
    }
}
