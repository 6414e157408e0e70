//! Repository for the `user_labels` table.

use std::collections::HashMap;

use roilabel_core::labels::RoiLabel;
use roilabel_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::user_label::{LabelExportRow, LabeledRegion, UserLabel};

/// Column list for `user_labels` queries.
const COLUMNS: &str = "user_id, region_id, labels, submitted_at, duration_secs";

/// Provides access to submitted labels.
pub struct LabelRepo;

impl LabelRepo {
    /// Insert or update a labeler's verdict set for a region.
    ///
    /// A single atomic statement: a resubmission replaces the labels and
    /// duration and refreshes the submission timestamp, never producing a
    /// second row or a partial write.
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: &str,
        region_id: DbId,
        labels: &[RoiLabel],
        duration_secs: Option<f64>,
    ) -> Result<UserLabel, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_labels (user_id, region_id, labels, duration_secs) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, region_id) DO UPDATE SET \
                labels = excluded.labels, \
                duration_secs = excluded.duration_secs, \
                submitted_at = CURRENT_TIMESTAMP \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserLabel>(&query)
            .bind(user_id)
            .bind(region_id)
            .bind(Json(labels))
            .bind(duration_secs)
            .fetch_one(pool)
            .await
    }

    /// Update only the verdict set of an existing submission.
    ///
    /// Returns `None` when the labeler has no prior submission for the
    /// region. The submission timestamp is left untouched.
    pub async fn update_labels(
        pool: &SqlitePool,
        user_id: &str,
        region_id: DbId,
        labels: &[RoiLabel],
    ) -> Result<Option<UserLabel>, sqlx::Error> {
        let query = format!(
            "UPDATE user_labels SET labels = ? \
             WHERE user_id = ? AND region_id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserLabel>(&query)
            .bind(Json(labels))
            .bind(user_id)
            .bind(region_id)
            .fetch_optional(pool)
            .await
    }

    /// Find one labeler's submission for a region.
    pub async fn find(
        pool: &SqlitePool,
        user_id: &str,
        region_id: DbId,
    ) -> Result<Option<UserLabel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_labels WHERE user_id = ? AND region_id = ?"
        );
        sqlx::query_as::<_, UserLabel>(&query)
            .bind(user_id)
            .bind(region_id)
            .fetch_optional(pool)
            .await
    }

    /// Distinct-labeler counts for a job's regions, zero-filled.
    ///
    /// Every region of the job appears in the result, including those with
    /// no labels at all; downstream threshold comparisons depend on that.
    /// `region_ids` restricts the result to a subset (still zero-filling).
    /// `exclude_user` ignores that labeler's own submissions, which is how
    /// "completed by others" is computed.
    pub async fn label_counts(
        pool: &SqlitePool,
        job_id: DbId,
        region_ids: Option<&[DbId]>,
        exclude_user: Option<&str>,
    ) -> Result<HashMap<DbId, i64>, sqlx::Error> {
        // The user filter must live in the JOIN condition, not the WHERE
        // clause, or unlabeled regions would drop out of the LEFT JOIN.
        let mut query = String::from(
            "SELECT r.id, COUNT(DISTINCT ul.user_id) AS n_labelers \
             FROM job_regions r \
             LEFT JOIN user_labels ul ON ul.region_id = r.id",
        );
        if exclude_user.is_some() {
            query.push_str(" AND ul.user_id <> ?");
        }
        query.push_str(" WHERE r.job_id = ?");
        if let Some(ids) = region_ids {
            let placeholders = vec!["?"; ids.len()].join(", ");
            query.push_str(&format!(" AND r.id IN ({placeholders})"));
        }
        query.push_str(" GROUP BY r.id");

        let mut q = sqlx::query_as::<_, (DbId, i64)>(&query);
        if let Some(user) = exclude_user {
            q = q.bind(user);
        }
        q = q.bind(job_id);
        if let Some(ids) = region_ids {
            for id in ids {
                q = q.bind(*id);
            }
        }

        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().collect())
    }

    /// Regions a labeler has submitted labels for within a job, newest first.
    pub async fn user_labeled_regions(
        pool: &SqlitePool,
        job_id: DbId,
        user_id: &str,
    ) -> Result<Vec<LabeledRegion>, sqlx::Error> {
        sqlx::query_as::<_, LabeledRegion>(
            "SELECT ul.region_id, r.experiment_id, ul.submitted_at \
             FROM user_labels ul \
             JOIN job_regions r ON r.id = ul.region_id \
             WHERE r.job_id = ? AND ul.user_id = ? \
             ORDER BY ul.submitted_at DESC, ul.region_id DESC",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Export every submitted label joined to its experiment id.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LabelExportRow>, sqlx::Error> {
        sqlx::query_as::<_, LabelExportRow>(
            "SELECT r.experiment_id, ul.user_id, ul.labels \
             FROM user_labels ul \
             JOIN job_regions r ON r.id = ul.region_id \
             ORDER BY r.experiment_id, ul.user_id",
        )
        .fetch_all(pool)
        .await
    }

    /// Total number of label rows. Consumed by the backup task to detect
    /// new submissions.
    pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_labels")
            .fetch_one(pool)
            .await
    }
}
