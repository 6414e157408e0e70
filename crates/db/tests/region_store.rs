//! Integration tests for the region store: jobs, regions, and label upserts.
//!
//! Exercises the repository layer against a real database:
//! - Job creation and "current job" resolution
//! - Region insert / lookup / listing / exclusion queries
//! - Label upsert atomicity and update-on-resubmit semantics

use roilabel_core::labels::{RoiLabel, RoiVerdict};
use roilabel_core::types::DbId;
use roilabel_db::models::region::CreateRegion;
use roilabel_db::repositories::{JobRepo, LabelRepo, RegionRepo, UserRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_region(experiment_id: &str, x: i64, y: i64) -> CreateRegion {
    CreateRegion {
        experiment_id: experiment_id.to_string(),
        x,
        y,
        width: 128,
        height: 128,
    }
}

fn verdicts(roi_ids: &[DbId]) -> Vec<RoiLabel> {
    roi_ids
        .iter()
        .map(|id| RoiLabel {
            roi_id: *id,
            verdict: RoiVerdict::Cell,
            notes: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn current_job_is_the_most_recently_created(pool: SqlitePool) {
    let first = JobRepo::create(&pool).await.unwrap();
    let second = JobRepo::create(&pool).await.unwrap();

    let current = JobRepo::current_job_id(&pool).await.unwrap();
    assert_eq!(current, second.job_id);
    assert_ne!(current, first.job_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn current_job_with_no_jobs_is_row_not_found(pool: SqlitePool) {
    let result = JobRepo::current_job_id(&pool).await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn list_all_returns_every_job(pool: SqlitePool) {
    JobRepo::create(&pool).await.unwrap();
    JobRepo::create(&pool).await.unwrap();

    let jobs = JobRepo::list_all(&pool).await.unwrap();
    assert_eq!(jobs.len(), 2);
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn insert_and_find_region(pool: SqlitePool) {
    let job = JobRepo::create(&pool).await.unwrap();
    let region = RegionRepo::insert(&pool, job.job_id, &new_region("exp1", 0, 128))
        .await
        .unwrap();

    let found = RegionRepo::find_by_id(&pool, region.id)
        .await
        .unwrap()
        .expect("region should exist");
    assert_eq!(found.job_id, job.job_id);
    assert_eq!(found.experiment_id, "exp1");
    assert_eq!((found.x, found.y), (0, 128));

    assert!(RegionRepo::find_by_id(&pool, region.id + 999)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn regions_are_scoped_to_their_job(pool: SqlitePool) {
    let job_a = JobRepo::create(&pool).await.unwrap();
    let job_b = JobRepo::create(&pool).await.unwrap();

    for x in [0, 128, 256] {
        RegionRepo::insert(&pool, job_a.job_id, &new_region("exp1", x, 0))
            .await
            .unwrap();
    }
    RegionRepo::insert(&pool, job_b.job_id, &new_region("exp2", 0, 0))
        .await
        .unwrap();

    assert_eq!(RegionRepo::count_by_job(&pool, job_a.job_id).await.unwrap(), 3);
    assert_eq!(RegionRepo::count_by_job(&pool, job_b.job_id).await.unwrap(), 1);

    let listed = RegionRepo::list_by_job(&pool, job_a.job_id).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|r| r.job_id == job_a.job_id));
}

#[sqlx::test(migrations = "./migrations")]
async fn exclusion_query_filters_ids(pool: SqlitePool) {
    let job = JobRepo::create(&pool).await.unwrap();
    let mut ids = Vec::new();
    for x in [0, 128, 256, 384] {
        let region = RegionRepo::insert(&pool, job.job_id, &new_region("exp1", x, 0))
            .await
            .unwrap();
        ids.push(region.id);
    }

    // No exclusions: every region comes back.
    let all = RegionRepo::list_ids_excluding(&pool, job.job_id, &[]).await.unwrap();
    assert_eq!(all, ids);

    // Excluding two leaves the other two.
    let remaining = RegionRepo::list_ids_excluding(&pool, job.job_id, &[ids[0], ids[2]])
        .await
        .unwrap();
    assert_eq!(remaining, vec![ids[1], ids[3]]);

    // Excluding everything leaves nothing.
    let none = RegionRepo::list_ids_excluding(&pool, job.job_id, &ids).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Label upserts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn resubmission_updates_in_place(pool: SqlitePool) {
    let job = JobRepo::create(&pool).await.unwrap();
    let region = RegionRepo::insert(&pool, job.job_id, &new_region("exp1", 0, 0))
        .await
        .unwrap();
    UserRepo::create(&pool, "ada@example.org").await.unwrap();

    let first = LabelRepo::upsert(&pool, "ada@example.org", region.id, &verdicts(&[1, 2]), Some(30.0))
        .await
        .unwrap();
    assert_eq!(first.labels.0.len(), 2);

    // Resubmitting replaces the verdicts without creating a second row.
    let second = LabelRepo::upsert(&pool, "ada@example.org", region.id, &verdicts(&[1]), Some(12.5))
        .await
        .unwrap();
    assert_eq!(second.labels.0.len(), 1);
    assert_eq!(second.duration_secs, Some(12.5));
    assert_eq!(LabelRepo::count_all(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_labels_requires_a_prior_submission(pool: SqlitePool) {
    let job = JobRepo::create(&pool).await.unwrap();
    let region = RegionRepo::insert(&pool, job.job_id, &new_region("exp1", 0, 0))
        .await
        .unwrap();
    UserRepo::create(&pool, "ada@example.org").await.unwrap();

    let missing = LabelRepo::update_labels(&pool, "ada@example.org", region.id, &verdicts(&[1]))
        .await
        .unwrap();
    assert!(missing.is_none());

    LabelRepo::upsert(&pool, "ada@example.org", region.id, &verdicts(&[1]), None)
        .await
        .unwrap();
    let updated = LabelRepo::update_labels(&pool, "ada@example.org", region.id, &verdicts(&[1, 2, 3]))
        .await
        .unwrap()
        .expect("submission should exist");
    assert_eq!(updated.labels.0.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn stored_labels_round_trip_with_notes(pool: SqlitePool) {
    let job = JobRepo::create(&pool).await.unwrap();
    let region = RegionRepo::insert(&pool, job.job_id, &new_region("exp1", 0, 0))
        .await
        .unwrap();
    UserRepo::create(&pool, "ada@example.org").await.unwrap();

    let submitted = vec![RoiLabel {
        roi_id: 9,
        verdict: RoiVerdict::NotCell,
        notes: Some("offset from soma".to_string()),
    }];
    LabelRepo::upsert(&pool, "ada@example.org", region.id, &submitted, None)
        .await
        .unwrap();

    let stored = LabelRepo::find(&pool, "ada@example.org", region.id)
        .await
        .unwrap()
        .expect("submission should exist");
    assert_eq!(stored.labels.0, submitted);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_registration_violates_uniqueness(pool: SqlitePool) {
    UserRepo::create(&pool, "ada@example.org").await.unwrap();
    let duplicate = UserRepo::create(&pool, "ada@example.org").await;
    assert!(duplicate.is_err());

    let ids = UserRepo::list_ids(&pool).await.unwrap();
    assert_eq!(ids, vec!["ada@example.org".to_string()]);
}
