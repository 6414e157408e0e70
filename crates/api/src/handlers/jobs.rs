//! Handlers for the `/jobs` resource: job listing and creation, the current
//! job, region assignment, progress stats, and submission history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use roilabel_core::allocation;
use roilabel_core::error::CoreError;
use roilabel_core::geometry::{validate_region_bounds, MotionBorder};
use roilabel_core::types::DbId;
use roilabel_db::models::labeling_job::LabelingJob;
use roilabel_db::models::region::{CreateRegion, JobRegion};
use roilabel_db::repositories::{JobRepo, LabelRepo, RegionRepo};

use crate::engine::allocator::{self, AllocationPolicy};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request / response types
   -------------------------------------------------------------------------- */

/// Request body for `POST /jobs`: the administrative population step.
#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub regions: Vec<CreateRegion>,
}

/// Response payload for `POST /jobs`.
#[derive(Debug, Serialize)]
pub struct CreatedJob {
    pub job: LabelingJob,
    pub regions_created: usize,
}

/// Response payload for `GET /jobs/current`.
#[derive(Debug, Serialize)]
pub struct CurrentJob {
    pub job_id: DbId,
}

/// Response payload for `GET /jobs/{id}/next-region`.
///
/// Null fields signal exhaustion: nothing is left for this labeler.
#[derive(Debug, Serialize)]
pub struct NextRegionResponse {
    pub experiment_id: Option<String>,
    pub region: Option<JobRegion>,
}

/// Progress aggregate for `GET /jobs/{id}/stats`.
#[derive(Debug, Serialize)]
pub struct LabelStats {
    /// Regions the requesting labeler has submitted labels for.
    pub user_labeled_count: i64,
    /// Total regions in the job.
    pub total: i64,
    /// Regions at or over the completion threshold.
    pub completed_count: i64,
    /// Regions complete even without the requesting labeler's submissions.
    pub completed_by_others_count: i64,
    pub required_per_region: Option<i64>,
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// GET /jobs
///
/// List all labeling jobs, newest first.
pub async fn list_jobs(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /jobs/current
///
/// The most recently created job. 404 when no job exists yet.
pub async fn current_job(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let job_id = JobRepo::current_job_id(&state.pool).await?;
    Ok(Json(DataResponse {
        data: CurrentJob { job_id },
    }))
}

/// POST /jobs
///
/// Create a labeling job with its regions. Every region is bounds-checked
/// against the configured field of view before anything is written.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    if input.regions.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "a labeling job needs at least one region".into(),
        )));
    }
    for region in &input.regions {
        validate_region_bounds(&region.rect(), state.config.field_of_view, MotionBorder::NONE)
            .map_err(AppError::Core)?;
    }

    let job = JobRepo::create(&state.pool).await?;
    for region in &input.regions {
        RegionRepo::insert(&state.pool, job.job_id, region).await?;
    }

    tracing::info!(
        user_id = %auth.user_id,
        job_id = job.job_id,
        regions = input.regions.len(),
        "Labeling job created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedJob {
                regions_created: input.regions.len(),
                job,
            },
        }),
    ))
}

/// GET /jobs/{id}/next-region
///
/// Assign the next region to the requesting labeler. Returns null fields
/// once every region is either labeled by this labeler or complete.
pub async fn next_region(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state, job_id).await?;

    let policy = AllocationPolicy {
        labelers_required_per_region: state.config.labelers_required_per_region,
        prioritize_by_label_count: state.config.prioritize_by_label_count,
    };

    let mut rng = StdRng::from_os_rng();
    let region =
        allocator::next_region(&state.pool, job_id, &auth.user_id, policy, &mut rng)
            .await?;

    match region {
        Some(region) => {
            tracing::info!(
                user_id = %auth.user_id,
                job_id,
                region_id = region.id,
                "Region assigned"
            );
            Ok(Json(NextRegionResponse {
                experiment_id: Some(region.experiment_id.clone()),
                region: Some(region),
            }))
        }
        None => {
            tracing::info!(user_id = %auth.user_id, job_id, "No regions left to label");
            Ok(Json(NextRegionResponse {
                experiment_id: None,
                region: None,
            }))
        }
    }
}

/// GET /jobs/{id}/stats
///
/// Read-only progress aggregate for the requesting labeler.
pub async fn label_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state, job_id).await?;

    let threshold =
        allocation::normalize_threshold(state.config.labelers_required_per_region);

    let user_labeled =
        LabelRepo::user_labeled_regions(&state.pool, job_id, &auth.user_id).await?;
    let total = RegionRepo::count_by_job(&state.pool, job_id).await?;

    let counts = LabelRepo::label_counts(&state.pool, job_id, None, None).await?;
    let completed_count = allocation::completed_regions(&counts, threshold).len() as i64;

    let counts_without_user =
        LabelRepo::label_counts(&state.pool, job_id, None, Some(&auth.user_id)).await?;
    let completed_by_others_count =
        allocation::completed_regions(&counts_without_user, threshold).len() as i64;

    Ok(Json(DataResponse {
        data: LabelStats {
            user_labeled_count: user_labeled.len() as i64,
            total,
            completed_count,
            completed_by_others_count,
            required_per_region: threshold,
        },
    }))
}

/// GET /jobs/{id}/labeled
///
/// The requesting labeler's submission history for a job, newest first.
pub async fn user_labeled(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state, job_id).await?;

    let labeled = LabelRepo::user_labeled_regions(&state.pool, job_id, &auth.user_id).await?;
    Ok(Json(DataResponse { data: labeled }))
}

/* --------------------------------------------------------------------------
   Helpers
   -------------------------------------------------------------------------- */

async fn ensure_job_exists(state: &AppState, job_id: DbId) -> Result<(), AppError> {
    JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LabelingJob",
            id: job_id,
        }))?;
    Ok(())
}
