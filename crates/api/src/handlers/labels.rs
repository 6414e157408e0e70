//! Handlers for label submission, review, revision, and export.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use roilabel_core::error::CoreError;
use roilabel_core::labels::{validate_labels, RoiLabel};
use roilabel_core::types::DbId;
use roilabel_db::models::user_label::SubmitLabels;
use roilabel_db::repositories::LabelRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::regions::ensure_region_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /regions/{id}/labels`.
#[derive(Debug, Deserialize)]
pub struct UpdateLabels {
    pub labels: Vec<RoiLabel>,
}

/// POST /regions/{id}/labels
///
/// Submit the authenticated labeler's verdict set for a region. A
/// resubmission replaces the previous one; there is never more than one
/// record per (labeler, region).
pub async fn submit_labels(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
    Json(input): Json<SubmitLabels>,
) -> AppResult<impl IntoResponse> {
    ensure_region_exists(&state.pool, region_id).await?;
    validate_labels(&input.labels).map_err(AppError::Core)?;

    let label = LabelRepo::upsert(
        &state.pool,
        &auth.user_id,
        region_id,
        &input.labels,
        input.duration_secs,
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        region_id,
        rois = input.labels.len(),
        "Labels submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: label })))
}

/// GET /regions/{id}/labels
///
/// The authenticated labeler's previously submitted labels for a region.
pub async fn get_labels(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let label = LabelRepo::find(&state.pool, &auth.user_id, region_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "UserLabel",
            id: region_id,
        }))?;
    Ok(Json(DataResponse { data: label }))
}

/// PUT /regions/{id}/labels
///
/// Revise a previously submitted verdict set. 404 when the labeler has not
/// submitted labels for the region yet.
pub async fn update_labels(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
    Json(input): Json<UpdateLabels>,
) -> AppResult<impl IntoResponse> {
    validate_labels(&input.labels).map_err(AppError::Core)?;

    let label = LabelRepo::update_labels(&state.pool, &auth.user_id, region_id, &input.labels)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "UserLabel",
            id: region_id,
        }))?;

    tracing::info!(user_id = %auth.user_id, region_id, "Labels updated");

    Ok(Json(DataResponse { data: label }))
}

/// GET /labels
///
/// Export every submitted label joined to its experiment, for downstream
/// quality control.
pub async fn export_labels(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let labels = LabelRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: labels }))
}
