//! Handlers for the `/regions` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use roilabel_core::error::CoreError;
use roilabel_core::types::DbId;
use roilabel_db::models::region::JobRegion;
use roilabel_db::repositories::RegionRepo;
use roilabel_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /regions/{id}
///
/// Look up a single region by id.
pub async fn get_region(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let region = ensure_region_exists(&state.pool, region_id).await?;
    Ok(Json(DataResponse { data: region }))
}

/// Fetch a region or fail with a 404, for handlers that need the row.
pub async fn ensure_region_exists(
    pool: &DbPool,
    region_id: DbId,
) -> Result<JobRegion, AppError> {
    RegionRepo::find_by_id(pool, region_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Region",
            id: region_id,
        }))
}
