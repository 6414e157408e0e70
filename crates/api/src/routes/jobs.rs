//! Route definitions for the `/jobs` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET  /                   -> list_jobs
/// POST /                   -> create_job
/// GET  /current            -> current_job
/// GET  /{id}/next-region   -> next_region
/// GET  /{id}/stats         -> label_stats
/// GET  /{id}/labeled       -> user_labeled
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/current", get(jobs::current_job))
        .route("/{id}/next-region", get(jobs::next_region))
        .route("/{id}/stats", get(jobs::label_stats))
        .route("/{id}/labeled", get(jobs::user_labeled))
}
