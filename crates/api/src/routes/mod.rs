pub mod auth;
pub mod health;
pub mod jobs;
pub mod regions;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register labeler, issue token (public)
/// /auth/login                      issue token for registered labeler (public)
/// /auth/me                         authenticated labeler id
/// /auth/users                      list registered labelers
///
/// /jobs                            list jobs, create job with regions
/// /jobs/current                    most recently created job
/// /jobs/{id}/next-region           assign the next region to this labeler
/// /jobs/{id}/stats                 progress aggregate
/// /jobs/{id}/labeled               this labeler's submission history
///
/// /regions/{id}                    region lookup
/// /regions/{id}/labels             submit (POST), review (GET), revise (PUT)
///
/// /labels                          full label export
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/jobs", jobs::router())
        .nest("/regions", regions::router())
        .route("/labels", get(handlers::labels::export_labels))
}
