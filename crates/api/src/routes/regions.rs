//! Route definitions for the `/regions` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::{labels, regions};
use crate::state::AppState;

/// Routes mounted at `/regions`.
///
/// ```text
/// GET  /{id}          -> get_region
/// GET  /{id}/labels   -> get_labels
/// POST /{id}/labels   -> submit_labels
/// PUT  /{id}/labels   -> update_labels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(regions::get_region))
        .route(
            "/{id}/labels",
            get(labels::get_labels)
                .post(labels::submit_labels)
                .put(labels::update_labels),
        )
}
