use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;

use roilabel_api::auth::jwt::{generate_access_token, JwtConfig};
use roilabel_api::config::{BackupConfig, ServerConfig};
use roilabel_api::router::build_app_router;
use roilabel_api::state::AppState;
use roilabel_core::geometry::FieldOfView;

/// Build a test `ServerConfig` with safe defaults: threshold 3,
/// prioritization on, 512x512 field of view.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_path: PathBuf::from("test.db"),
        field_of_view: FieldOfView::DEFAULT,
        labelers_required_per_region: Some(3),
        prioritize_by_label_count: true,
        backup: BackupConfig {
            dir: PathBuf::from("backups"),
            interval_secs: 300,
            retention_count: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 720,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the application router with a customized configuration (e.g. a
/// different completion threshold).
pub fn build_test_app_with(pool: SqlitePool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A signed access token for the given labeler, matching `test_config`'s
/// JWT secret.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

/// Issue an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a GET request with a Bearer token for `user_id`.
pub async fn get_auth(app: Router, uri: &str, user_id: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a JSON POST request, authenticated when `user_id` is given.
pub async fn post_json(
    app: Router,
    uri: &str,
    user_id: Option<&str>,
    body: &serde_json::Value,
) -> Response {
    send_json(app, "POST", uri, user_id, body).await
}

/// Issue a JSON PUT request, authenticated when `user_id` is given.
pub async fn put_json(
    app: Router,
    uri: &str,
    user_id: Option<&str>,
    body: &serde_json::Value,
) -> Response {
    send_json(app, "PUT", uri, user_id, body).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    user_id: Option<&str>,
    body: &serde_json::Value,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("Authorization", format!("Bearer {}", token_for(user_id)));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the parsed body for further assertions.
pub async fn expect_status(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
