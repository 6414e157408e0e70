//! Integration tests for email-only registration, login, and the auth seam.

mod common;

use axum::http::StatusCode;
use common::{expect_status, get, get_auth, post_json};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn register_issues_a_token_and_normalizes_the_email(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        &json!({ "email": "  Ada@Example.org " }),
    )
    .await;
    let json = expect_status(response, StatusCode::CREATED).await;

    assert_eq!(json["user_id"], "ada@example.org");
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(json["expires_in"].as_i64().is_some_and(|e| e > 0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_registration_is_a_conflict(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "ada@example.org" });
    let first = post_json(app.clone(), "/api/v1/auth/register", None, &body).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/v1/auth/register", None, &body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_email_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        &json!({ "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_requires_a_registered_email(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        &json!({ "email": "ghost@example.org" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    post_json(
        app.clone(),
        "/api/v1/auth/register",
        None,
        &json!({ "email": "ada@example.org" }),
    )
    .await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": "ada@example.org" }),
    )
    .await;
    let json = expect_status(response, StatusCode::OK).await;
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_the_token_subject(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", "ada@example.org").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["user_id"], "ada@example.org");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn users_lists_registered_labelers(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    for email in ["ada@example.org", "grace@example.org"] {
        post_json(
            app.clone(),
            "/api/v1/auth/register",
            None,
            &json!({ "email": email }),
        )
        .await;
    }

    let response = get_auth(app, "/api/v1/auth/users", "ada@example.org").await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(
        json["data"],
        json!(["ada@example.org", "grace@example.org"])
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_routes_reject_missing_or_malformed_tokens(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/jobs").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = axum::http::Request::builder()
        .uri("/api/v1/jobs")
        .header("Authorization", "Bearer not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
