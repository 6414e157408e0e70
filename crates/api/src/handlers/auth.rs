//! Handlers for the `/auth` resource (register, login, me, users).
//!
//! Identity is email-only: registration inserts the address, login checks
//! it exists, and both issue an HS256 access token. There are no passwords;
//! the labeling pool is a closed group and the service is not internet-facing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use roilabel_core::error::CoreError;
use roilabel_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user_id: String,
}

/// Response payload for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Register a new labeler email and issue an access token.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email)?;

    if UserRepo::find_by_id(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "That email address is already registered".into(),
        )));
    }

    let user = UserRepo::create(&state.pool, &email).await?;
    tracing::info!(user_id = %user.id, "Labeler registered");

    let response = issue_token(&state, &user.id)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
///
/// Issue an access token for a registered labeler email.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email)?;

    let user = UserRepo::find_by_id(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "That email address is not registered".into(),
            ))
        })?;

    tracing::info!(user_id = %user.id, "Labeler logged in");

    let response = issue_token(&state, &user.id)?;
    Ok(Json(response))
}

/// GET /auth/me
///
/// The authenticated labeler's id.
pub async fn me(auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: MeResponse {
            user_id: auth.user_id,
        },
    }))
}

/// GET /auth/users
///
/// List all registered labeler ids.
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_ids(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "a valid email address is required".into(),
        )));
    }
    Ok(email)
}

fn issue_token(state: &AppState, user_id: &str) -> Result<AuthResponse, AppError> {
    let token = generate_access_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))?;
    Ok(AuthResponse {
        access_token: token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user_id: user_id.to_string(),
    })
}
