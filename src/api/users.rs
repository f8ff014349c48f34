use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{CurrentUser, establish_session};
use super::validation::require_params;
use super::{ApiError, AppState, UserDto};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /users/
pub async fn get_authenticated_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state.auth_service().get_user(&user_id).await?;
    Ok(Json(UserDto::from(user)))
}

/// POST /users/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let Json(payload) = payload?;
    let [username, email, password] = require_params([
        payload.username.as_deref(),
        payload.email.as_deref(),
        payload.password.as_deref(),
    ])?;

    let user = state
        .auth_service()
        .signup(username, email, password)
        .await?;

    establish_session(&session, &user.id).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// POST /users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let Json(payload) = payload?;
    let [username, password] =
        require_params([payload.username.as_deref(), payload.password.as_deref()])?;

    let user = state.auth_service().login(username, password).await?;

    establish_session(&session, &user.id).await?;
    tracing::info!(user_id = %user.id, "User logged in: {}", user.username);

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// POST /users/logout
pub async fn logout(session: Session) -> Result<StatusCode, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to destroy session: {e}")))?;

    Ok(StatusCode::OK)
}
