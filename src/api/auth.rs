use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::validate_username;
use super::{ApiError, AppJson, AppState, MessageResponse, UserDto};
use crate::services::Registration;

/// Session key holding the authenticated user's id.
pub const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Identity of the session owner, inserted by [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i32,
}

// ============================================================================
// Middleware
// ============================================================================

/// Guard for routes that need a logged-in user. Public routes skip it.
pub async fn require_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    tracing::Span::current().record("user_id", user_id);
    request.extensions_mut().insert(CurrentUser { id: user_id });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let username = validate_username(&payload.username)?.to_string();

    let user = state
        .auth_service
        .register(Registration {
            username,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    start_session(&session, user.id).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    start_session(&session, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(UserDto::from(user)))
}

/// POST /api/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Json(MessageResponse::new("Logged out"))
}

/// GET /api/user
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state.auth_service.get_user(current.id).await?;
    Ok(Json(UserDto::from(user)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Rotate the session id and bind it to `user_id`.
async fn start_session(session: &Session, user_id: i32) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(SESSION_USER_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}
