use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::extract::ApiJson;
use super::{ApiError, ApiResponse, AppState};
use crate::models::account::SessionUser;
use crate::services::{AuthError, RegisterRequest};

/// Session key holding the [`SessionUser`] snapshot.
pub const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::AuthFailed(err.to_string()),
            AuthError::AccountDisabled => Self::AccountDisabled(err.to_string()),
            AuthError::UsernameTaken(_) => Self::Conflict(err.to_string()),
            AuthError::NotFound(id) => Self::not_found("Account", id),
            AuthError::Forbidden(msg) => Self::Forbidden(msg),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a logged-in session.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_user(&session).await?;
    tracing::Span::current().record("user_id", user.id);
    Ok(next.run(request).await)
}

/// Rejects requests whose session role is not admin.
pub async fn require_admin(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_user(&session).await?;
    if !user.role.is_admin() {
        tracing::info!(user_id = user.id, path = %request.uri().path(), "Admin route refused");
        return Err(ApiError::forbidden("Admin role required"));
    }
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<SessionUser>>, ApiError> {
    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    establish_session(&session, &user).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/register
/// Creates a regular account and logs it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Json<ApiResponse<SessionUser>>, ApiError> {
    let user = state.auth_service().register(payload).await?;

    establish_session(&session, &user).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;
    Ok(Json(ApiResponse::ok()))
}

/// GET /auth/current
pub async fn current(session: Session) -> Result<Json<ApiResponse<SessionUser>>, ApiError> {
    let user = current_user(&session).await?;
    Ok(Json(ApiResponse::success(user)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get the logged-in user from the session, or `Unauthenticated`.
pub async fn current_user(session: &Session) -> Result<SessionUser, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(ApiError::unauthenticated)
}

/// Stores the user under a fresh session id.
async fn establish_session(session: &Session, user: &SessionUser) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}
