//! Account administration endpoints. Mounted behind `require_admin`.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::current_user;
use super::extract::ApiPath;
use super::validation::validate_id;
use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::account::Account;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub user_id: i32,
    pub is_active: bool,
}

/// `GET /api/admin/users`
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Account>>>, ApiError> {
    let accounts = state.auth_service().list_accounts().await?;
    Ok(Json(ApiResponse::success(accounts)))
}

/// `POST /api/admin/users/{id}/toggle`
pub async fn toggle_account(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<ToggleResponse>>, ApiError> {
    let id = validate_id(id)?;
    let is_active = state.auth_service().toggle_active(id).await?;
    Ok(Json(ApiResponse::success(ToggleResponse {
        user_id: id,
        is_active,
    })))
}

/// `DELETE /api/admin/users/{id}`
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id)?;
    let actor = current_user(&session).await?;
    state.auth_service().delete_account(&actor, id).await?;
    Ok(Json(ApiResponse::ok()))
}
