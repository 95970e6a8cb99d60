//! Alumni directory endpoints.
//!
//! Handlers only map HTTP to [`AlumniService`](crate::services::AlumniService)
//! calls; validation and not-found semantics live in the service.

use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::{normalize_query, validate_id};
use crate::api::{ApiError, ApiResponse, AppState, IdResponse};
use crate::models::alumni::{AlumniInput, AlumniRecord};
use crate::services::AlumniError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub keyword: Option<String>,
}

impl From<AlumniError> for ApiError {
    fn from(err: AlumniError) -> Self {
        match err {
            AlumniError::NotFound(id) => Self::not_found("Alumni record", id),
            AlumniError::Validation(msg) => Self::validation(msg),
            AlumniError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/users?keyword=`
pub async fn list_alumni(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<AlumniRecord>>>, ApiError> {
    let keyword = normalize_query(query.keyword.as_deref());
    let records = state.alumni_service().list(keyword).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// `GET /api/users/{id}`
pub async fn get_alumni(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<AlumniRecord>>, ApiError> {
    let id = validate_id(id)?;
    let record = state.alumni_service().get(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

/// `POST /api/users`
pub async fn create_alumni(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<AlumniInput>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let id = state.alumni_service().create(input).await?;
    Ok(Json(ApiResponse::success(IdResponse { id })))
}

/// `PUT /api/users/{id}`
///
/// Overwrites every field; omitted optional fields become null.
pub async fn update_alumni(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<AlumniInput>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id)?;
    state.alumni_service().update(id, input).await?;
    Ok(Json(ApiResponse::ok()))
}

/// `DELETE /api/users/{id}`
pub async fn delete_alumni(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(id)?;
    state.alumni_service().delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}
