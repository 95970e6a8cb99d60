//! Service metadata endpoints.

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

const SERVICE_NAME: &str = "alumni";

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}

/// `GET /`
pub async fn info() -> Json<ApiResponse<InfoResponse>> {
    Json(ApiResponse::success(InfoResponse {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /api/health",
            "POST /api/auth/login",
            "POST /api/auth/register",
            "POST /api/auth/logout",
            "GET /api/auth/current",
            "GET /api/users",
            "POST /api/users",
            "GET /api/users/{id}",
            "PUT /api/users/{id}",
            "DELETE /api/users/{id}",
            "GET /api/admin/users",
            "POST /api/admin/users/{id}/toggle",
            "DELETE /api/admin/users/{id}",
            "POST /api/ai/summary",
            "POST /api/ai/draft_email",
            "GET /api/ai/search",
            "GET /api/ai/expand",
            "GET /api/metrics",
        ],
    }))
}

/// `GET /api/health`
///
/// Answers 503 when the database does not respond to a ping.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Health check database ping failed: {e:#}");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ApiResponse {
        code: status.as_u16(),
        message: if database { "ok" } else { "degraded" }.to_string(),
        data: Some(HealthResponse {
            status: if database { "healthy" } else { "unhealthy" },
            service: SERVICE_NAME,
            database,
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    };

    (status, Json(body)).into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
