//! Text-generation endpoints.
//!
//! Upstream failures become `503` envelopes; nothing here touches the
//! availability of the directory routes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiQuery};
use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::{AssistantError, DraftEmailRequest, RankedSearch, SummaryRequest};

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: String,
}

#[derive(Debug, Serialize)]
pub struct ExpandResponse {
    pub query: String,
    pub keywords: Vec<String>,
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Upstream(e) => Self::UpstreamUnavailable(e.to_string()),
            AssistantError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `POST /api/ai/summary`
pub async fn summary(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SummaryRequest>,
) -> Result<Json<ApiResponse<SummaryResponse>>, ApiError> {
    let summary = state.assistant().summarize(request).await?;
    Ok(Json(ApiResponse::success(SummaryResponse { summary })))
}

/// `POST /api/ai/draft_email`
pub async fn draft_email(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DraftEmailRequest>,
) -> Result<Json<ApiResponse<DraftResponse>>, ApiError> {
    let draft = state.assistant().draft_email(request).await?;
    Ok(Json(ApiResponse::success(DraftResponse { draft })))
}

/// `GET /api/ai/search?q=`
///
/// Returns the model's ranking verbatim alongside the candidates it saw.
pub async fn search(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TextQuery>,
) -> Result<Json<ApiResponse<RankedSearch>>, ApiError> {
    let result = state.assistant().ranked_search(&query.q).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// `GET /api/ai/expand?q=`
pub async fn expand(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TextQuery>,
) -> Json<ApiResponse<ExpandResponse>> {
    let keywords = state.assistant().expand(&query.q).await;
    Json(ApiResponse::success(ExpandResponse {
        query: query.q.trim().to_string(),
        keywords,
    }))
}
