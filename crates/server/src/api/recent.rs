//! Recent search term handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{repository_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecentQueriesResponse {
    pub queries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// GET /api/v1/recent
///
/// Most recent search terms first. `limit` defaults to the configured bound.
pub async fn list_recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> Result<Json<RecentQueriesResponse>, ApiError> {
    let repository = state.repository();
    let limit = params
        .limit
        .unwrap_or(repository.config().recent_query_limit);

    let queries = repository.recent_queries(limit).map_err(repository_error)?;
    Ok(Json(RecentQueriesResponse { queries }))
}

/// DELETE /api/v1/recent
pub async fn clear_recent(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .repository()
        .clear_recent_queries()
        .map_err(repository_error)?;

    Ok(Json(SuccessResponse {
        message: "Recent queries cleared".to_string(),
    }))
}

/// DELETE /api/v1/recent/{query}
pub async fn delete_recent(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .repository()
        .delete_recent_query(&query)
        .map_err(repository_error)?;

    Ok(Json(SuccessResponse {
        message: format!("Removed '{}' from recent queries", query.trim()),
    }))
}
