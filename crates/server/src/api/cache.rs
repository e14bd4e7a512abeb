//! Cache maintenance handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{bad_request, repository_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub removed: u64,
}

#[derive(Debug, Serialize)]
pub struct RefreshCacheResponse {
    pub query: String,
    pub removed: u64,
}

#[derive(Debug, Serialize)]
pub struct CacheCountResponse {
    pub query: String,
    pub count: u64,
}

/// DELETE /api/v1/cache
///
/// Drop every cached photo that is not a favorite.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let removed = state.repository().clear_cache().map_err(repository_error)?;
    Ok(Json(ClearCacheResponse { removed }))
}

/// POST /api/v1/cache/refresh
///
/// Invalidate one query so its next search goes to the remote catalog.
pub async fn refresh_cache(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> Result<Json<RefreshCacheResponse>, ApiError> {
    if body.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let removed = state
        .repository()
        .refresh_cache(&body.query)
        .map_err(repository_error)?;

    Ok(Json(RefreshCacheResponse {
        query: photocache_core::normalize_query(&body.query),
        removed,
    }))
}

/// GET /api/v1/cache/count
pub async fn count_for_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryBody>,
) -> Result<Json<CacheCountResponse>, ApiError> {
    let count = state
        .repository()
        .cache_count_for_query(&params.query)
        .map_err(repository_error)?;

    Ok(Json(CacheCountResponse {
        query: photocache_core::normalize_query(&params.query),
        count,
    }))
}
