//! Photo search, detail and favorite handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use photocache_core::{Photo, SearchResult};
use serde::{Deserialize, Serialize};

use super::error::{bad_request, repository_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub refresh: bool,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct LastSearchResponse {
    pub query: Option<String>,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub struct SetFavoriteRequest {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: u64,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub photos: Vec<Photo>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/photos/search
///
/// Search one page of photos, cache first.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResult>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    if params.page == 0 {
        return Err(bad_request("page starts at 1"));
    }
    if params.per_page == Some(0) {
        return Err(bad_request("per_page must be greater than 0"));
    }

    let repository = state.repository();
    let result = match params.per_page {
        Some(per_page) => {
            repository
                .search_photos(&params.query, params.page, per_page, params.refresh)
                .await
        }
        None => {
            repository
                .search_photos_default_page_size(&params.query, params.page, params.refresh)
                .await
        }
    };

    result.map(Json).map_err(repository_error)
}

/// GET /api/v1/photos/last-search
///
/// Cached first page of the most recent search.
pub async fn last_search(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LastSearchResponse>, ApiError> {
    let repository = state.repository();
    let query = repository.last_searched_query().map_err(repository_error)?;
    let photos = repository
        .cached_photos_for_last_search()
        .map_err(repository_error)?;

    Ok(Json(LastSearchResponse { query, photos }))
}

/// GET /api/v1/photos/{id}
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Photo>, ApiError> {
    state
        .repository()
        .get_photo_by_id(id)
        .await
        .map(Json)
        .map_err(repository_error)
}

/// GET /api/v1/photos/{id}/favorite
pub async fn get_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let is_favorite = state.repository().is_favorite(id).map_err(repository_error)?;
    Ok(Json(FavoriteResponse { id, is_favorite }))
}

/// PUT /api/v1/photos/{id}/favorite
///
/// Responds with the stored flag, which stays `false` for photos that are
/// not cached.
pub async fn set_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(request): Json<SetFavoriteRequest>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let repository = state.repository();
    repository
        .set_favorite(id, request.is_favorite)
        .map_err(repository_error)?;
    let is_favorite = repository.is_favorite(id).map_err(repository_error)?;

    Ok(Json(FavoriteResponse { id, is_favorite }))
}

/// POST /api/v1/photos/{id}/favorite/toggle
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let is_favorite = state
        .repository()
        .toggle_favorite(id)
        .map_err(repository_error)?;
    Ok(Json(FavoriteResponse { id, is_favorite }))
}

/// GET /api/v1/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let photos = state
        .repository()
        .list_favorites()
        .map_err(repository_error)?;
    let total = photos.len();
    Ok(Json(FavoritesResponse { photos, total }))
}
