//! Types for the local photo cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Photo, PhotoSrc};

/// A cached copy of a catalog photo.
///
/// One row per photo id. The row remembers the query and page it was last
/// fetched under; fetching the same id under another query overwrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedPhoto {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub photographer: String,
    pub url: String,
    pub original_url: String,
    pub large_url: String,
    pub medium_url: String,
    pub small_url: String,
    /// Normalized query this copy was stored under.
    pub query_key: String,
    /// 1-based page this copy came from (0 for detail lookups).
    pub page_index: u32,
    /// User favorite flag, independent of cache freshness.
    pub is_favorite: bool,
    /// Time of last write.
    pub updated_at: DateTime<Utc>,
}

impl CachedPhoto {
    /// Build a cache row from a fetched photo.
    pub fn from_photo(
        photo: &Photo,
        query_key: impl Into<String>,
        page_index: u32,
        is_favorite: bool,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: photo.id,
            width: photo.width,
            height: photo.height,
            photographer: photo.photographer.clone(),
            url: photo.url.clone(),
            original_url: photo.src.original.clone(),
            large_url: photo.src.large.clone(),
            medium_url: photo.src.medium.clone(),
            small_url: photo.src.small.clone(),
            query_key: query_key.into(),
            page_index,
            is_favorite,
            updated_at,
        }
    }

    /// Convert back to the API-facing photo.
    pub fn to_photo(&self) -> Photo {
        Photo {
            id: self.id,
            width: self.width,
            height: self.height,
            url: self.url.clone(),
            photographer: self.photographer.clone(),
            src: PhotoSrc {
                original: self.original_url.clone(),
                large: self.large_url.clone(),
                medium: self.medium_url.clone(),
                small: self.small_url.clone(),
            },
        }
    }
}

/// A remembered search term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentQuery {
    /// Normalized query.
    pub query: String,
    pub last_used_at: DateTime<Utc>,
}

/// Errors for cache store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Convert a persisted millisecond timestamp.
pub(crate) fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}
