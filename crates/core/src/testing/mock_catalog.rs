//! Mock photo catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, Photo, PhotoCatalog, PhotoPage};
use crate::query::normalize_query;

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogCall {
    Search {
        query: String,
        page: u32,
        per_page: u32,
    },
    FetchById {
        id: u64,
    },
}

/// Mock implementation of the PhotoCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable pages and single photos
/// - Track calls for assertions
/// - Simulate one-off failures, a dead network, or slow responses
#[derive(Debug, Clone)]
pub struct MockPhotoCatalog {
    /// Search pages by (normalized query, page).
    pages: Arc<RwLock<HashMap<(String, u32), PhotoPage>>>,
    /// Photos served by `fetch_by_id`.
    photos: Arc<RwLock<HashMap<u64, Photo>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// When true, every operation fails with a network error.
    offline: Arc<RwLock<bool>>,
    /// Delay applied before answering.
    latency: Arc<RwLock<Duration>>,
}

impl Default for MockPhotoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPhotoCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            photos: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            offline: Arc::new(RwLock::new(false)),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the page returned for a query. Queries match after normalization.
    pub async fn set_page(&self, query: &str, page: u32, photos: PhotoPage) {
        self.pages
            .write()
            .await
            .insert((normalize_query(query), page), photos);
    }

    /// Add a photo served by `fetch_by_id`.
    pub async fn add_photo(&self, photo: Photo) {
        self.photos.write().await.insert(photo.id, photo);
    }

    /// Simulate a dead network.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Delay every response by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Get the number of calls performed, failed ones included.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Record the call, wait out the latency, then report any injected failure.
    async fn begin(&self, call: RecordedCatalogCall) -> Result<(), CatalogError> {
        self.calls.write().await.push(call);

        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if *self.offline.read().await {
            return Err(CatalogError::Network("mock catalog is offline".to_string()));
        }
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PhotoCatalog for MockPhotoCatalog {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotoPage, CatalogError> {
        self.begin(RecordedCatalogCall::Search {
            query: query.to_string(),
            page,
            per_page,
        })
        .await?;

        Ok(self
            .pages
            .read()
            .await
            .get(&(normalize_query(query), page))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Photo, CatalogError> {
        self.begin(RecordedCatalogCall::FetchById { id }).await?;

        if let Some(photo) = self.photos.read().await.get(&id) {
            return Ok(photo.clone());
        }

        self.pages
            .read()
            .await
            .values()
            .flat_map(|page| page.photos.iter())
            .find(|photo| photo.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Photo {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_search_matches_normalized_query() {
        let catalog = MockPhotoCatalog::new();
        catalog
            .set_page("Nature", 1, fixtures::photo_page(1, 3, true))
            .await;

        let page = catalog.search("  NATURE ", 1, 15).await.unwrap();
        assert_eq!(page.photos.len(), 3);
        assert!(page.has_more());

        let empty = catalog.search("nature", 2, 15).await.unwrap();
        assert!(empty.photos.is_empty());
        assert!(!empty.has_more());

        assert_eq!(
            catalog.recorded_calls().await[0],
            RecordedCatalogCall::Search {
                query: "  NATURE ".to_string(),
                page: 1,
                per_page: 15,
            }
        );
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let catalog = MockPhotoCatalog::new();
        catalog
            .set_next_error(CatalogError::Format("garbage".to_string()))
            .await;

        assert!(matches!(
            catalog.search("cats", 1, 15).await,
            Err(CatalogError::Format(_))
        ));
        assert!(catalog.search("cats", 1, 15).await.is_ok());
        assert_eq!(catalog.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let catalog = MockPhotoCatalog::new();
        catalog.add_photo(fixtures::photo(7)).await;
        catalog.set_offline(true).await;

        assert!(matches!(
            catalog.fetch_by_id(7).await,
            Err(CatalogError::Network(_))
        ));
        catalog.set_offline(false).await;
        assert_eq!(catalog.fetch_by_id(7).await.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_fetch_by_id_falls_back_to_pages() {
        let catalog = MockPhotoCatalog::new();
        catalog
            .set_page("dogs", 1, fixtures::photo_page(10, 2, false))
            .await;

        assert_eq!(catalog.fetch_by_id(11).await.unwrap().id, 11);
        assert!(matches!(
            catalog.fetch_by_id(99).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
