//! The repository itself.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use tracing::{debug, error, info, warn};

use super::snapshots::snapshot_stream;
use super::{RepositoryConfig, RepositoryError, SearchResult};
use crate::catalog::{Photo, PhotoCatalog};
use crate::metrics;
use crate::query::{normalize_query, DETAIL_PAGE_INDEX, DETAIL_QUERY_KEY, FIRST_SEARCH_PAGE};
use crate::store::{CachedPhoto, PhotoStore, RecentQueryStore};

/// Cache-first access to the remote photo catalog.
///
/// Every operation is independent: nothing here is locked across calls, so
/// a favorite toggle can run while a search is waiting on the network.
/// Concurrent writes to the same photo resolve last-writer-wins at the
/// store.
pub struct PhotoRepository {
    catalog: Arc<dyn PhotoCatalog>,
    photos: Arc<dyn PhotoStore>,
    recent: Arc<dyn RecentQueryStore>,
    config: RepositoryConfig,
}

impl PhotoRepository {
    pub fn new(
        catalog: Arc<dyn PhotoCatalog>,
        photos: Arc<dyn PhotoStore>,
        recent: Arc<dyn RecentQueryStore>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            catalog,
            photos,
            recent,
            config,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search with the configured default page size.
    pub async fn search_photos_default_page_size(
        &self,
        query: &str,
        page: u32,
        force_refresh: bool,
    ) -> Result<SearchResult, RepositoryError> {
        self.search_photos(query, page, self.config.default_per_page, force_refresh)
            .await
    }

    /// Search one page of photos.
    ///
    /// Serves the cached page unless `force_refresh` is set or nothing is
    /// cached for it. A remote fetch replaces the cached page, keeps any
    /// favorite flags already stored and sweeps expired rows for the query.
    /// If the remote call fails, the cached page (if any) is returned with
    /// `has_next_page = false`.
    pub async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        force_refresh: bool,
    ) -> Result<SearchResult, RepositoryError> {
        if page < FIRST_SEARCH_PAGE {
            return Err(RepositoryError::InvalidRequest(format!(
                "page must be >= {}, got {}",
                FIRST_SEARCH_PAGE, page
            )));
        }
        if per_page == 0 {
            return Err(RepositoryError::InvalidRequest(
                "per_page must be >= 1".to_string(),
            ));
        }

        let query_key = normalize_query(query);
        self.record_recent_query(&query_key);

        if !force_refresh {
            let cached = self.cached_page(&query_key, page);
            if !cached.is_empty() {
                debug!(
                    "Cache hit for '{}' page {} ({} photos)",
                    query_key,
                    page,
                    cached.len()
                );
                metrics::SEARCHES_TOTAL.with_label_values(&["cache"]).inc();
                return Ok(SearchResult {
                    photos: cached,
                    has_next_page: true,
                    from_cache: true,
                });
            }
            debug!("Cache miss for '{}' page {}", query_key, page);
        } else {
            debug!("Forced refresh for '{}' page {}", query_key, page);
        }

        let started = Instant::now();
        let fetched = self.catalog.search(query, page, per_page).await;
        metrics::record_remote_call("search", started.elapsed().as_secs_f64(), fetched.is_ok());

        let remote_page = match fetched {
            Ok(remote_page) => remote_page,
            Err(e) => {
                warn!("Remote search for '{}' page {} failed: {}", query_key, page, e);
                let cached = self.cached_page(&query_key, page);
                if cached.is_empty() {
                    metrics::SEARCHES_TOTAL.with_label_values(&["failed"]).inc();
                    error!("No cached fallback for '{}' page {}", query_key, page);
                    return Err(e.into());
                }

                info!(
                    "Serving {} stale cached photos for '{}' page {}",
                    cached.len(),
                    query_key,
                    page
                );
                metrics::SEARCHES_TOTAL
                    .with_label_values(&["stale_cache"])
                    .inc();
                return Ok(SearchResult {
                    photos: cached,
                    has_next_page: false,
                    from_cache: true,
                });
            }
        };

        let now = Utc::now();
        let rows: Vec<CachedPhoto> = remote_page
            .photos
            .iter()
            .map(|photo| {
                CachedPhoto::from_photo(
                    photo,
                    query_key.as_str(),
                    page,
                    self.existing_favorite(photo.id),
                    now,
                )
            })
            .collect();

        if let Err(e) = self.photos.upsert_many(&rows) {
            error!("Failed to cache '{}' page {}: {}", query_key, page, e);
            return Err(e.into());
        }
        debug!(
            "Cached {} photos for '{}' page {}",
            rows.len(),
            query_key,
            page
        );

        self.sweep_expired(&query_key, now);
        metrics::SEARCHES_TOTAL.with_label_values(&["remote"]).inc();

        let has_next_page = remote_page.has_more();
        Ok(SearchResult {
            photos: remote_page.photos,
            has_next_page,
            from_cache: false,
        })
    }

    /// Photos cached for the most recent search, page 1 only.
    pub fn cached_photos_for_last_search(&self) -> Result<Vec<Photo>, RepositoryError> {
        let Some(query_key) = self.last_searched_query()? else {
            return Ok(Vec::new());
        };

        let rows = self.photos.get_by_query_and_page(&query_key, 1)?;
        Ok(to_photos(rows))
    }

    /// The most recently used search term, if any.
    pub fn last_searched_query(&self) -> Result<Option<String>, RepositoryError> {
        let mut recent = self.recent.most_recent(1)?;
        Ok(recent.pop().map(|entry| entry.query))
    }

    // =========================================================================
    // Details
    // =========================================================================

    /// Get a photo by id.
    ///
    /// A cached row is returned as-is regardless of its age. Otherwise the
    /// photo is fetched and cached under the detail key.
    pub async fn get_photo_by_id(&self, id: u64) -> Result<Photo, RepositoryError> {
        match self.photos.get_by_id(id) {
            Ok(Some(cached)) => {
                debug!("Cache hit for photo {}", id);
                return Ok(cached.to_photo());
            }
            Ok(None) => debug!("Cache miss for photo {}", id),
            Err(e) => warn!("Failed to read cached photo {}: {}", id, e),
        }

        let started = Instant::now();
        let fetched = self.catalog.fetch_by_id(id).await;
        metrics::record_remote_call(
            "fetch_by_id",
            started.elapsed().as_secs_f64(),
            fetched.is_ok(),
        );

        let photo = match fetched {
            Ok(photo) => photo,
            Err(e) => {
                error!("Failed to fetch photo {}: {}", id, e);
                return Err(e.into());
            }
        };

        let row = CachedPhoto::from_photo(
            &photo,
            DETAIL_QUERY_KEY,
            DETAIL_PAGE_INDEX,
            self.existing_favorite(photo.id),
            Utc::now(),
        );
        self.photos.upsert_one(&row)?;
        debug!("Cached photo {} under detail key", id);

        Ok(photo)
    }

    /// Observe a single cached photo. Yields `None` while it is not cached.
    pub fn watch_photo(&self, id: u64) -> BoxStream<'static, Result<Option<Photo>, RepositoryError>> {
        let store = Arc::downgrade(&self.photos);
        snapshot_stream(self.photos.changes(), move || {
            let store = store.upgrade()?;
            Some(
                store
                    .get_by_id(id)
                    .map(|row| row.map(|row| row.to_photo()))
                    .map_err(RepositoryError::from),
            )
        })
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Flip the favorite flag and return the stored value.
    ///
    /// Photos that are not cached stay absent and report `false`.
    pub fn toggle_favorite(&self, id: u64) -> Result<bool, RepositoryError> {
        let current = self.photos.is_favorite(id)?.unwrap_or(false);
        self.photos.set_favorite(id, !current)?;
        let stored = self.photos.is_favorite(id)?.unwrap_or(false);
        info!("Toggled favorite for photo {}: {} -> {}", id, current, stored);
        Ok(stored)
    }

    pub fn set_favorite(&self, id: u64, value: bool) -> Result<(), RepositoryError> {
        self.photos.set_favorite(id, value)?;
        info!("Set favorite for photo {} to {}", id, value);
        Ok(())
    }

    /// Favorite flag, `false` for photos that are not cached.
    pub fn is_favorite(&self, id: u64) -> Result<bool, RepositoryError> {
        Ok(self.photos.is_favorite(id)?.unwrap_or(false))
    }

    /// All favorites, most recently updated first.
    pub fn list_favorites(&self) -> Result<Vec<Photo>, RepositoryError> {
        Ok(to_photos(self.photos.list_favorites()?))
    }

    /// Observe the favorites list.
    pub fn watch_favorites(&self) -> BoxStream<'static, Result<Vec<Photo>, RepositoryError>> {
        let store = Arc::downgrade(&self.photos);
        snapshot_stream(self.photos.changes(), move || {
            let store = store.upgrade()?;
            Some(
                store
                    .list_favorites()
                    .map(to_photos)
                    .map_err(RepositoryError::from),
            )
        })
    }

    // =========================================================================
    // Recent queries
    // =========================================================================

    /// Up to `limit` recent search terms, most recent first.
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .recent
            .most_recent(limit)?
            .into_iter()
            .map(|entry| entry.query)
            .collect())
    }

    /// Observe the recent search terms.
    pub fn watch_recent_queries(
        &self,
        limit: usize,
    ) -> BoxStream<'static, Result<Vec<String>, RepositoryError>> {
        let store = Arc::downgrade(&self.recent);
        snapshot_stream(self.recent.changes(), move || {
            let store = store.upgrade()?;
            Some(
                store
                    .most_recent(limit)
                    .map(|entries| entries.into_iter().map(|entry| entry.query).collect())
                    .map_err(RepositoryError::from),
            )
        })
    }

    pub fn delete_recent_query(&self, query: &str) -> Result<(), RepositoryError> {
        let query_key = normalize_query(query);
        self.recent.delete(&query_key)?;
        debug!("Deleted recent query '{}'", query_key);
        Ok(())
    }

    pub fn clear_recent_queries(&self) -> Result<(), RepositoryError> {
        self.recent.clear_all()?;
        info!("Cleared recent queries");
        Ok(())
    }

    // =========================================================================
    // Cache maintenance
    // =========================================================================

    /// Drop every non-favorite row. Returns the number of rows removed.
    pub fn clear_cache(&self) -> Result<u64, RepositoryError> {
        let removed = self.photos.clear_non_favorites()?;
        info!("Cleared cache ({} rows removed)", removed);
        Ok(removed)
    }

    /// Drop the non-favorite search rows of one query so the next search
    /// refetches. Photos fetched by id are kept.
    pub fn refresh_cache(&self, query: &str) -> Result<u64, RepositoryError> {
        let query_key = normalize_query(query);
        let removed = self
            .photos
            .delete_all_for_query(&query_key, FIRST_SEARCH_PAGE, false)?;
        info!("Invalidated cache for '{}' ({} rows removed)", query_key, removed);
        Ok(removed)
    }

    /// Drop every cached row, favorites included.
    pub fn purge_everything(&self) -> Result<u64, RepositoryError> {
        let removed = self.photos.delete_everything()?;
        warn!("Purged all cached photos including favorites ({} rows)", removed);
        Ok(removed)
    }

    /// Number of rows cached for a query's search pages.
    pub fn cache_count_for_query(&self, query: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .photos
            .count_for_query(&normalize_query(query), FIRST_SEARCH_PAGE)?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn cached_page(&self, query_key: &str, page: u32) -> Vec<Photo> {
        match self.photos.get_by_query_and_page(query_key, page) {
            Ok(rows) => to_photos(rows),
            Err(e) => {
                warn!(
                    "Failed to read cached page {} for '{}': {}",
                    page, query_key, e
                );
                Vec::new()
            }
        }
    }

    fn existing_favorite(&self, id: u64) -> bool {
        match self.photos.is_favorite(id) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!("Failed to read favorite flag for photo {}: {}", id, e);
                false
            }
        }
    }

    fn record_recent_query(&self, query_key: &str) {
        if let Err(e) = self.recent.touch(query_key) {
            warn!("Failed to record recent query '{}': {}", query_key, e);
            return;
        }
        if let Err(e) = self.recent.retain_only(self.config.recent_query_limit) {
            warn!("Failed to trim recent queries: {}", e);
        }
    }

    fn sweep_expired(&self, query_key: &str, now: DateTime<Utc>) {
        let Some(cutoff) = chrono::Duration::from_std(self.config.max_age)
            .ok()
            .and_then(|max_age| now.checked_sub_signed(max_age))
        else {
            return;
        };

        match self
            .photos
            .delete_older_than(query_key, FIRST_SEARCH_PAGE, cutoff)
        {
            Ok(0) => {}
            Ok(removed) => {
                metrics::CACHE_ROWS_EVICTED.inc_by(removed);
                debug!("Swept {} expired rows for '{}'", removed, query_key);
            }
            Err(e) => warn!("Expiry sweep for '{}' failed: {}", query_key, e),
        }
    }
}

fn to_photos(rows: Vec<CachedPhoto>) -> Vec<Photo> {
    rows.iter().map(CachedPhoto::to_photo).collect()
}
