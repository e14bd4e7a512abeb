//! Local persistent cache: photo rows and recent search terms.
//!
//! Both stores are synchronous. Each SQLite implementation owns its
//! connection behind a mutex, so single-row writes and batches are atomic
//! with respect to readers.

mod notify;
mod sqlite_photos;
mod sqlite_recent;
mod types;

pub use notify::ChangeNotifier;
pub use sqlite_photos::SqlitePhotoStore;
pub use sqlite_recent::SqliteRecentQueryStore;
pub use types::*;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Trait for cached photo storage.
pub trait PhotoStore: Send + Sync {
    /// Insert or replace photos by id, atomically as one batch.
    ///
    /// All fields are replaced except `is_favorite`, which is only ever
    /// raised by an upsert; clearing it requires [`PhotoStore::set_favorite`].
    fn upsert_many(&self, photos: &[CachedPhoto]) -> Result<(), StoreError>;

    /// Insert or replace a single photo. Same semantics as `upsert_many`.
    fn upsert_one(&self, photo: &CachedPhoto) -> Result<(), StoreError>;

    /// Photos stored under a query key and page, ordered by id ascending.
    fn get_by_query_and_page(
        &self,
        query_key: &str,
        page: u32,
    ) -> Result<Vec<CachedPhoto>, StoreError>;

    /// Get a photo by id.
    fn get_by_id(&self, id: u64) -> Result<Option<CachedPhoto>, StoreError>;

    /// Number of photos stored under a query key on pages `>= min_page`.
    fn count_for_query(&self, query_key: &str, min_page: u32) -> Result<u64, StoreError>;

    /// Set the favorite flag. No-op if the photo is not cached.
    fn set_favorite(&self, id: u64, value: bool) -> Result<(), StoreError>;

    /// Favorite flag, `None` if the photo is not cached.
    fn is_favorite(&self, id: u64) -> Result<Option<bool>, StoreError>;

    /// All favorites, most recently updated first.
    fn list_favorites(&self) -> Result<Vec<CachedPhoto>, StoreError>;

    /// Delete non-favorite rows for a key on pages `>= min_page` last
    /// written before `cutoff`.
    ///
    /// Returns the number of rows deleted.
    fn delete_older_than(
        &self,
        query_key: &str,
        min_page: u32,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Delete rows for a key on pages `>= min_page`, optionally including
    /// favorites.
    fn delete_all_for_query(
        &self,
        query_key: &str,
        min_page: u32,
        include_favorites: bool,
    ) -> Result<u64, StoreError>;

    /// Delete every non-favorite row.
    fn clear_non_favorites(&self) -> Result<u64, StoreError>;

    /// Delete every row, favorites included.
    fn delete_everything(&self) -> Result<u64, StoreError>;

    /// Subscribe to row changes.
    fn changes(&self) -> watch::Receiver<u64>;
}

/// Trait for the bounded most-recently-used list of search terms.
pub trait RecentQueryStore: Send + Sync {
    /// Insert the query or refresh its timestamp. No-op for an empty key.
    fn touch(&self, query: &str) -> Result<(), StoreError>;

    /// Up to `limit` queries, most recently used first.
    fn most_recent(&self, limit: usize) -> Result<Vec<RecentQuery>, StoreError>;

    /// Remove a query.
    fn delete(&self, query: &str) -> Result<(), StoreError>;

    /// Remove all queries.
    fn clear_all(&self) -> Result<(), StoreError>;

    /// Keep only the `limit` most recently used queries.
    ///
    /// Returns the number of rows deleted.
    fn retain_only(&self, limit: usize) -> Result<u64, StoreError>;

    /// Subscribe to row changes.
    fn changes(&self) -> watch::Receiver<u64>;
}
