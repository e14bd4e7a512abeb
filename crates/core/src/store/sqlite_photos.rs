//! SQLite-backed photo cache implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;

use super::types::millis_to_datetime;
use super::{CachedPhoto, ChangeNotifier, PhotoStore, StoreError};

const PHOTO_COLUMNS: &str = "id, width, height, photographer, url, original_url, large_url, \
     medium_url, small_url, query_key, page_index, is_favorite, updated_at";

const UPSERT_SQL: &str = "INSERT INTO photos (id, width, height, photographer, url, original_url,
        large_url, medium_url, small_url, query_key, page_index, is_favorite, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
     ON CONFLICT(id) DO UPDATE SET
        width = excluded.width,
        height = excluded.height,
        photographer = excluded.photographer,
        url = excluded.url,
        original_url = excluded.original_url,
        large_url = excluded.large_url,
        medium_url = excluded.medium_url,
        small_url = excluded.small_url,
        query_key = excluded.query_key,
        page_index = excluded.page_index,
        is_favorite = photos.is_favorite OR excluded.is_favorite,
        updated_at = excluded.updated_at";

/// SQLite-backed photo cache.
pub struct SqlitePhotoStore {
    conn: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl SqlitePhotoStore {
    /// Open the photo cache at `path`, creating the file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory photo cache (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            notifier: ChangeNotifier::new(),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- One row per catalog photo id
            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                photographer TEXT NOT NULL,
                url TEXT NOT NULL,
                original_url TEXT NOT NULL,
                large_url TEXT NOT NULL,
                medium_url TEXT NOT NULL,
                small_url TEXT NOT NULL,
                query_key TEXT NOT NULL,
                page_index INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_photos_query_page ON photos(query_key, page_index);
            CREATE INDEX IF NOT EXISTS idx_photos_favorite ON photos(is_favorite);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("photo store connection poisoned".to_string()))
    }

    fn upsert(conn: &Connection, photo: &CachedPhoto) -> Result<(), StoreError> {
        let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
        stmt.execute(params![
            photo.id as i64,
            photo.width,
            photo.height,
            &photo.photographer,
            &photo.url,
            &photo.original_url,
            &photo.large_url,
            &photo.medium_url,
            &photo.small_url,
            &photo.query_key,
            photo.page_index,
            photo.is_favorite,
            photo.updated_at.timestamp_millis(),
        ])?;
        Ok(())
    }

    fn row_to_cached_photo(row: &rusqlite::Row) -> rusqlite::Result<CachedPhoto> {
        let id: i64 = row.get(0)?;
        let updated_at: i64 = row.get(12)?;

        Ok(CachedPhoto {
            id: id as u64,
            width: row.get(1)?,
            height: row.get(2)?,
            photographer: row.get(3)?,
            url: row.get(4)?,
            original_url: row.get(5)?,
            large_url: row.get(6)?,
            medium_url: row.get(7)?,
            small_url: row.get(8)?,
            query_key: row.get(9)?,
            page_index: row.get(10)?,
            is_favorite: row.get(11)?,
            updated_at: millis_to_datetime(updated_at),
        })
    }

    fn query_photos(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<CachedPhoto>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_cached_photo)?;

        let mut photos = Vec::new();
        for row in rows {
            photos.push(row?);
        }
        Ok(photos)
    }

    /// Run a delete and notify subscribers if anything went away.
    fn delete_where(&self, sql: &str, params: impl rusqlite::Params) -> Result<u64, StoreError> {
        let deleted = self.conn()?.execute(sql, params)? as u64;
        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(deleted)
    }
}

impl PhotoStore for SqlitePhotoStore {
    fn upsert_many(&self, photos: &[CachedPhoto]) -> Result<(), StoreError> {
        if photos.is_empty() {
            return Ok(());
        }

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            for photo in photos {
                Self::upsert(&tx, photo)?;
            }
            tx.commit()?;
        }

        self.notifier.notify();
        Ok(())
    }

    fn upsert_one(&self, photo: &CachedPhoto) -> Result<(), StoreError> {
        {
            let conn = self.conn()?;
            Self::upsert(&conn, photo)?;
        }
        self.notifier.notify();
        Ok(())
    }

    fn get_by_query_and_page(
        &self,
        query_key: &str,
        page: u32,
    ) -> Result<Vec<CachedPhoto>, StoreError> {
        let conn = self.conn()?;
        Self::query_photos(
            &conn,
            &format!(
                "SELECT {} FROM photos WHERE query_key = ?1 AND page_index = ?2
                 ORDER BY page_index ASC, id ASC",
                PHOTO_COLUMNS
            ),
            params![query_key, page],
        )
    }

    fn get_by_id(&self, id: u64) -> Result<Option<CachedPhoto>, StoreError> {
        let conn = self.conn()?;
        let photo = conn
            .query_row(
                &format!("SELECT {} FROM photos WHERE id = ?1", PHOTO_COLUMNS),
                params![id as i64],
                Self::row_to_cached_photo,
            )
            .optional()?;
        Ok(photo)
    }

    fn count_for_query(&self, query_key: &str, min_page: u32) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE query_key = ?1 AND page_index >= ?2",
            params![query_key, min_page],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn set_favorite(&self, id: u64, value: bool) -> Result<(), StoreError> {
        let updated = self.conn()?.execute(
            "UPDATE photos SET is_favorite = ?1 WHERE id = ?2",
            params![value, id as i64],
        )?;
        if updated > 0 {
            self.notifier.notify();
        }
        Ok(())
    }

    fn is_favorite(&self, id: u64) -> Result<Option<bool>, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT is_favorite FROM photos WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn list_favorites(&self) -> Result<Vec<CachedPhoto>, StoreError> {
        let conn = self.conn()?;
        Self::query_photos(
            &conn,
            &format!(
                "SELECT {} FROM photos WHERE is_favorite = 1
                 ORDER BY updated_at DESC, id ASC",
                PHOTO_COLUMNS
            ),
            [],
        )
    }

    fn delete_older_than(
        &self,
        query_key: &str,
        min_page: u32,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.delete_where(
            "DELETE FROM photos
             WHERE query_key = ?1 AND page_index >= ?2 AND is_favorite = 0 AND updated_at < ?3",
            params![query_key, min_page, cutoff.timestamp_millis()],
        )
    }

    fn delete_all_for_query(
        &self,
        query_key: &str,
        min_page: u32,
        include_favorites: bool,
    ) -> Result<u64, StoreError> {
        if include_favorites {
            self.delete_where(
                "DELETE FROM photos WHERE query_key = ?1 AND page_index >= ?2",
                params![query_key, min_page],
            )
        } else {
            self.delete_where(
                "DELETE FROM photos WHERE query_key = ?1 AND page_index >= ?2 AND is_favorite = 0",
                params![query_key, min_page],
            )
        }
    }

    fn clear_non_favorites(&self) -> Result<u64, StoreError> {
        self.delete_where("DELETE FROM photos WHERE is_favorite = 0", [])
    }

    fn delete_everything(&self) -> Result<u64, StoreError> {
        self.delete_where("DELETE FROM photos", [])
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}
