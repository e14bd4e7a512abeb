//! SQLite-backed recent search terms.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection};
use tokio::sync::watch;

use super::types::millis_to_datetime;
use super::{ChangeNotifier, RecentQuery, RecentQueryStore, StoreError};
use crate::query::normalize_query;

/// SQLite-backed recent query list.
///
/// Rows are replaced on every touch, so among equal timestamps the most
/// recent touch has the highest rowid and sorts first.
pub struct SqliteRecentQueryStore {
    conn: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl SqliteRecentQueryStore {
    /// Open the recent query list at `path`, creating the file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory recent query list (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recent_queries (
                query TEXT PRIMARY KEY,
                last_used_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recent_queries_last_used ON recent_queries(last_used_at);
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            notifier: ChangeNotifier::new(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("recent query connection poisoned".to_string()))
    }
}

impl RecentQueryStore for SqliteRecentQueryStore {
    fn touch(&self, query: &str) -> Result<(), StoreError> {
        let key = normalize_query(query);
        if key.is_empty() {
            return Ok(());
        }

        self.conn()?.execute(
            "INSERT OR REPLACE INTO recent_queries (query, last_used_at) VALUES (?1, ?2)",
            params![key, Utc::now().timestamp_millis()],
        )?;
        self.notifier.notify();
        Ok(())
    }

    fn most_recent(&self, limit: usize) -> Result<Vec<RecentQuery>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT query, last_used_at FROM recent_queries
             ORDER BY last_used_at DESC, rowid DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let last_used_at: i64 = row.get(1)?;
            Ok(RecentQuery {
                query: row.get(0)?,
                last_used_at: millis_to_datetime(last_used_at),
            })
        })?;

        let mut queries = Vec::new();
        for row in rows {
            queries.push(row?);
        }
        Ok(queries)
    }

    fn delete(&self, query: &str) -> Result<(), StoreError> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM recent_queries WHERE query = ?1", params![query])?;
        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        let deleted = self.conn()?.execute("DELETE FROM recent_queries", [])?;
        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(())
    }

    fn retain_only(&self, limit: usize) -> Result<u64, StoreError> {
        let deleted = self.conn()?.execute(
            "DELETE FROM recent_queries
             WHERE query NOT IN (
                SELECT query FROM recent_queries
                ORDER BY last_used_at DESC, rowid DESC
                LIMIT ?1
             )",
            params![limit as i64],
        )? as u64;
        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(deleted)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteRecentQueryStore {
        SqliteRecentQueryStore::in_memory().unwrap()
    }

    fn queries(store: &SqliteRecentQueryStore, limit: usize) -> Vec<String> {
        store
            .most_recent(limit)
            .unwrap()
            .into_iter()
            .map(|q| q.query)
            .collect()
    }

    #[test]
    fn test_touch_normalizes() {
        let store = create_test_store();
        store.touch("  Nature ").unwrap();
        store.touch("NATURE").unwrap();

        assert_eq!(queries(&store, 10), vec!["nature"]);
    }

    #[test]
    fn test_touch_empty_is_noop() {
        let store = create_test_store();
        let rx = store.changes();
        store.touch("").unwrap();
        store.touch("   \t").unwrap();

        assert!(store.most_recent(10).unwrap().is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_most_recent_orders_descending() {
        let store = create_test_store();
        store.touch("cats").unwrap();
        store.touch("dogs").unwrap();
        store.touch("birds").unwrap();

        assert_eq!(queries(&store, 10), vec!["birds", "dogs", "cats"]);
        assert_eq!(queries(&store, 2), vec!["birds", "dogs"]);

        let recent = store.most_recent(10).unwrap();
        for pair in recent.windows(2) {
            assert!(pair[0].last_used_at >= pair[1].last_used_at);
        }
    }

    #[test]
    fn test_touch_moves_existing_to_front() {
        let store = create_test_store();
        store.touch("cats").unwrap();
        store.touch("dogs").unwrap();
        store.touch("Cats").unwrap();

        assert_eq!(queries(&store, 10), vec!["cats", "dogs"]);
    }

    #[test]
    fn test_retain_only_keeps_most_recent() {
        let store = create_test_store();
        for i in 0..15 {
            store.touch(&format!("query {}", i)).unwrap();
        }

        let deleted = store.retain_only(10).unwrap();
        assert_eq!(deleted, 5);

        let kept = queries(&store, 100);
        assert_eq!(kept.len(), 10);
        assert_eq!(kept[0], "query 14");
        assert_eq!(kept[9], "query 5");
    }

    #[test]
    fn test_bound_holds_after_every_touch() {
        let store = create_test_store();
        for i in 0..40 {
            store.touch(&format!("q{}", i % 13)).unwrap();
            store.retain_only(10).unwrap();
            assert!(store.most_recent(100).unwrap().len() <= 10);
        }
    }

    #[test]
    fn test_retain_only_under_limit_deletes_nothing() {
        let store = create_test_store();
        store.touch("one").unwrap();
        assert_eq!(store.retain_only(10).unwrap(), 0);
        assert_eq!(queries(&store, 10), vec!["one"]);
    }

    #[test]
    fn test_delete_and_clear_all() {
        let store = create_test_store();
        store.touch("cats").unwrap();
        store.touch("dogs").unwrap();

        store.delete("cats").unwrap();
        assert_eq!(queries(&store, 10), vec!["dogs"]);

        store.delete("missing").unwrap();
        store.clear_all().unwrap();
        assert!(store.most_recent(10).unwrap().is_empty());
    }
}
