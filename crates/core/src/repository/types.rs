use serde::Serialize;

use crate::catalog::Photo;

/// One page of search results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    pub photos: Vec<Photo>,
    /// Whether another page may exist. Always true on a cache hit, always
    /// false on a stale fallback.
    pub has_next_page: bool,
    /// Served from the local store rather than the remote catalog.
    pub from_cache: bool,
}
