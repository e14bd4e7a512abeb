//! Search query normalization.
//!
//! Every cache partition and recency entry is keyed by the normalized form
//! of the query, so "Nature", "nature" and "  NATURE " share one key.

/// Query key under which photos fetched by id (not via search) are stored.
pub const DETAIL_QUERY_KEY: &str = "detail";

/// Page index used for photos fetched by id.
pub const DETAIL_PAGE_INDEX: u32 = 0;

/// Search pages are 1-based, so they never share a page index with
/// photos fetched by id, even when the query key is the detail key.
pub const FIRST_SEARCH_PAGE: u32 = 1;

/// Normalize a raw search string into a cache key.
///
/// Trims surrounding whitespace and lower-cases. Idempotent.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
