//! Repository configuration.

use std::time::Duration;

use crate::config::CacheConfig;

/// Tunables for [`super::PhotoRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Non-favorite rows older than this are swept after a successful refetch.
    pub max_age: Duration,
    /// Upper bound on the recent query list.
    pub recent_query_limit: usize,
    /// Page size used by [`super::PhotoRepository::search_photos_default_page_size`].
    pub default_per_page: u32,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_millis(86_400_000),
            recent_query_limit: 10,
            default_per_page: 15,
        }
    }
}

impl From<&CacheConfig> for RepositoryConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_age: Duration::from_millis(config.max_age_ms),
            recent_query_limit: config.recent_query_limit,
            default_per_page: config.default_per_page,
        }
    }
}
