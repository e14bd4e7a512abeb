//! Remote photo catalog.
//!
//! The repository only talks to the catalog through [`PhotoCatalog`], so the
//! HTTP client can be swapped for a mock in tests.

mod pexels;
mod types;

pub use pexels::{PexelsClient, PexelsConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Response did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Format(String),

    /// Remote reports no such resource.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Format(e.to_string())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

/// Trait for remote photo catalogs.
#[async_trait]
pub trait PhotoCatalog: Send + Sync {
    /// Search photos by query. `page` is 1-based, `per_page` is positive.
    async fn search(&self, query: &str, page: u32, per_page: u32)
        -> Result<PhotoPage, CatalogError>;

    /// Fetch a single photo by its catalog id.
    async fn fetch_by_id(&self, id: u64) -> Result<Photo, CatalogError>;
}
