//! Pexels API client.
//!
//! Pexels authenticates with the raw API key in the `Authorization` header.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Photo, PhotoPage};
use super::{CatalogError, PhotoCatalog};

const DEFAULT_BASE_URL: &str = "https://api.pexels.com";

/// Pexels API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexelsConfig {
    /// Pexels API key (required).
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.pexels.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Pexels API client.
pub struct PexelsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PexelsClient {
    /// Create a new Pexels client.
    pub fn new(config: PexelsConfig) -> Result<Self, CatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::NotConfigured(
                "Pexels API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/v1/search", self.base_url)
    }

    fn photo_url(&self, id: u64) -> String {
        format!("{}/v1/photos/{}", self.base_url, id)
    }

    /// Map non-success statuses to catalog errors, then decode the body.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        not_found: impl FnOnce() -> String,
    ) -> Result<T, CatalogError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::NotConfigured(
                "Invalid Pexels API key".to_string(),
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(not_found()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Format(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PhotoCatalog for PexelsClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<PhotoPage, CatalogError> {
        if page == 0 || per_page == 0 {
            return Err(CatalogError::Api {
                status: 400,
                message: format!("invalid paging: page={}, per_page={}", page, per_page),
            });
        }

        debug!(
            "Pexels search: query='{}', page={}, per_page={}",
            query, page, per_page
        );

        let response = self
            .client
            .get(self.search_url())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;

        Self::decode(response, || format!("Search '{}' page {}", query, page)).await
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Photo, CatalogError> {
        debug!("Pexels get photo: id={}", id);

        let response = self
            .client
            .get(self.photo_url(id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        Self::decode(response, || format!("Photo ID {}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let result = PexelsClient::new(PexelsConfig::default());
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));

        let result = PexelsClient::new(PexelsConfig {
            api_key: "   ".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[test]
    fn test_default_base_url() {
        let client = PexelsClient::new(PexelsConfig {
            api_key: "key".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://api.pexels.com");
        assert_eq!(client.search_url(), "https://api.pexels.com/v1/search");
        assert_eq!(client.photo_url(42), "https://api.pexels.com/v1/photos/42");
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let client = PexelsClient::new(PexelsConfig {
            api_key: "key".to_string(),
            base_url: Some("http://localhost:9000/".to_string()),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.photo_url(7), "http://localhost:9000/v1/photos/7");
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_paging_without_request() {
        let client = PexelsClient::new(PexelsConfig {
            api_key: "key".to_string(),
            // Nothing listens here; a request would fail with Network.
            base_url: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.search("nature", 0, 15).await.unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 400, .. }));

        let err = client.search("nature", 1, 0).await.unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = PexelsClient::new(PexelsConfig {
            api_key: "key".to_string(),
            base_url: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.fetch_by_id(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
    }
}
