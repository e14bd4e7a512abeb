//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock photo catalog injected, so the full HTTP stack runs without
//! network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use photocache_core::{
    config::{CacheConfig, DatabaseConfig, ServerConfig},
    testing::MockPhotoCatalog,
    Config, PexelsConfig, PhotoRepository, RepositoryConfig, SqlitePhotoStore,
    SqliteRecentQueryStore,
};

/// Re-export fixtures for test convenience
pub use photocache_core::testing::fixtures;

/// Test fixture for E2E testing with a mock catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.set_page("nature", 1, fixtures::photo_page(1, 15, true)).await;
///
///     let response = fixture.get("/api/v1/photos/search?query=nature").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure pages, photos and failures
    pub catalog: Arc<MockPhotoCatalog>,
    /// Repository behind the router, for direct assertions
    pub repository: Arc<PhotoRepository>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default cache settings.
    pub async fn new() -> Self {
        Self::with_cache_config(CacheConfig::default()).await
    }

    /// Create a test fixture with custom cache settings.
    pub async fn with_cache_config(cache: CacheConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            pexels: PexelsConfig {
                api_key: "test-key".to_string(),
                ..Default::default()
            },
            cache,
        };

        let catalog = Arc::new(MockPhotoCatalog::new());
        let photos =
            Arc::new(SqlitePhotoStore::new(&db_path).expect("Failed to create photo store"));
        let recent = Arc::new(
            SqliteRecentQueryStore::new(&db_path).expect("Failed to create recent query store"),
        );

        let repository = Arc::new(PhotoRepository::new(
            Arc::clone(&catalog) as Arc<dyn photocache_core::PhotoCatalog>,
            photos,
            recent,
            RepositoryConfig::from(&config.cache),
        ));

        let state = Arc::new(photocache_server::state::AppState::new(
            config,
            Arc::clone(&repository),
        ));
        let router = photocache_server::api::create_router(state);

        Self {
            router,
            catalog,
            repository,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
