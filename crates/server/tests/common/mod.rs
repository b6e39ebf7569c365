//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock games adapter injected, so the HTTP surface can be exercised
//! without reaching RAWG.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use playaxis_core::{
    datasets, testing::MockRemoteAdapter, CatalogConfig, Config, LocalCatalog, RawgConfig,
    RemoteAdapter,
};
use playaxis_server::state::AppState;

/// Re-export fixtures for test convenience
pub use playaxis_core::testing::fixtures;

/// Test fixture with a controllable games adapter.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_all_games() {
///     let fixture = TestFixture::new().await;
///     fixture.games.set_page(fixtures::raw_page(1..=12, 527)).await;
///
///     let response = fixture.get("/api/all-games").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock games adapter - configure pages, details and failures
    pub games: Arc<MockRemoteAdapter>,
    /// Shared state, for triggering shutdown
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wire the mock games adapter into the state
    pub with_games: bool,
    /// Serve bundled games when trending fails
    pub fallback: bool,
    pub page_cap: u32,
    /// Upstream deadline
    pub timeout: Duration,
    /// Artificial latency of the mock adapter
    pub adapter_delay: Option<Duration>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_games: true,
            fallback: true,
            page_cap: 50,
            timeout: Duration::from_secs(5),
            adapter_delay: None,
        }
    }
}

impl TestConfig {
    /// Config with no games adapter, as when RAWG is not configured.
    pub fn without_games() -> Self {
        Self {
            with_games: false,
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let mut adapter = MockRemoteAdapter::new();
        if let Some(delay) = test_config.adapter_delay {
            adapter = adapter.with_delay(delay);
        }
        let games = Arc::new(adapter);

        let config = Config {
            catalog: CatalogConfig {
                page_cap: test_config.page_cap,
                upstream_timeout_secs: test_config.timeout.as_secs().max(1),
                serve_fallback_on_upstream_error: test_config.fallback,
                ..Default::default()
            },
            rawg: test_config.with_games.then(|| RawgConfig {
                api_key: "test-key".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let cars = datasets::car_catalog().expect("Failed to load cars");
        let fallback_games = LocalCatalog::from_records(
            "fallback_games",
            &datasets::fallback_games().expect("Failed to load fallback games"),
        );

        let adapter: Option<Arc<dyn RemoteAdapter>> = if test_config.with_games {
            Some(Arc::clone(&games) as Arc<dyn RemoteAdapter>)
        } else {
            None
        };

        let state = Arc::new(AppState::new(config, cars, fallback_games, adapter));
        let router = playaxis_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            games,
            state,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
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

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
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

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
