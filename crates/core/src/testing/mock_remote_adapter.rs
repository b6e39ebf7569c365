//! Mock remote adapter for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{ItemId, RawgGame, SortKey};
use crate::remote::{AdapterError, FetchParams, RawPage, RemoteAdapter};

/// Mock implementation of the RemoteAdapter trait.
///
/// Provides controllable behavior for testing:
/// - Serve a fixed page, or slice a configured game list by page
/// - Track fetch parameters for assertions
/// - Simulate failures and slow upstreams
///
/// # Example
///
/// ```rust,ignore
/// use playaxis_core::testing::{MockRemoteAdapter, fixtures};
///
/// let adapter = MockRemoteAdapter::new();
/// adapter.set_games(fixtures::raw_games(1..=30)).await;
///
/// // Page 2 of 12 returns games 13..=24 and a total of 30
/// ```
#[derive(Debug, Default)]
pub struct MockRemoteAdapter {
    /// Games sliced into pages when no fixed page is set.
    games: Arc<RwLock<Vec<RawgGame>>>,
    /// If set, returned for every page request.
    page: Arc<RwLock<Option<RawPage>>>,
    /// Detail records by id.
    items: Arc<RwLock<HashMap<ItemId, RawgGame>>>,
    /// Recorded page requests.
    params: Arc<RwLock<Vec<FetchParams>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<AdapterError>>>,
    unsupported: HashSet<SortKey>,
    delay: Option<Duration>,
}

impl MockRemoteAdapter {
    /// Create a new empty mock adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `key` as unsupported.
    pub fn with_unsupported_sort(mut self, key: SortKey) -> Self {
        self.unsupported.insert(key);
        self
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    // =========================================================================
    // Response Configuration
    // =========================================================================

    /// Serve `games` sliced by the requested page.
    pub async fn set_games(&self, games: Vec<RawgGame>) {
        *self.games.write().await = games;
    }

    /// Serve `page` for every request, whatever the parameters.
    pub async fn set_page(&self, page: RawPage) {
        *self.page.write().await = Some(page);
    }

    /// Add a detail record.
    pub async fn insert_item(&self, game: RawgGame) {
        if let Some(id) = game.id.clone() {
            self.items.write().await.insert(id, game);
        }
    }

    // =========================================================================
    // Request Recording
    // =========================================================================

    /// Get all recorded page requests.
    pub async fn recorded_params(&self) -> Vec<FetchParams> {
        self.params.read().await.clone()
    }

    /// Get the number of page requests performed.
    pub async fn request_count(&self) -> usize {
        self.params.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: AdapterError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<AdapterError> {
        self.next_error.write().await.take()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteAdapter for MockRemoteAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_sort(&self, key: SortKey) -> bool {
        !self.unsupported.contains(&key)
    }

    async fn fetch_page(&self, params: &FetchParams) -> Result<RawPage, AdapterError> {
        self.params.write().await.push(params.clone());
        self.pause().await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        if let Some(page) = self.page.read().await.clone() {
            return Ok(page);
        }

        let games = self.games.read().await;
        let start = (params.page.saturating_sub(1) as usize).saturating_mul(params.page_size as usize);
        let items = games
            .iter()
            .skip(start)
            .take(params.page_size as usize)
            .cloned()
            .collect();

        Ok(RawPage {
            items,
            total_count: games.len() as u64,
        })
    }

    async fn fetch_item(&self, id: &ItemId) -> Result<RawgGame, AdapterError> {
        self.pause().await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        self.items
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("game {}", id)))
    }
}
