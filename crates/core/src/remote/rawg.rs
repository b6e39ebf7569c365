//! RAWG video game database API client.
//!
//! RAWG requires an API key passed as the `key` query parameter.
//! List endpoints are paged with `page` / `page_size` and return the total
//! match count alongside the results.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AdapterError, FetchParams, RawPage, RemoteAdapter};
use crate::catalog::{decode_rawg_games, ItemId, RawgGame, SortKey};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

const SERVICE: &str = "rawg";

/// RAWG API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawgConfig {
    /// RAWG API key. When empty, the `RAWG_API_KEY` environment variable is used.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.rawg.io/api).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP client timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Release window used for trending games.
    #[serde(default = "default_trending_window")]
    pub trending_window: String,
    /// Number of trending games to fetch.
    #[serde(default = "default_trending_page_size")]
    pub trending_page_size: u32,
}

impl Default for RawgConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            trending_window: default_trending_window(),
            trending_page_size: default_trending_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_trending_window() -> String {
    "2023-01-01,2024-12-31".to_string()
}

fn default_trending_page_size() -> u32 {
    10
}

/// RAWG API client.
pub struct RawgClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RawgClient {
    /// Create a new RAWG client.
    pub fn new(config: RawgConfig) -> Result<Self, AdapterError> {
        if config.api_key.trim().is_empty() {
            return Err(AdapterError::NotConfigured(
                "RAWG API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| AdapterError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Map a sort key to RAWG's `ordering` parameter.
    pub fn ordering(key: SortKey) -> &'static str {
        match key {
            SortKey::RatingDesc => "-rating",
            SortKey::ReleaseDesc => "-released",
            SortKey::NameAsc => "name",
            SortKey::RecentlyAdded => "-added",
        }
    }

    /// Query-string pairs for a list request (without the API key).
    pub fn list_query(params: &FetchParams) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", params.page.to_string()),
            ("page_size", params.page_size.to_string()),
        ];
        if let Some(key) = params.ordering {
            query.push(("ordering", Self::ordering(key).to_string()));
        }
        let optional = [
            ("search", &params.search),
            ("genres", &params.genre),
            ("platforms", &params.platform),
            ("dates", &params.dates),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query.push((name, value.to_string()));
            }
        }
        query
    }

    /// Parse a `/games` list body. Entries are decoded one at a time, so a
    /// single unreadable record is skipped instead of failing the page.
    pub fn parse_list(body: &str) -> Result<RawPage, AdapterError> {
        let list: RawgListResponse = serde_json::from_str(body).map_err(|e| {
            AdapterError::Parse(format!("Failed to parse games list response: {}", e))
        })?;
        Ok(list.into())
    }

    /// Send a GET request and record service metrics.
    async fn get(
        &self,
        operation: &str,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Response, AdapterError> {
        let start = Instant::now();
        let result = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&[SERVICE, operation])
            .observe(start.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(r) if r.status().is_success() => "success",
            _ => "error",
        };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[SERVICE, operation, outcome])
            .inc();

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("RAWG {} failed: {} {}", operation, status, body);
            return Err(AdapterError::from_status(status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteAdapter for RawgClient {
    fn name(&self) -> &str {
        "RAWG"
    }

    async fn fetch_page(&self, params: &FetchParams) -> Result<RawPage, AdapterError> {
        let url = format!("{}/games", self.base_url);
        let query = Self::list_query(params);

        debug!("RAWG list games: {:?}", query);

        let response = self.get("list_games", &url, &query).await?;
        let body = response.text().await?;

        Self::parse_list(&body)
    }

    async fn fetch_item(&self, id: &ItemId) -> Result<RawgGame, AdapterError> {
        let url = format!("{}/games/{}", self.base_url, id);

        debug!("RAWG get game: id={}", id);

        let response = self.get("get_game", &url, &[]).await?;
        response.json().await.map_err(|e| {
            AdapterError::Parse(format!("Failed to parse game response: {}", e))
        })
    }
}

// ============================================================================
// RAWG API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawgListResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl From<RawgListResponse> for RawPage {
    fn from(r: RawgListResponse) -> Self {
        Self {
            items: decode_rawg_games(r.results),
            total_count: r.count,
        }
    }
}
