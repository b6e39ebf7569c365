//! Remote catalog adapters.
//!
//! A remote adapter serves pre-filtered, pre-sorted pages from a third-party
//! catalog API. The query engine forwards parameters to it and trusts the
//! returned total count.

mod rawg;

pub use rawg::{RawgClient, RawgConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{ItemId, RawgGame, SortKey};

/// Errors that can occur when talking to a remote catalog.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Connection could not be established or was interrupted.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the client's deadline.
    #[error("Request timed out")]
    Timeout,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API rejected the request (4xx other than 404).
    #[error("Client error: {status} - {message}")]
    Client { status: u16, message: String },

    /// The API failed (5xx).
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Adapter not configured (missing API key, etc.).
    #[error("Adapter not configured: {0}")]
    NotConfigured(String),
}

impl AdapterError {
    /// Classify an HTTP error status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => AdapterError::NotFound(message),
            400..=499 => AdapterError::Client { status, message },
            _ => AdapterError::Server { status, message },
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::Network(_) => "network",
            AdapterError::Timeout => "timeout",
            AdapterError::NotFound(_) => "not_found",
            AdapterError::Client { .. } => "client",
            AdapterError::Server { .. } => "server",
            AdapterError::Parse(_) => "parse",
            AdapterError::NotConfigured(_) => "not_configured",
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdapterError::Timeout
        } else if e.is_decode() {
            AdapterError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            AdapterError::from_status(status.as_u16(), e.to_string())
        } else {
            AdapterError::Network(e.to_string())
        }
    }
}

/// Parameters forwarded to a remote adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Adapter-specific genre value (RAWG accepts slugs or ids).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Adapter-specific platform value (RAWG accepts numeric ids).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Release date window, `YYYY-MM-DD,YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
}

impl FetchParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ordering: None,
            search: None,
            genre: None,
            platform: None,
            dates: None,
        }
    }
}

/// One page of raw records plus the upstream's total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    pub items: Vec<RawgGame>,
    pub total_count: u64,
}

/// Trait for remote catalog sources.
#[async_trait]
pub trait RemoteAdapter: Send + Sync {
    /// Human-readable adapter name.
    fn name(&self) -> &str;

    /// Whether the adapter can order results by `key`.
    fn supports_sort(&self, _key: SortKey) -> bool {
        true
    }

    /// Fetch one page of records matching `params`.
    async fn fetch_page(&self, params: &FetchParams) -> Result<RawPage, AdapterError>;

    /// Fetch the full record of a single item.
    async fn fetch_item(&self, id: &ItemId) -> Result<RawgGame, AdapterError>;
}
