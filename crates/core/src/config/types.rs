use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::catalog::{EngineConfig, DEFAULT_PAGE_CAP, DEFAULT_PAGE_SIZE};
use crate::remote::RawgConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// RAWG games API. Without it the games endpoints answer 503
    /// (trending games fall back to the bundled list).
    #[serde(default)]
    pub rawg: Option<RawgConfig>,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    5000
}

/// Query engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Page size used when a request does not give one (default: 12).
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Upper bound on reported page counts (default: 50).
    #[serde(default = "default_page_cap")]
    pub page_cap: u32,
    /// Deadline for one upstream call in seconds (default: 10).
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
    /// Serve the bundled trending list, marked degraded, when RAWG fails.
    #[serde(default = "default_true")]
    pub serve_fallback_on_upstream_error: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            page_cap: default_page_cap(),
            upstream_timeout_secs: default_upstream_timeout(),
            serve_fallback_on_upstream_error: true,
        }
    }
}

impl CatalogConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            page_cap: self.page_cap,
        }
    }

    pub fn upstream_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_cap() -> u32 {
    DEFAULT_PAGE_CAP
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://playaxis.vercel.app".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rawg: Option<SanitizedRawgConfig>,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// Sanitized RAWG config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRawgConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub trending_window: String,
    pub trending_page_size: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: config.catalog.clone(),
            rawg: config.rawg.as_ref().map(|r| SanitizedRawgConfig {
                base_url: r.base_url.clone(),
                api_key_configured: !r.api_key.trim().is_empty(),
                timeout_secs: r.timeout_secs,
                trending_window: r.trending_window.clone(),
                trending_page_size: r.trending_page_size,
            }),
            cors: config.cors.clone(),
            logging: config.logging.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.catalog.default_page_size, 12);
        assert_eq!(config.catalog.page_cap, 50);
        assert!(config.catalog.serve_fallback_on_upstream_error);
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.rawg.is_none());
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            rawg: Some(RawgConfig {
                api_key: "secret-key".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(sanitized.rawg.unwrap().api_key_configured);
    }
}
