use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::info;

use super::{types::Config, ConfigError};
use crate::remote::RawgConfig;

/// Environment variable consulted for the RAWG key when the config has none.
pub const RAWG_KEY_ENV: &str = "RAWG_API_KEY";

/// Load configuration from file with environment variable overrides.
///
/// `PLAYAXIS_`-prefixed variables override file values, with `__` separating
/// nested keys (`PLAYAXIS_CATALOG__PAGE_CAP=20`). A bare `RAWG_API_KEY` fills
/// in the RAWG key when the file does not set one.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("PLAYAXIS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(apply_rawg_key_fallback(
        config,
        std::env::var(RAWG_KEY_ENV).ok(),
    ))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Use `key` as the RAWG API key unless the config already has one.
///
/// Creates a default `[rawg]` section when none is configured.
pub fn apply_rawg_key_fallback(mut config: Config, key: Option<String>) -> Config {
    let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
        return config;
    };

    match config.rawg.as_mut() {
        Some(rawg) if rawg.api_key.trim().is_empty() => {
            info!("Using RAWG API key from {}", RAWG_KEY_ENV);
            rawg.api_key = key;
        }
        Some(_) => {}
        None => {
            info!("Enabling RAWG from {}", RAWG_KEY_ENV);
            config.rawg = Some(RawgConfig {
                api_key: key,
                ..Default::default()
            });
        }
    }
    config
}
