use super::{types::Config, ConfigError};
use crate::catalog::ReleaseWindow;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Page size, page cap and upstream timeout are positive
/// - A configured RAWG section has an API key and a valid trending window
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    // Catalog validation
    if config.catalog.default_page_size == 0 {
        return Err(invalid("catalog.default_page_size cannot be 0"));
    }
    if config.catalog.page_cap == 0 {
        return Err(invalid("catalog.page_cap cannot be 0"));
    }
    if config.catalog.upstream_timeout_secs == 0 {
        return Err(invalid("catalog.upstream_timeout_secs cannot be 0"));
    }

    // RAWG validation
    if let Some(rawg) = &config.rawg {
        if rawg.api_key.trim().is_empty() {
            return Err(invalid(
                "rawg.api_key is empty (set it in the file or via RAWG_API_KEY)",
            ));
        }
        if rawg.timeout_secs == 0 {
            return Err(invalid("rawg.timeout_secs cannot be 0"));
        }
        if rawg.trending_page_size == 0 {
            return Err(invalid("rawg.trending_page_size cannot be 0"));
        }
        if ReleaseWindow::parse(&rawg.trending_window).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "rawg.trending_window '{}' is not a YYYY-MM-DD,YYYY-MM-DD range",
                rawg.trending_window
            )));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
