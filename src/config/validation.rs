use crate::config::types::{Config, FetcherConfig, IndexConfig, StatusConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_index_config(&config.index)?;
    validate_status_config(&config.status)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates index configuration
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api-url '{}' must use http or https",
            config.api_url
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "index timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates status line configuration
fn validate_status_config(config: &StatusConfig) -> Result<(), ConfigError> {
    if config.url_width < 10 {
        return Err(ConfigError::Validation(format!(
            "url-width must be >= 10, got {}",
            config.url_width
        )));
    }

    Ok(())
}
