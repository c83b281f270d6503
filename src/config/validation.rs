use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max_results must be >= 1, got {}",
            config.max_results
        )));
    }

    if config.batch_size < 1 || config.batch_size > 50 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 50, got {}",
            config.batch_size
        )));
    }

    if config.host_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "host_delay must be >= 100ms, got {}ms",
            config.host_delay_ms
        )));
    }

    if config.backoff_cap_ms < config.host_delay_ms {
        return Err(ConfigError::Validation(format!(
            "backoff_cap ({}ms) must be >= host_delay ({}ms)",
            config.backoff_cap_ms, config.host_delay_ms
        )));
    }

    Ok(())
}

/// Validates HTTP transport configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1000ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    if config.max_connections < 1 || config.max_connections > 10 {
        return Err(ConfigError::Validation(format!(
            "max_connections must be between 1 and 10, got {}",
            config.max_connections
        )));
    }

    if config.max_keepalive > config.max_connections {
        return Err(ConfigError::Validation(format!(
            "max_keepalive ({}) cannot exceed max_connections ({})",
            config.max_keepalive, config.max_connections
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
