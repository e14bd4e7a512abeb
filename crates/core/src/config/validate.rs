use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Cache bounds are positive
/// - A Pexels API key is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.cache.recent_query_limit == 0 {
        return Err(ConfigError::ValidationError(
            "cache.recent_query_limit must be greater than 0".to_string(),
        ));
    }

    if config.cache.default_per_page == 0 {
        return Err(ConfigError::ValidationError(
            "cache.default_per_page must be greater than 0".to_string(),
        ));
    }

    if config.pexels.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "pexels.api_key is required".to_string(),
        ));
    }

    Ok(())
}
