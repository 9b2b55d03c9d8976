use crate::config::types::{Config, FetchConfig, SourceConfig};
use crate::ConfigError;

/// Upper bound for the global parallelism cap
const MAX_PARALLELISM: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates record source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.database_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.max_body_size < 1 {
        return Err(ConfigError::Validation(
            "max_body_size must be >= 1 byte".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
