use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file keep their defaults. The result is not
/// validated yet, since command-line overrides are applied afterwards; call
/// [`validate`] once the final configuration is assembled.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use favicon_collector::config::load_config;
///
/// let config = load_config(Path::new("collector.toml")).unwrap();
/// println!("Parallel requests: {}", config.fetch.parallelism);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads a configuration file and validates it as-is
pub fn load_validated_config(path: &Path) -> Result<Config, ConfigError> {
    let config = load_config(path)?;
    validate(&config)?;
    Ok(config)
}
