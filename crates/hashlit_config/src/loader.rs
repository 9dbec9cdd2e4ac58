//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::HashlitConfig;
use hashlit_index::MAX_TABLE_SIZE;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "hashlit.toml";

/// Loads and validates a `hashlit.toml` configuration from a directory.
///
/// A missing file is reported as [`ConfigError::IoError`]; callers that
/// treat the file as optional fall back to [`HashlitConfig::default`].
pub fn load_config(dir: &Path) -> Result<HashlitConfig, ConfigError> {
    let content = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a `hashlit.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<HashlitConfig, ConfigError> {
    let config: HashlitConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &HashlitConfig) -> Result<(), ConfigError> {
    let size = config.index.max_table_size;
    if !size.is_power_of_two() || !(4..=MAX_TABLE_SIZE).contains(&size) {
        return Err(ConfigError::ValidationError(format!(
            "index.max_table_size must be a power of two between 4 and {MAX_TABLE_SIZE}, got {size}"
        )));
    }
    validate_prefix("symbols.map_prefix", &config.symbols.map_prefix)?;
    validate_prefix("symbols.set_prefix", &config.symbols.set_prefix)?;
    Ok(())
}

fn validate_prefix(field: &str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::ValidationError(format!("{field} must not be empty")));
    }
    if prefix.contains(':') {
        return Err(ConfigError::ValidationError(format!(
            "{field} must not contain ':', got '{prefix}'"
        )));
    }
    Ok(())
}
