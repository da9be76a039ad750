//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::domain::{AppError, SyncConfig};

/// Load configuration from `path`, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, AppError> {
    let Some(path) = path else {
        return Ok(SyncConfig::default());
    };

    let content = fs::read_to_string(path).map_err(|err| {
        AppError::config_error(format!("Failed to read config file {}: {}", path.display(), err))
    })?;
    parse_config_content(&content)
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<SyncConfig, AppError> {
    let config: SyncConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
