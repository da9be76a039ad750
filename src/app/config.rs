//! Configuration resolution from flags and the CI environment.

use std::path::{Path, PathBuf};

use url::Url;

use crate::domain::configuration::load_config;
use crate::domain::{AppError, SyncConfig};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "SYNCWITH_CONFIG";
/// API base URL exported by GitHub Actions runners.
pub const API_URL_ENV: &str = "GITHUB_API_URL";
/// Repository running the current workflow, `owner/name`.
pub const CURRENT_REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

/// Load configuration from `--config`, falling back to `SYNCWITH_CONFIG`.
///
/// `GITHUB_API_URL` overrides the configured API URL when set.
pub fn resolve_config(config_path: Option<&Path>) -> Result<SyncConfig, AppError> {
    let env_path = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
    let path = config_path.map(Path::to_path_buf).or(env_path);

    let mut config = load_config(path.as_deref())?;

    if let Ok(api_url) = std::env::var(API_URL_ENV)
        && !api_url.trim().is_empty()
    {
        config.github.api_url = Url::parse(api_url.trim()).map_err(|e| {
            AppError::config_error(format!("Invalid {} '{}': {}", API_URL_ENV, api_url, e))
        })?;
    }

    Ok(config)
}

/// Read the access token named by `token_env`.
pub fn read_token(config: &SyncConfig) -> Result<String, AppError> {
    read_optional_token(config)
        .ok_or_else(|| AppError::MissingToken { var: config.token_env.clone() })
}

/// Read the access token if one is set.
pub fn read_optional_token(config: &SyncConfig) -> Option<String> {
    std::env::var(&config.token_env).ok().filter(|token| !token.trim().is_empty())
}
