//! Sync workflow configuration models.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Configuration loaded from an optional TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Title tag key linking a PR to its tracking issue.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Repository an unqualified `#N` reference resolves into.
    #[serde(default = "default_hub_repo")]
    pub hub_repo: String,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// GitHub API configuration.
    #[serde(default)]
    pub github: GitHubApiConfig,
    /// Cancel-and-wait configuration for workflow reruns.
    #[serde(default)]
    pub workflow: WorkflowWaitConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            hub_repo: default_hub_repo(),
            token_env: default_token_env(),
            github: GitHubApiConfig::default(),
            workflow: WorkflowWaitConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tag.trim().is_empty() || !self.tag.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(AppError::InvalidConfig(
                "tag must be a non-empty word (letters, digits, underscores)".to_string(),
            ));
        }
        if self.hub_repo.trim().is_empty() {
            return Err(AppError::InvalidConfig("hub_repo must not be empty".to_string()));
        }
        if self.token_env.trim().is_empty() {
            return Err(AppError::InvalidConfig("token_env must not be empty".to_string()));
        }
        self.github.validate()?;
        self.workflow.validate()?;
        Ok(())
    }
}

fn default_tag() -> String {
    "SyncWith".to_string()
}

fn default_hub_repo() -> String {
    ".github".to_string()
}

fn default_token_env() -> String {
    "CI_TOKEN".to_string()
}

/// GitHub API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubApiConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for GitHubApiConfig {
    fn default() -> Self {
        Self { api_url: default_api_url(), timeout_secs: default_request_timeout() }
    }
}

impl GitHubApiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "github.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.github.com").expect("Default API URL must be valid")
}

fn default_request_timeout() -> u64 {
    30
}

/// Polling parameters used while a cancelled run winds down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowWaitConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_wait_timeout")]
    pub timeout_secs: u64,
}

impl Default for WorkflowWaitConfig {
    fn default() -> Self {
        Self { poll_interval_secs: default_poll_interval(), timeout_secs: default_wait_timeout() }
    }
}

impl WorkflowWaitConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.poll_interval_secs == 0 {
            return Err(AppError::InvalidConfig(
                "workflow.poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "workflow.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_poll_interval() -> u64 {
    10
}

fn default_wait_timeout() -> u64 {
    300
}
