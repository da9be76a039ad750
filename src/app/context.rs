use crate::domain::SyncConfig;
use crate::ports::GitHub;

/// Application context holding dependencies for command execution.
pub struct AppContext<G: GitHub> {
    github: G,
    config: SyncConfig,
}

impl<G: GitHub> AppContext<G> {
    /// Create a new application context.
    pub fn new(github: G, config: SyncConfig) -> Self {
        Self { github, config }
    }

    /// Get a reference to the GitHub client.
    pub fn github(&self) -> &G {
        &self.github
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
