use std::io;

use thiserror::Error;

/// Library-wide error type for syncwith operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file contents are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Access token variable is absent or empty.
    #[error("GitHub token not provided in the environment variable '{var}'")]
    MissingToken { var: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Repository name is not in `owner/name` form.
    #[error("Invalid repository name '{0}': expected 'owner/name'")]
    InvalidRepoName(String),

    /// Tracking tag value cannot be resolved to an issue.
    #[error("Invalid issue reference '{0}': expected 'owner/repo#N', 'repo#N' or '#N'")]
    InvalidIssueReference(String),

    /// Pull request title carries no tracking tag.
    #[error("PR {pr} is not part of a sync group: no [{tag}: ...] tag in title '{title}'")]
    NotSynced { pr: String, tag: String, title: String },

    /// Tracking issue lookup failed.
    #[error("Issue {reference} not found")]
    IssueNotFound { reference: String },

    /// GitHub answered with a non-success status.
    #[error("GitHub API error ({status}) for {endpoint}: {message}")]
    GitHubApi { status: u16, endpoint: String, message: String },

    /// Transport-level HTTP failure.
    #[error("HTTP request to {endpoint} failed: {details}")]
    Http { endpoint: String, details: String },

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Workflow run did not reach a terminal status in time.
    #[error("Timed out after {waited_secs}s waiting for workflow run {run_id} to stop")]
    WaitTimeout { run_id: u64, waited_secs: u64 },

    /// Git execution failed.
    #[error("Git error running '{command}': {details}")]
    GitError { command: String, details: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::MissingToken { .. }
            | AppError::TomlParse(_)
            | AppError::InvalidRepoName(_)
            | AppError::InvalidIssueReference(_)
            | AppError::NotSynced { .. }
            | AppError::ParseError { .. } => io::ErrorKind::InvalidInput,
            AppError::IssueNotFound { .. } => io::ErrorKind::NotFound,
            AppError::WaitTimeout { .. } => io::ErrorKind::TimedOut,
            AppError::GitHubApi { .. } | AppError::Http { .. } | AppError::GitError { .. } => {
                io::ErrorKind::Other
            }
        }
    }
}
