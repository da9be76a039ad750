use std::path::Path;

use crate::domain::AppError;

/// Working-copy operations needed to pin nested checkouts to synced commits.
pub trait GitCheckout {
    /// URL of the `origin` remote, `None` when the repository has no such remote.
    fn origin_url(&self, repo_dir: &Path) -> Result<Option<String>, AppError>;

    /// Whether `sha` names a commit already present in the local object store.
    fn has_commit(&self, repo_dir: &Path, sha: &str) -> Result<bool, AppError>;

    /// Shallow-fetch `sha` from `origin`.
    fn fetch_commit(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError>;

    /// Check out `sha` with a detached HEAD.
    fn checkout_detached(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError>;
}
