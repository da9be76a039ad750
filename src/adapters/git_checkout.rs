use std::path::Path;

use git2::{ErrorCode, FetchOptions, Oid, Repository};

use crate::domain::AppError;
use crate::ports::GitCheckout;

/// libgit2-backed checkout of nested working copies.
#[derive(Debug, Clone, Default)]
pub struct Git2Checkout;

impl Git2Checkout {
    pub fn new() -> Self {
        Self
    }
}

fn git_error(command: &str, err: git2::Error) -> AppError {
    AppError::GitError { command: command.to_string(), details: err.to_string() }
}

fn open(repo_dir: &Path) -> Result<Repository, AppError> {
    Repository::open(repo_dir).map_err(|e| git_error("git2::Repository::open", e))
}

fn parse_oid(sha: &str) -> Result<Oid, AppError> {
    Oid::from_str(sha).map_err(|e| git_error("git2::Oid::from_str", e))
}

impl GitCheckout for Git2Checkout {
    fn origin_url(&self, repo_dir: &Path) -> Result<Option<String>, AppError> {
        let repo = open(repo_dir)?;
        match repo.find_remote("origin") {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(git_error("git2::Repository::find_remote(origin)", e)),
        }
    }

    fn has_commit(&self, repo_dir: &Path, sha: &str) -> Result<bool, AppError> {
        let repo = open(repo_dir)?;
        let oid = parse_oid(sha)?;
        Ok(repo.find_commit(oid).is_ok())
    }

    fn fetch_commit(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError> {
        let repo = open(repo_dir)?;
        let mut remote = repo
            .find_remote("origin")
            .map_err(|e| git_error("git2::Repository::find_remote(origin)", e))?;

        let mut options = FetchOptions::new();
        options.depth(1);
        remote
            .fetch(&[sha], Some(&mut options), None)
            .map_err(|e| git_error(&format!("git fetch --depth=1 origin {}", sha), e))
    }

    fn checkout_detached(&self, repo_dir: &Path, sha: &str) -> Result<(), AppError> {
        let repo = open(repo_dir)?;
        let oid = parse_oid(sha)?;
        let commit =
            repo.find_commit(oid).map_err(|e| git_error("git2::Repository::find_commit", e))?;

        let mut builder = git2::build::CheckoutBuilder::new();
        builder.safe();
        repo.checkout_tree(commit.as_object(), Some(&mut builder))
            .map_err(|e| git_error("git2::Repository::checkout_tree", e))?;
        repo.set_head_detached(oid).map_err(|e| git_error("git2::Repository::set_head_detached", e))
    }
}
