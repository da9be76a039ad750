//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::Path;

use crate::adapters::{Git2Checkout, HttpGitHubClient};
use crate::app::AppContext;
use crate::app::commands::{checkout, fetch, find_prs, link, rerun};
use crate::app::config::{read_optional_token, read_token, resolve_config};

pub use crate::app::commands::{
    CheckoutOptions, CheckoutOutput, FetchKind, FetchOptions, FetchOutput, FindPrsOptions,
    FindPrsOutput, LinkOptions, LinkOutput, RerunOptions, RerunOutput,
};
pub use crate::domain::AppError;

/// Create an `AppContext` talking to the configured GitHub API.
///
/// The token is checked before anything else so a misconfigured job fails
/// without touching the network.
fn create_context(
    config_path: Option<&Path>,
    token_required: bool,
) -> Result<AppContext<HttpGitHubClient>, AppError> {
    let config = resolve_config(config_path)?;
    let token = if token_required {
        Some(read_token(&config)?)
    } else {
        read_optional_token(&config)
    };
    let github = HttpGitHubClient::new(token, &config.github)?;
    Ok(AppContext::new(github, config))
}

/// List head SHAs or merge refs of every synced pull request.
///
/// Merge refs are public, so `FetchKind::Refs` works without a token.
pub fn fetch(config_path: Option<&Path>, options: FetchOptions) -> Result<FetchOutput, AppError> {
    let ctx = create_context(config_path, options.kind == FetchKind::Shas)?;
    fetch::execute(&ctx, options)
}

/// Describe synced pull requests along with their latest workflow run.
pub fn find_prs(
    config_path: Option<&Path>,
    options: FindPrsOptions,
) -> Result<FindPrsOutput, AppError> {
    let ctx = create_context(config_path, true)?;
    find_prs::execute(&ctx, options)
}

/// Synchronize the related-PRs comment on the tracking issue.
pub fn link_to_issue(
    config_path: Option<&Path>,
    options: LinkOptions,
) -> Result<LinkOutput, AppError> {
    let ctx = create_context(config_path, true)?;
    link::execute(&ctx, options)
}

/// Cancel and rerun CI for the other synced pull requests.
pub fn rerun_checks(
    config_path: Option<&Path>,
    options: RerunOptions,
) -> Result<RerunOutput, AppError> {
    let ctx = create_context(config_path, true)?;
    rerun::execute(&ctx, options)
}

/// Detach nested checkouts at their synced commits.
pub fn checkout_synced(options: CheckoutOptions) -> Result<CheckoutOutput, AppError> {
    checkout::execute(&Git2Checkout::new(), options)
}
