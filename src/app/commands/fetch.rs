//! `fetch-shas` and `fetch-refs`: list the synced pull requests' heads.

use std::collections::BTreeMap;

use crate::app::AppContext;
use crate::app::services::resolve_sync_group;
use crate::domain::{AppError, RepoName};
use crate::ports::{GitHub, PullRequest};

/// What each output line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Head commit SHA.
    Shas,
    /// The pull request's merge ref, `refs/pull/N/merge`.
    Refs,
}

impl FetchKind {
    /// Step output name the listing is published under.
    pub fn output_name(&self) -> &'static str {
        match self {
            FetchKind::Shas => "prs-shas",
            FetchKind::Refs => "prs-refs",
        }
    }

    fn value_for(&self, pr: &PullRequest) -> String {
        match self {
            FetchKind::Shas => pr.head.sha.clone(),
            FetchKind::Refs => format!("refs/pull/{}/merge", pr.number),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub repo: RepoName,
    pub pr_number: u64,
    pub kind: FetchKind,
}

/// Head repository full name mapped to the fetched value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutput {
    pub entries: BTreeMap<String, String>,
}

impl FetchOutput {
    /// `repo: value` lines, one per head repository.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(repo, value)| format!("{}: {}", repo, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn execute<G: GitHub>(
    ctx: &AppContext<G>,
    options: FetchOptions,
) -> Result<FetchOutput, AppError> {
    let (_, group) =
        resolve_sync_group(ctx.github(), ctx.config(), &options.repo, options.pr_number)?;

    let entries = group
        .pulls
        .iter()
        .map(|pr| (pr.head_repo().full_name(), options.kind.value_for(pr)))
        .collect();
    Ok(FetchOutput { entries })
}
