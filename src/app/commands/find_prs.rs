//! `find-prs`: describe every synced pull request together with its latest run
//! of the calling workflow.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::app::AppContext;
use crate::app::services::resolve_sync_group;
use crate::domain::{AppError, RepoName};
use crate::ports::{GitHub, PullRequest};

#[derive(Debug, Clone)]
pub struct FindPrsOptions {
    pub repo: RepoName,
    pub pr_number: u64,
    /// `owner/repo/<path>@ref`, as exported in `GITHUB_WORKFLOW_REF`.
    pub workflow_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedPrEntry {
    pub pr_number: u64,
    pub branch: String,
    pub sha: String,
    /// Latest run of the workflow for this PR, if there is one.
    pub last_run_id: Option<u64>,
}

/// Keyed by head repository full name.
pub type FindPrsOutput = BTreeMap<String, SyncedPrEntry>;

/// Strip the repository prefix and the `@ref` suffix from a workflow reference.
pub fn workflow_path(workflow_ref: &str) -> Result<String, AppError> {
    let without_ref = workflow_ref.split('@').next().unwrap_or_default();
    let path = without_ref.split('/').skip(2).collect::<Vec<_>>().join("/");
    if path.is_empty() {
        return Err(AppError::ParseError {
            what: "workflow reference".to_string(),
            details: format!("'{}' has no workflow path", workflow_ref),
        });
    }
    Ok(path)
}

fn last_run_id(
    github: &impl GitHub,
    pr: &PullRequest,
    path: &str,
) -> Result<Option<u64>, AppError> {
    let repo = pr.head_repo();
    let Some(workflow) = github.list_workflows(repo)?.into_iter().find(|w| w.path == path) else {
        tracing::warn!("Workflow {} not found in {}", path, repo);
        return Ok(None);
    };

    let run = github
        .list_runs_for_workflow(repo, workflow.id, &pr.head.sha)?
        .into_iter()
        .find(|run| run.pull_requests.contains(&pr.number));
    if run.is_none() {
        tracing::warn!("No run of {} found for {}#{}", path, pr.base_repo, pr.number);
    }
    Ok(run.map(|run| run.id))
}

pub fn execute<G: GitHub>(
    ctx: &AppContext<G>,
    options: FindPrsOptions,
) -> Result<FindPrsOutput, AppError> {
    let path = workflow_path(&options.workflow_ref)?;
    let (_, group) =
        resolve_sync_group(ctx.github(), ctx.config(), &options.repo, options.pr_number)?;

    let mut output = FindPrsOutput::new();
    for pr in &group.pulls {
        let entry = SyncedPrEntry {
            pr_number: pr.number,
            branch: pr.head.branch.clone(),
            sha: pr.head.sha.clone(),
            last_run_id: last_run_id(ctx.github(), pr, &path)?,
        };
        output.insert(pr.head_repo().full_name(), entry);
    }
    Ok(output)
}
