//! `rerun-checks`: restart CI for every other pull request in the sync group.

use crate::app::AppContext;
use crate::app::services::{WaitPolicy, rerun_all, resolve_sync_group};
use crate::domain::{AppError, RepoName};
use crate::ports::GitHub;

#[derive(Debug, Clone)]
pub struct RerunOptions {
    pub repo: RepoName,
    pub pr_number: u64,
    /// Repository running this workflow; its own runs are left alone.
    pub current_repository: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerunOutput {
    /// Head repository and the run ids a rerun was requested for.
    pub rerun: Vec<(RepoName, Vec<u64>)>,
    pub skipped: Vec<RepoName>,
}

pub fn execute<G: GitHub>(
    ctx: &AppContext<G>,
    options: RerunOptions,
) -> Result<RerunOutput, AppError> {
    let (_, group) =
        resolve_sync_group(ctx.github(), ctx.config(), &options.repo, options.pr_number)?;
    let policy = WaitPolicy::from(&ctx.config().workflow);

    let mut output = RerunOutput::default();
    for pr in &group.pulls {
        let head_repo = pr.head_repo();
        if options.current_repository.as_deref() == Some(head_repo.full_name().as_str()) {
            tracing::info!("Skipping {}: runs in the current workflow's repository", head_repo);
            output.skipped.push(head_repo.clone());
            continue;
        }

        let ids = rerun_all(ctx.github(), head_repo, &pr.head.sha, policy)?;
        output.rerun.push((head_repo.clone(), ids));
    }
    Ok(output)
}
