//! `link-to-issue`: publish the synced pull requests on their tracking issue.

use crate::app::AppContext;
use crate::app::services::{
    CommentStatus, ensure_pr_notice, related_pr_list, resolve_sync_group, sync_issue_comment,
};
use crate::domain::{AppError, IssueRef, RepoName};
use crate::ports::GitHub;

/// Step output carrying the comment status.
pub const COMMENT_STATUS_OUTPUT: &str = "issue-comment-status";

#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub repo: RepoName,
    pub pr_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutput {
    pub issue: IssueRef,
    pub status: CommentStatus,
    /// Whether the notice on the pull request was posted by this run.
    pub notice_posted: bool,
}

pub fn execute<G: GitHub>(
    ctx: &AppContext<G>,
    options: LinkOptions,
) -> Result<LinkOutput, AppError> {
    let github = ctx.github();
    let (pr, mut group) =
        resolve_sync_group(github, ctx.config(), &options.repo, options.pr_number)?;

    // Search may not index the PR yet when it was tagged moments ago.
    group.include(&pr);

    let related = related_pr_list(&group.pulls);
    let status =
        sync_issue_comment(github, &group.issue, &related, group.existing_comment.as_ref())?;
    let notice_posted = ensure_pr_notice(github, ctx.config(), &pr, &group.issue)?;

    Ok(LinkOutput { issue: group.issue.reference, status, notice_posted })
}
