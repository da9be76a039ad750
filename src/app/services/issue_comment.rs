//! Keeps the tracking issue's related-PRs comment in step with the sync group.

use std::fmt;

use serde::Serialize;

use crate::domain::{AppError, CommentBody, IssueRef, RELATED_PRS_TAG, RelatedPr, SyncConfig};
use crate::ports::{GitHub, Issue, IssueComment, PullRequest};
use crate::templates;

/// Outcome of a comment synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Created,
    Edited,
    Unchanged,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Created => "created",
            CommentStatus::Edited => "edited",
            CommentStatus::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot `pulls` as a list ordered by repository.
pub fn related_pr_list(pulls: &[PullRequest]) -> Vec<RelatedPr> {
    let mut prs: Vec<RelatedPr> = pulls
        .iter()
        .map(|pr| RelatedPr {
            repo: pr.base_repo.clone(),
            number: pr.number,
            sha: pr.head.sha.clone(),
            url: pr.html_url.clone(),
        })
        .collect();
    prs.sort();
    prs
}

fn previously_recorded(comment: &IssueComment) -> Option<Vec<RelatedPr>> {
    let body = CommentBody::decode(&comment.body, RELATED_PRS_TAG)?;
    match RelatedPr::decode_list(&body.hidden_text) {
        Ok(prs) => Some(prs),
        Err(e) => {
            tracing::warn!("Ignoring unreadable payload in comment {}: {}", comment.id, e);
            None
        }
    }
}

/// Create, edit, or leave alone the managed comment on `issue`.
pub fn sync_issue_comment(
    github: &impl GitHub,
    issue: &Issue,
    related: &[RelatedPr],
    existing: Option<&IssueComment>,
) -> Result<CommentStatus, AppError> {
    if let Some(comment) = existing
        && previously_recorded(comment).as_deref() == Some(related)
    {
        tracing::info!("The same issue comment already exists on {}", issue.reference);
        return Ok(CommentStatus::Unchanged);
    }

    let body = CommentBody::new(
        RelatedPr::encode_list(related)?,
        templates::render_related_prs(related)?,
    )
    .encode(RELATED_PRS_TAG, true);

    match existing {
        Some(comment) => {
            tracing::info!("Editing existing comment {} on {}", comment.id, issue.reference);
            github.update_issue_comment(&issue.reference.repo, comment.id, &body)?;
            Ok(CommentStatus::Edited)
        }
        None => {
            tracing::info!("Creating new comment on {}", issue.reference);
            github.create_issue_comment(&issue.reference, &body)?;
            Ok(CommentStatus::Created)
        }
    }
}

/// Post the one-time notice on `pr` pointing at its tracking issue.
///
/// Returns `false` when an earlier run already posted it.
pub fn ensure_pr_notice(
    github: &impl GitHub,
    config: &SyncConfig,
    pr: &PullRequest,
    issue: &Issue,
) -> Result<bool, AppError> {
    let issue_name = issue.reference.to_string();
    let notice = templates::render_pr_notice(&config.tag, &issue_name, &issue.html_url)?;
    let legacy = templates::render_legacy_pr_notice(&config.tag, &issue_name, &issue.html_url)?;

    let pr_ref = IssueRef { repo: pr.base_repo.clone(), number: pr.number };
    let already_posted = github
        .list_issue_comments(&pr_ref)?
        .iter()
        .any(|c| c.body.contains(&notice) || c.body.contains(&legacy));
    if already_posted {
        tracing::info!("The same PR comment already exists on {}", pr_ref);
        return Ok(false);
    }

    github.create_issue_comment(&pr_ref, &notice)?;
    Ok(true)
}
