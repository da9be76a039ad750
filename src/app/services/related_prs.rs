//! Discovery of the pull requests synced through one tracking issue.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AppError, CommentBody, IssueRef, RELATED_PRS_TAG, RepoName, SyncConfig, Tags};
use crate::ports::{GitHub, Issue, IssueComment, PullRequest};

/// Pull requests that share a tracking issue, one per base repository.
#[derive(Debug, Clone)]
pub struct SyncGroup {
    pub issue: Issue,
    /// Ordered by base repository full name.
    pub pulls: Vec<PullRequest>,
    /// Comment written by a previous run, if any.
    pub existing_comment: Option<IssueComment>,
}

impl SyncGroup {
    /// Add `pr` unless its base repository is already represented.
    pub fn include(&mut self, pr: &PullRequest) {
        if self.pulls.iter().any(|p| p.base_repo == pr.base_repo) {
            return;
        }
        self.pulls.push(pr.clone());
        self.pulls.sort_by(|a, b| a.base_repo.cmp(&b.base_repo));
    }
}

/// Read the tracking-issue reference out of a pull request title.
pub fn tracking_issue_ref(pr: &PullRequest, config: &SyncConfig) -> Result<IssueRef, AppError> {
    let tags = Tags::parse(&pr.title);
    let value = tags.get(&config.tag).ok_or_else(|| AppError::NotSynced {
        pr: format!("{}#{}", pr.base_repo, pr.number),
        tag: config.tag.clone(),
        title: pr.title.clone(),
    })?;
    IssueRef::resolve(value, pr.base_repo.owner(), &config.hub_repo)
}

/// Resolve and fetch the tracking issue of `pr`.
pub fn resolve_tracking_issue(
    github: &impl GitHub,
    config: &SyncConfig,
    pr: &PullRequest,
) -> Result<Issue, AppError> {
    let reference = tracking_issue_ref(pr, config)?;
    tracing::info!("PR {}#{} is synced with {}", pr.base_repo, pr.number, reference);
    github.get_issue(&reference)
}

/// Find the managed related-PRs comment among `comments`.
pub fn find_managed_comment(comments: Vec<IssueComment>) -> Option<IssueComment> {
    comments.into_iter().find(|c| CommentBody::decode(&c.body, RELATED_PRS_TAG).is_some())
}

/// Collect the open pull requests whose titles point at `issue`.
///
/// Candidates come from an organization-wide search and are kept only when
/// they live in the issue's organization, are open, and their own tag
/// resolves back to the same issue. A tag naming another issue must still
/// name an existing one. When one repository has several, the lowest number
/// wins.
pub fn find_sync_group(
    github: &impl GitHub,
    config: &SyncConfig,
    issue: Issue,
) -> Result<SyncGroup, AppError> {
    let existing_comment = find_managed_comment(github.list_issue_comments(&issue.reference)?);

    let org = issue.reference.repo.owner().to_string();
    let candidates: BTreeSet<(RepoName, u64)> = github
        .search_tagged_pull_requests(&org, &config.tag)?
        .into_iter()
        .filter(|m| m.repo.owner().eq_ignore_ascii_case(&org))
        .map(|m| (m.repo, m.number))
        .collect();

    let mut other_issues: BTreeSet<String> = BTreeSet::new();
    let mut by_repo: BTreeMap<RepoName, PullRequest> = BTreeMap::new();
    for (repo, number) in candidates {
        let pr = github.get_pull_request(&repo, number)?;
        if !pr.is_open() {
            tracing::debug!("Skipping {}#{}: not open", repo, number);
            continue;
        }
        match tracking_issue_ref(&pr, config) {
            Ok(reference) if reference.same_issue(&issue.reference) => {}
            Ok(other) => {
                if other_issues.insert(other.to_string()) {
                    github.get_issue(&other)?;
                }
                tracing::debug!("Skipping {}#{}: synced with {}", repo, number, other);
                continue;
            }
            // Search matched the tag word without a full tag.
            Err(AppError::NotSynced { .. }) => continue,
            Err(e) => return Err(e),
        }

        match by_repo.get(&pr.base_repo) {
            Some(current) if current.number <= pr.number => {}
            _ => {
                by_repo.insert(pr.base_repo.clone(), pr);
            }
        }
    }

    tracing::info!("Found {} synced PR(s) for {}", by_repo.len(), issue.reference);
    Ok(SyncGroup { issue, pulls: by_repo.into_values().collect(), existing_comment })
}

/// Resolve the full sync group as seen from `repo#number`.
pub fn resolve_sync_group(
    github: &impl GitHub,
    config: &SyncConfig,
    repo: &RepoName,
    number: u64,
) -> Result<(PullRequest, SyncGroup), AppError> {
    let pr = github.get_pull_request(repo, number)?;
    let issue = resolve_tracking_issue(github, config, &pr)?;
    let group = find_sync_group(github, config, issue)?;
    Ok((pr, group))
}
