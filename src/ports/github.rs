use crate::domain::{AppError, IssueRef, RepoName};

/// Pull request fields the sync workflow reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    /// `open` or `closed`.
    pub state: String,
    pub head: HeadRef,
    /// Repository the PR targets.
    pub base_repo: RepoName,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }

    /// Repository the head branch lives in, or the base repository when the fork is gone.
    pub fn head_repo(&self) -> &RepoName {
        self.head.repo.as_ref().unwrap_or(&self.base_repo)
    }
}

/// Head side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadRef {
    /// Branch name.
    pub branch: String,
    pub sha: String,
    pub repo: Option<RepoName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub reference: IssueRef,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub id: u64,
    pub body: String,
}

/// Pull request located by a search, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMention {
    pub repo: RepoName,
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: u64,
    pub status: String,
    pub run_attempt: u64,
    /// Numbers of the pull requests the run was triggered for.
    pub pull_requests: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub id: u64,
    /// Definition path, e.g. `.github/workflows/ci.yml`.
    pub path: String,
}

/// Hosting-platform operations used by the sync commands.
pub trait GitHub {
    fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest, AppError>;

    /// Fetch an issue; a missing issue is `AppError::IssueNotFound`.
    fn get_issue(&self, issue: &IssueRef) -> Result<Issue, AppError>;

    fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<IssueComment>, AppError>;

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<u64, AppError>;

    fn update_issue_comment(
        &self,
        repo: &RepoName,
        comment_id: u64,
        body: &str,
    ) -> Result<(), AppError>;

    /// Open pull requests in `org` whose title contains a `[{tag}:` marker.
    ///
    /// Search is full-text, so hits may be false positives; callers re-check titles.
    fn search_tagged_pull_requests(
        &self,
        org: &str,
        tag: &str,
    ) -> Result<Vec<PullRequestMention>, AppError>;

    /// Runs of any workflow for `head_sha` triggered by `event`.
    fn list_workflow_runs(
        &self,
        repo: &RepoName,
        head_sha: &str,
        event: &str,
    ) -> Result<Vec<WorkflowRun>, AppError>;

    fn get_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<WorkflowRun, AppError>;

    fn cancel_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError>;

    fn rerun_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError>;

    fn list_workflows(&self, repo: &RepoName) -> Result<Vec<Workflow>, AppError>;

    /// Runs of one workflow for `head_sha`.
    fn list_runs_for_workflow(
        &self,
        repo: &RepoName,
        workflow_id: u64,
        head_sha: &str,
    ) -> Result<Vec<WorkflowRun>, AppError>;
}
