use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use crate::domain::{AppError, IssueRef, RepoName};
use crate::ports::{
    GitHub, HeadRef, Issue, IssueComment, PullRequest, PullRequestMention, Workflow, WorkflowRun,
};

/// Workflow run held by [`FakeGitHub`].
///
/// Each `get_workflow_run` call pops the next `(status, run_attempt)` pair
/// from `polls`; once drained the last state sticks.
#[derive(Debug, Clone)]
pub struct FakeRun {
    pub run: WorkflowRun,
    pub head_sha: String,
    pub event: String,
    pub workflow_id: Option<u64>,
    pub polls: VecDeque<(String, u64)>,
}

/// In-memory GitHub used by unit tests.
#[derive(Debug, Default)]
pub struct FakeGitHub {
    pub pulls: Mutex<BTreeMap<(RepoName, u64), PullRequest>>,
    pub issues: Mutex<BTreeMap<String, Issue>>,
    /// Comments keyed by `owner/repo#N` of the issue or pull request.
    pub comments: Mutex<BTreeMap<String, Vec<IssueComment>>>,
    pub runs: Mutex<BTreeMap<RepoName, Vec<FakeRun>>>,
    pub workflows: Mutex<BTreeMap<RepoName, Vec<Workflow>>>,
    /// Write operations in call order, e.g. `cancel acme/svc-a 11`.
    pub calls: Mutex<Vec<String>>,
    next_comment_id: Mutex<u64>,
}

pub fn repo(name: &str) -> RepoName {
    name.parse().expect("test repository name must be valid")
}

pub fn issue_ref(repo_name: &str, number: u64) -> IssueRef {
    IssueRef { repo: repo(repo_name), number }
}

/// Open pull request whose head lives in the base repository.
pub fn open_pr(repo_name: &str, number: u64, title: &str, sha: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/{}/pull/{}", repo_name, number),
        state: "open".to_string(),
        head: HeadRef {
            branch: format!("feature-{}", number),
            sha: sha.to_string(),
            repo: Some(repo(repo_name)),
        },
        base_repo: repo(repo_name),
    }
}

pub fn run(id: u64, status: &str, run_attempt: u64, pull_requests: Vec<u64>) -> WorkflowRun {
    WorkflowRun { id, status: status.to_string(), run_attempt, pull_requests }
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self { next_comment_id: Mutex::new(100), ..Default::default() }
    }

    pub fn add_pull(&self, pr: PullRequest) {
        self.pulls.lock().unwrap().insert((pr.base_repo.clone(), pr.number), pr);
    }

    pub fn add_issue(&self, repo_name: &str, number: u64) {
        let reference = issue_ref(repo_name, number);
        let html_url = format!("https://github.com/{}/issues/{}", repo_name, number);
        self.issues.lock().unwrap().insert(reference.to_string(), Issue { reference, html_url });
    }

    pub fn add_comment(&self, target: &str, id: u64, body: &str) {
        self.comments
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_default()
            .push(IssueComment { id, body: body.to_string() });
    }

    pub fn comments_on(&self, target: &str) -> Vec<IssueComment> {
        self.comments.lock().unwrap().get(target).cloned().unwrap_or_default()
    }

    pub fn add_run(
        &self,
        repo_name: &str,
        head_sha: &str,
        run: WorkflowRun,
        polls: &[(&str, u64)],
    ) {
        self.add_fake_run(
            repo_name,
            FakeRun {
                run,
                head_sha: head_sha.to_string(),
                event: "pull_request".to_string(),
                workflow_id: None,
                polls: polls.iter().map(|(s, a)| (s.to_string(), *a)).collect(),
            },
        );
    }

    pub fn add_fake_run(&self, repo_name: &str, run: FakeRun) {
        self.runs.lock().unwrap().entry(repo(repo_name)).or_default().push(run);
    }

    pub fn add_workflow(&self, repo_name: &str, id: u64, path: &str) {
        self.workflows
            .lock()
            .unwrap()
            .entry(repo(repo_name))
            .or_default()
            .push(Workflow { id, path: path.to_string() });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(endpoint: String) -> AppError {
        AppError::GitHubApi { status: 404, endpoint, message: "Not Found".to_string() }
    }
}

impl GitHub for FakeGitHub {
    fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest, AppError> {
        self.pulls
            .lock()
            .unwrap()
            .get(&(repo.clone(), number))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/repos/{}/pulls/{}", repo, number)))
    }

    fn get_issue(&self, issue: &IssueRef) -> Result<Issue, AppError> {
        self.issues
            .lock()
            .unwrap()
            .get(&issue.to_string())
            .cloned()
            .ok_or_else(|| AppError::IssueNotFound { reference: issue.to_string() })
    }

    fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<IssueComment>, AppError> {
        Ok(self.comments_on(&issue.to_string()))
    }

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<u64, AppError> {
        let id = {
            let mut next = self.next_comment_id.lock().unwrap();
            *next += 1;
            *next
        };
        self.add_comment(&issue.to_string(), id, body);
        self.record(format!("create_comment {}", issue));
        Ok(id)
    }

    fn update_issue_comment(
        &self,
        repo: &RepoName,
        comment_id: u64,
        body: &str,
    ) -> Result<(), AppError> {
        let mut comments = self.comments.lock().unwrap();
        let prefix = format!("{}#", repo);
        let comment = comments
            .iter_mut()
            .filter(|(target, _)| target.starts_with(&prefix))
            .flat_map(|(_, list)| list.iter_mut())
            .find(|c| c.id == comment_id)
            .ok_or_else(|| {
                Self::not_found(format!("/repos/{}/issues/comments/{}", repo, comment_id))
            })?;
        comment.body = body.to_string();
        drop(comments);
        self.record(format!("update_comment {} {}", repo, comment_id));
        Ok(())
    }

    fn search_tagged_pull_requests(
        &self,
        org: &str,
        tag: &str,
    ) -> Result<Vec<PullRequestMention>, AppError> {
        let marker = format!("[{}:", tag);
        Ok(self
            .pulls
            .lock()
            .unwrap()
            .values()
            .filter(|pr| pr.is_open() && pr.base_repo.owner().eq_ignore_ascii_case(org))
            .filter(|pr| pr.title.contains(&marker))
            .map(|pr| PullRequestMention { repo: pr.base_repo.clone(), number: pr.number })
            .collect())
    }

    fn list_workflow_runs(
        &self,
        repo: &RepoName,
        head_sha: &str,
        event: &str,
    ) -> Result<Vec<WorkflowRun>, AppError> {
        let runs = self.runs.lock().unwrap();
        Ok(runs
            .get(repo)
            .map(|list| {
                list.iter()
                    .filter(|r| r.head_sha == head_sha && r.event == event)
                    .map(|r| r.run.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<WorkflowRun, AppError> {
        let mut runs = self.runs.lock().unwrap();
        let fake = runs
            .get_mut(repo)
            .and_then(|list| list.iter_mut().find(|r| r.run.id == run_id))
            .ok_or_else(|| Self::not_found(format!("/repos/{}/actions/runs/{}", repo, run_id)))?;
        if let Some((status, attempt)) = fake.polls.pop_front() {
            fake.run.status = status;
            fake.run.run_attempt = attempt;
        }
        Ok(fake.run.clone())
    }

    fn cancel_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError> {
        self.record(format!("cancel {} {}", repo, run_id));
        Ok(())
    }

    fn rerun_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError> {
        self.record(format!("rerun {} {}", repo, run_id));
        Ok(())
    }

    fn list_workflows(&self, repo: &RepoName) -> Result<Vec<Workflow>, AppError> {
        Ok(self.workflows.lock().unwrap().get(repo).cloned().unwrap_or_default())
    }

    fn list_runs_for_workflow(
        &self,
        repo: &RepoName,
        workflow_id: u64,
        head_sha: &str,
    ) -> Result<Vec<WorkflowRun>, AppError> {
        let runs = self.runs.lock().unwrap();
        Ok(runs
            .get(repo)
            .map(|list| {
                list.iter()
                    .filter(|r| r.workflow_id == Some(workflow_id) && r.head_sha == head_sha)
                    .map(|r| r.run.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}
