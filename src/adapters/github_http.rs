//! GitHub REST client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::domain::{AppError, GitHubApiConfig, IssueRef, RepoName};
use crate::ports::{
    GitHub, HeadRef, Issue, IssueComment, PullRequest, PullRequestMention, Workflow, WorkflowRun,
};

const PER_PAGE: usize = 100;
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// HTTP client for the GitHub REST API.
#[derive(Clone)]
pub struct HttpGitHubClient {
    token: Option<String>,
    api_url: Url,
    client: Client,
}

impl std::fmt::Debug for HttpGitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpGitHubClient {
    /// Create a client; `None` sends anonymous requests.
    pub fn new(token: Option<String>, config: &GitHubApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { token, api_url: config.api_url.clone(), client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.as_str().trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint(path))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("syncwith/", env!("CARGO_PKG_VERSION")))
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, AppError> {
        let response = builder
            .send()
            .map_err(|e| AppError::Http { endpoint: path.to_string(), details: e.to_string() })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);
        Err(AppError::GitHubApi { status: status.as_u16(), endpoint: path.to_string(), message })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send(self.request(reqwest::Method::GET, path), path)?;
        parse_json(response, path)
    }

    /// Collect every page of a list endpoint.
    fn get_paginated<T, I>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        extract: impl Fn(T) -> Vec<I>,
    ) -> Result<Vec<I>, AppError>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let per_page = PER_PAGE.to_string();

        for page in 1.. {
            let page = page.to_string();
            let builder = self
                .request(reqwest::Method::GET, path)
                .query(query)
                .query(&[("per_page", per_page.as_str()), ("page", page.as_str())]);
            let response = self.send(builder, path)?;
            let batch = extract(parse_json(response, path)?);
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }

        Ok(items)
    }

    fn post(&self, path: &str, body: Option<serde_json::Value>) -> Result<Response, AppError> {
        let mut builder = self.request(reqwest::Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        self.send(builder, path)
    }
}

fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, AppError> {
    response.json().map_err(|e| AppError::ParseError {
        what: format!("response from {}", path),
        details: e.to_string(),
    })
}

fn parse_repo(full_name: &str) -> Result<RepoName, AppError> {
    full_name.parse().map_err(|_| AppError::ParseError {
        what: "repository name".into(),
        details: format!("unexpected value '{}'", full_name),
    })
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiBranch {
    #[serde(rename = "ref")]
    branch: String,
    sha: String,
    repo: Option<ApiRepo>,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: String,
    html_url: String,
    state: String,
    head: ApiBranch,
    base: ApiBranch,
}

impl TryFrom<ApiPullRequest> for PullRequest {
    type Error = AppError;

    fn try_from(pr: ApiPullRequest) -> Result<Self, Self::Error> {
        let base_repo = pr.base.repo.ok_or_else(|| AppError::ParseError {
            what: format!("pull request #{}", pr.number),
            details: "base repository missing".into(),
        })?;
        let head_repo = pr.head.repo.map(|repo| parse_repo(&repo.full_name)).transpose()?;

        Ok(PullRequest {
            number: pr.number,
            title: pr.title,
            html_url: pr.html_url,
            state: pr.state,
            head: HeadRef { branch: pr.head.branch, sha: pr.head.sha, repo: head_repo },
            base_repo: parse_repo(&base_repo.full_name)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchResult {
    #[serde(default)]
    items: Vec<ApiSearchItem>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchItem {
    number: u64,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
    #[serde(default)]
    repository_url: Option<String>,
}

impl ApiSearchItem {
    fn repo_full_name(&self) -> Option<String> {
        // https://api.github.com/repos/{owner}/{name}
        let url = self.repository_url.as_deref()?;
        let (_, tail) = url.split_once("/repos/")?;
        Some(tail.trim_end_matches('/').to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiRunList {
    #[serde(default)]
    workflow_runs: Vec<ApiRun>,
}

#[derive(Debug, Deserialize)]
struct ApiRun {
    id: u64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    run_attempt: Option<u64>,
    #[serde(default)]
    pull_requests: Vec<ApiRunPullRequest>,
}

#[derive(Debug, Deserialize)]
struct ApiRunPullRequest {
    number: u64,
}

impl From<ApiRun> for WorkflowRun {
    fn from(run: ApiRun) -> Self {
        WorkflowRun {
            id: run.id,
            status: run.status.unwrap_or_default(),
            run_attempt: run.run_attempt.unwrap_or(1),
            pull_requests: run.pull_requests.into_iter().map(|pr| pr.number).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiWorkflowList {
    #[serde(default)]
    workflows: Vec<ApiWorkflow>,
}

#[derive(Debug, Deserialize)]
struct ApiWorkflow {
    id: u64,
    path: String,
}

impl GitHub for HttpGitHubClient {
    fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest, AppError> {
        let pr: ApiPullRequest = self.get_json(&format!("/repos/{}/pulls/{}", repo, number))?;
        pr.try_into()
    }

    fn get_issue(&self, issue: &IssueRef) -> Result<Issue, AppError> {
        let path = format!("/repos/{}/issues/{}", issue.repo, issue.number);
        match self.get_json::<ApiIssue>(&path) {
            Ok(api) => Ok(Issue { reference: issue.clone(), html_url: api.html_url }),
            Err(AppError::GitHubApi { status: 404 | 410, .. }) => {
                Err(AppError::IssueNotFound { reference: issue.to_string() })
            }
            Err(e) => Err(e),
        }
    }

    fn list_issue_comments(&self, issue: &IssueRef) -> Result<Vec<IssueComment>, AppError> {
        let path = format!("/repos/{}/issues/{}/comments", issue.repo, issue.number);
        self.get_paginated(&path, &[], |page: Vec<ApiComment>| {
            page.into_iter()
                .map(|c| IssueComment { id: c.id, body: c.body.unwrap_or_default() })
                .collect()
        })
    }

    fn create_issue_comment(&self, issue: &IssueRef, body: &str) -> Result<u64, AppError> {
        let path = format!("/repos/{}/issues/{}/comments", issue.repo, issue.number);
        let response = self.post(&path, Some(json!({ "body": body })))?;
        let comment: ApiComment = parse_json(response, &path)?;
        Ok(comment.id)
    }

    fn update_issue_comment(
        &self,
        repo: &RepoName,
        comment_id: u64,
        body: &str,
    ) -> Result<(), AppError> {
        let path = format!("/repos/{}/issues/comments/{}", repo, comment_id);
        let builder = self.request(reqwest::Method::PATCH, &path).json(&json!({ "body": body }));
        self.send(builder, &path)?;
        Ok(())
    }

    fn search_tagged_pull_requests(
        &self,
        org: &str,
        tag: &str,
    ) -> Result<Vec<PullRequestMention>, AppError> {
        let query = format!("org:{} is:pr is:open in:title \"[{}:\"", org, tag);
        let items = self
            .get_paginated("/search/issues", &[("q", query.as_str())], |page: ApiSearchResult| {
                page.items
            })?;

        let mut hits = Vec::new();
        for item in items {
            if item.pull_request.is_none() {
                continue;
            }
            let Some(full_name) = item.repo_full_name() else {
                continue;
            };
            let repo = parse_repo(&full_name)?;
            hits.push(PullRequestMention { repo, number: item.number });
        }
        Ok(hits)
    }

    fn list_workflow_runs(
        &self,
        repo: &RepoName,
        head_sha: &str,
        event: &str,
    ) -> Result<Vec<WorkflowRun>, AppError> {
        let path = format!("/repos/{}/actions/runs", repo);
        self.get_paginated(&path, &[("head_sha", head_sha), ("event", event)], |page: ApiRunList| {
            page.workflow_runs.into_iter().map(WorkflowRun::from).collect()
        })
    }

    fn get_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<WorkflowRun, AppError> {
        let run: ApiRun = self.get_json(&format!("/repos/{}/actions/runs/{}", repo, run_id))?;
        Ok(run.into())
    }

    fn cancel_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError> {
        self.post(&format!("/repos/{}/actions/runs/{}/cancel", repo, run_id), None)?;
        Ok(())
    }

    fn rerun_workflow_run(&self, repo: &RepoName, run_id: u64) -> Result<(), AppError> {
        self.post(&format!("/repos/{}/actions/runs/{}/rerun", repo, run_id), None)?;
        Ok(())
    }

    fn list_workflows(&self, repo: &RepoName) -> Result<Vec<Workflow>, AppError> {
        let path = format!("/repos/{}/actions/workflows", repo);
        self.get_paginated(&path, &[], |page: ApiWorkflowList| {
            page.workflows.into_iter().map(|w| Workflow { id: w.id, path: w.path }).collect()
        })
    }

    fn list_runs_for_workflow(
        &self,
        repo: &RepoName,
        workflow_id: u64,
        head_sha: &str,
    ) -> Result<Vec<WorkflowRun>, AppError> {
        let path = format!("/repos/{}/actions/workflows/{}/runs", repo, workflow_id);
        self.get_paginated(&path, &[("head_sha", head_sha)], |page: ApiRunList| {
            page.workflow_runs.into_iter().map(WorkflowRun::from).collect()
        })
    }
}
