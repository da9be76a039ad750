//! Shared testing utilities for syncwith CLI tests.

use assert_cmd::Command;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment: a mock GitHub API plus a scratch `GITHUB_OUTPUT` file.
#[allow(dead_code)]
pub struct TestContext {
    pub server: ServerGuard,
    root: TempDir,
    output_file: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let server = Server::new();
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let output_file = root.path().join("github_output");
        fs::write(&output_file, "").expect("Failed to create GITHUB_OUTPUT file");
        Self { server, root, output_file }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for the compiled `syncwith` binary wired to the mock API.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("syncwith").expect("Failed to locate syncwith binary");
        cmd.current_dir(self.root.path())
            .env("CI_TOKEN", "test-token")
            .env("GITHUB_API_URL", self.server.url())
            .env("GITHUB_OUTPUT", &self.output_file)
            .env_remove("GITHUB_REPOSITORY")
            .env_remove("SYNCWITH_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Contents written to `GITHUB_OUTPUT` so far.
    pub fn step_outputs(&self) -> String {
        fs::read_to_string(&self.output_file).expect("Failed to read GITHUB_OUTPUT")
    }

    pub fn mock_pull(&mut self, repo: &str, number: u64, title: &str, sha: &str) -> Mock {
        let body = pull_json(repo, number, title, sha);
        self.server
            .mock("GET", format!("/repos/{}/pulls/{}", repo, number).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    pub fn mock_issue(&mut self, repo: &str, number: u64) -> Mock {
        let body = json!({
            "number": number,
            "html_url": format!("https://github.com/{}/issues/{}", repo, number),
        });
        self.server
            .mock("GET", format!("/repos/{}/issues/{}", repo, number).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// Organization-wide pull request search answering with the given pull requests.
    pub fn mock_search(&mut self, pulls: &[(&str, u64)]) -> Mock {
        let items: Vec<Value> = pulls
            .iter()
            .map(|(repo, number)| {
                json!({
                    "number": number,
                    "pull_request": { "url": "" },
                    "repository_url": format!("https://api.github.com/repos/{}", repo),
                })
            })
            .collect();
        let total = items.len();
        self.list_mock(
            "/search/issues",
            json!({ "total_count": total, "incomplete_results": false, "items": items }),
        )
    }

    /// Comments on `repo#number`, given as `(id, body)` pairs.
    pub fn mock_comments(&mut self, repo: &str, number: u64, comments: &[(u64, &str)]) -> Mock {
        let list: Vec<Value> =
            comments.iter().map(|(id, body)| json!({ "id": id, "body": body })).collect();
        self.list_mock(&format!("/repos/{}/issues/{}/comments", repo, number), Value::from(list))
    }

    pub fn mock_create_comment(&mut self, repo: &str, number: u64, id: u64) -> Mock {
        self.server
            .mock("POST", format!("/repos/{}/issues/{}/comments", repo, number).as_str())
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": id, "body": "" }).to_string())
            .create()
    }

    /// GET endpoint answering every page request with `body`.
    pub fn list_mock(&mut self, path: &str, body: Value) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }
}

pub fn pull_json(repo: &str, number: u64, title: &str, sha: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "html_url": format!("https://github.com/{}/pull/{}", repo, number),
        "state": "open",
        "head": {
            "ref": format!("feature-{}", number),
            "sha": sha,
            "repo": { "full_name": repo },
        },
        "base": {
            "ref": "main",
            "sha": "base",
            "repo": { "full_name": repo },
        },
    })
}
