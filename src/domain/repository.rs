//! Repository names and tracking-issue references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Full repository name, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName {
    owner: String,
    name: String,
}

impl RepoName {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, AppError> {
        let owner = owner.into();
        let name = name.into();
        if !is_valid_segment(&owner) || !is_valid_segment(&name) {
            return Err(AppError::InvalidRepoName(format!("{owner}/{name}")));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Compare names the way GitHub does, ignoring ASCII case.
    pub fn same_repo(&self, other: &RepoName) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepoName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) =
            s.trim().split_once('/').ok_or_else(|| AppError::InvalidRepoName(s.to_string()))?;
        Self::new(owner, name).map_err(|_| AppError::InvalidRepoName(s.to_string()))
    }
}

impl TryFrom<String> for RepoName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoName> for String {
    fn from(value: RepoName) -> Self {
        value.full_name()
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A resolved link to one tracking issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueRef {
    pub repo: RepoName,
    pub number: u64,
}

impl IssueRef {
    /// Resolve a tag value against the organization of the PR that carries it.
    ///
    /// Accepts `owner/repo#N`, `repo#N` (inside `org`) and `#N` (inside
    /// `org/hub_repo`).
    pub fn resolve(value: &str, org: &str, hub_repo: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidIssueReference(value.to_string());

        let (repo_part, number_part) = value.trim().rsplit_once('#').ok_or_else(invalid)?;
        let number: u64 = number_part.trim().parse().map_err(|_| invalid())?;

        let repo_part = repo_part.trim();
        let repo = if repo_part.is_empty() {
            RepoName::new(org, hub_repo)
        } else if repo_part.contains('/') {
            repo_part.parse()
        } else {
            RepoName::new(org, repo_part)
        }
        .map_err(|_| invalid())?;

        Ok(Self { repo, number })
    }

    pub fn same_issue(&self, other: &IssueRef) -> bool {
        self.number == other.number && self.repo.same_repo(&other.repo)
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}
