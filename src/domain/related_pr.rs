//! Snapshot of one pull request in a sync group.

use serde::{Deserialize, Serialize};

use crate::domain::{AppError, RepoName};

/// One pull request of the related set, as recorded in the tracking issue.
///
/// Ordering is by repository first, which is the display and comparison order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelatedPr {
    /// Base repository full name.
    pub repo: RepoName,
    pub number: u64,
    /// Head commit SHA.
    pub sha: String,
    /// Pull request web URL.
    pub url: String,
}

impl RelatedPr {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// Encode a list for the hidden block of the issue comment.
    pub fn encode_list(prs: &[RelatedPr]) -> Result<String, AppError> {
        serde_json::to_string(prs).map_err(|e| AppError::ParseError {
            what: "related PR list".into(),
            details: e.to_string(),
        })
    }

    /// Decode a list previously written by [`RelatedPr::encode_list`].
    pub fn decode_list(text: &str) -> Result<Vec<RelatedPr>, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::ParseError {
            what: "related PR list".into(),
            details: e.to_string(),
        })
    }
}
