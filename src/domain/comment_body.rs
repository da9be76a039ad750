//! Managed comment bodies: a hidden machine-readable block plus visible text.
//!
//! Layout: `<!-- {tag}\n{hidden}\n-->\n{visible}`. The HTML comment keeps the
//! hidden block out of the rendered page while letting the next run read it
//! back verbatim.

use std::sync::LazyLock;

use regex::Regex;

/// Marker tag of the tracking-issue comment listing synced pull requests.
pub const RELATED_PRS_TAG: &str = "LINKED-PR-COMMENT";

/// Suffix appended to generated comments that must not be edited by hand.
pub const CAUTION_NOTE: &str =
    "\n\n**Note:** Please do not edit this comment; it's generated automatically.";

static BODY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!-- (.*?)\n(.*?)\n-->\n(.*)").expect("comment pattern must compile")
});

/// Decoded contents of a managed comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBody {
    pub hidden_text: String,
    pub visible_text: String,
}

impl CommentBody {
    pub fn new(hidden_text: impl Into<String>, visible_text: impl Into<String>) -> Self {
        Self { hidden_text: hidden_text.into(), visible_text: visible_text.into() }
    }

    /// Render the body for storage under `tag`.
    pub fn encode(&self, tag: &str, add_caution_note: bool) -> String {
        let caution = if add_caution_note { CAUTION_NOTE } else { "" };
        format!("<!-- {tag}\n{}\n-->\n{}{caution}", self.hidden_text, self.visible_text)
    }

    /// Parse a stored body, returning `None` unless it was written under `expected_tag`.
    ///
    /// CRLF line endings are normalized first; GitHub stores them after a manual edit.
    pub fn decode(raw_text: &str, expected_tag: &str) -> Option<Self> {
        if expected_tag.is_empty() || !raw_text.contains(expected_tag) {
            return None;
        }

        let normalized = raw_text.replace("\r\n", "\n");
        let caps = BODY_REGEX.captures(&normalized)?;
        if &caps[1] != expected_tag {
            return None;
        }

        Some(Self::new(&caps[2], &caps[3]))
    }
}
