//! `[key: value]` tags embedded in issue and pull request titles.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\w+):\s*([^\]]+)\]").expect("tag pattern must compile"));

/// Tags parsed out of a piece of free text, keyed case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Collect every `[key: value]` occurrence in `text`.
    ///
    /// Values are trimmed; the last occurrence of a duplicated key wins.
    pub fn parse(text: &str) -> Self {
        let tags = TAG_REGEX
            .captures_iter(text)
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .collect();
        Self(tags)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
