//! Embedded comment templates.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::domain::AppError;

/// Visible part of the tracking-issue comment.
pub static RELATED_PRS: &str = include_str!("templates/related_prs.md");
/// One-time notice posted on a synced pull request.
pub static PR_NOTICE: &str = include_str!("templates/pr_notice.md");

const RELATED_PRS_NAME: &str = "related_prs.md";
const PR_NOTICE_NAME: &str = "pr_notice.md";

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(RELATED_PRS_NAME, RELATED_PRS).expect("embedded template must parse");
        env.add_template(PR_NOTICE_NAME, PR_NOTICE).expect("embedded template must parse");
        env
    })
}

fn render(name: &str, context: impl Serialize) -> Result<String, AppError> {
    environment().get_template(name).and_then(|t| t.render(context)).map_err(|err| {
        AppError::ParseError { what: format!("template {}", name), details: err.to_string() }
    })
}

#[derive(Serialize)]
struct RelatedPrsContext<'a, T: Serialize> {
    prs: &'a [T],
}

/// Render the bullet list of synced pull requests.
pub fn render_related_prs<T: Serialize>(prs: &[T]) -> Result<String, AppError> {
    render(RELATED_PRS_NAME, RelatedPrsContext { prs })
}

#[derive(Serialize)]
struct PrNoticeContext<'a> {
    tag_label: &'a str,
    issue: &'a str,
    issue_url: &'a str,
}

/// Render the notice linking a pull request to its tracking issue.
pub fn render_pr_notice(tag: &str, issue: &str, issue_url: &str) -> Result<String, AppError> {
    let tag_label = format!("{}:", tag);
    render(PR_NOTICE_NAME, PrNoticeContext { tag_label: &tag_label, issue, issue_url })
}

/// The notice as earlier releases wrote it, without a colon after the tag.
pub fn render_legacy_pr_notice(
    tag: &str,
    issue: &str,
    issue_url: &str,
) -> Result<String, AppError> {
    render(PR_NOTICE_NAME, PrNoticeContext { tag_label: tag, issue, issue_url })
}
