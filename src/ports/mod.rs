mod git;
mod github;

pub use git::GitCheckout;
pub use github::{
    GitHub, HeadRef, Issue, IssueComment, PullRequest, PullRequestMention, Workflow, WorkflowRun,
};
