//! Workflow building blocks shared by the commands.

pub mod issue_comment;
pub mod related_prs;
pub mod workflow_runs;

pub use issue_comment::{CommentStatus, ensure_pr_notice, related_pr_list, sync_issue_comment};
pub use related_prs::{SyncGroup, resolve_sync_group, resolve_tracking_issue, tracking_issue_ref};
pub use workflow_runs::{WaitOutcome, WaitPolicy, rerun_all, wait_for_completion};
