pub mod comment_body;
pub mod configuration;
pub mod error;
pub mod related_pr;
pub mod repository;
pub mod run_status;
pub mod tags;

pub use comment_body::{CAUTION_NOTE, CommentBody, RELATED_PRS_TAG};
pub use configuration::{GitHubApiConfig, SyncConfig, WorkflowWaitConfig};
pub use error::AppError;
pub use related_pr::RelatedPr;
pub use repository::{IssueRef, RepoName};
pub use run_status::{FINAL_STATUSES, is_final_status};
pub use tags::Tags;
