mod env;
mod fake_github;

pub use env::EnvVarGuard;
#[allow(unused_imports)]
pub use fake_github::{FakeGitHub, FakeRun, issue_ref, open_pr, repo, run};
