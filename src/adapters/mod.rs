mod git_checkout;
mod github_http;

pub use git_checkout::Git2Checkout;
pub use github_http::HttpGitHubClient;
