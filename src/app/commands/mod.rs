//! Command implementations, one per subcommand.
//!
//! Each command takes an options struct and returns a plain output value; the
//! CLI layer decides how outputs are published.

pub mod checkout;
pub mod fetch;
pub mod find_prs;
pub mod link;
pub mod rerun;

pub use checkout::{CheckoutOptions, CheckoutOutput};
pub use fetch::{FetchKind, FetchOptions, FetchOutput};
pub use find_prs::{FindPrsOptions, FindPrsOutput, SyncedPrEntry};
pub use link::{COMMENT_STATUS_OUTPUT, LinkOptions, LinkOutput};
pub use rerun::{RerunOptions, RerunOutput};
