//! syncwith: coordinate CI across pull requests synced through a tracking issue.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::AppError;
