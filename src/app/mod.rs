pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
mod context;
pub mod output;
pub mod services;

pub use context::AppContext;
