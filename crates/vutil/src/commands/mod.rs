//! CLI command implementations

pub mod config;
pub mod remove;
pub mod retry;
pub mod stamp;
