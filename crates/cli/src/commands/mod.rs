//! CLI command implementations

pub mod attempts;
pub mod config;
pub mod log_types;
pub mod tail;
