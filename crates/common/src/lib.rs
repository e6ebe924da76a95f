//! LabConsole Common Library
//!
//! Shared types, errors, and configuration for the LabConsole log console.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ConsoleConfig, LabConfig, MAX_CONSOLE_LINES};
pub use error::{Error, Result};
pub use types::*;

/// LabConsole version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration directory
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".labconsole")
}

/// Default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
