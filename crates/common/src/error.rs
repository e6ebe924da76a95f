//! Error types for LabConsole

use thiserror::Error;

/// Result type alias using LabConsole Error
pub type Result<T> = std::result::Result<T, Error>;

/// LabConsole error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// Any failure while retrieving log output or attempts from the backend.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Unknown log type: {0}")]
    UnknownLogType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Error::Fetch(msg.into())
    }

    pub fn attempt_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "attempt".to_string(),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::attempt_not_found("a-1");
        assert_eq!(err.to_string(), "Resource not found: attempt with id a-1");
    }

    #[test]
    fn test_fetch_kind() {
        let err = Error::fetch("connection reset");
        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(err.to_string(), "Fetch failed: connection reset");
    }
}
