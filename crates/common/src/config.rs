//! LabConsole configuration

use crate::error::{Error, Result};
use crate::types::LogType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Upper bound for `ConsoleConfig::max_lines`
pub const MAX_CONSOLE_LINES: usize = 100_000;

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Base URL of the lab REST API
    pub api_url: String,

    /// Per-request timeout for API calls
    pub request_timeout_secs: u64,

    /// Log console configuration
    pub console: ConsoleConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api/v1".to_string(),
            request_timeout_secs: 30,
            console: ConsoleConfig::default(),
        }
    }
}

/// Log console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum number of lines kept in the console
    pub max_lines: usize,

    /// Delay between fetches while an attempt is executing
    pub poll_interval_ms: u64,

    /// Directory holding logs of attempts that are still executing
    pub active_log_dir: String,

    /// Directory holding logs of finished attempts
    pub final_log_dir: String,

    /// Log type selected when a console is created
    pub default_log_type: String,

    /// Selectable log streams
    pub log_types: Vec<LogType>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_lines: 200,
            poll_interval_ms: 4000,
            active_log_dir: "tmp".to_string(),
            final_log_dir: "logs".to_string(),
            default_log_type: LogType::test_log().name,
            log_types: LogType::defaults(),
        }
    }
}

impl ConsoleConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the values a console cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.max_lines == 0 {
            return Err(Error::InvalidConfig("max_lines must be at least 1".into()));
        }
        if self.max_lines > MAX_CONSOLE_LINES {
            return Err(Error::InvalidConfig(format!(
                "max_lines must be at most {}",
                MAX_CONSOLE_LINES
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be at least 1".into(),
            ));
        }
        if self.log_types.is_empty() {
            return Err(Error::InvalidConfig("no log types configured".into()));
        }
        if !self
            .log_types
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(&self.default_log_type))
        {
            return Err(Error::InvalidConfig(format!(
                "default log type '{}' is not in the catalogue",
                self.default_log_type
            )));
        }
        Ok(())
    }
}

impl LabConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config.console.validate()?;
        Ok(config)
    }

    /// Parse configuration from file without validating it
    pub fn read(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.max_lines, 200);
        assert_eq!(config.poll_interval(), Duration::from_millis(4000));
        assert_eq!(config.log_types.len(), 2);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LabConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.console.max_lines, 200);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LabConfig::default();
        config.api_url = "https://lab.example.com/api".to_string();
        config.console.max_lines = 50;
        config.save(&path).unwrap();

        let loaded = LabConfig::load(&path).unwrap();
        assert_eq!(loaded.api_url, "https://lab.example.com/api");
        assert_eq!(loaded.console.max_lines, 50);
        assert_eq!(loaded.console.log_types, LogType::defaults());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[console]\npoll_interval_ms = 1500\n").unwrap();

        let loaded = LabConfig::load(&path).unwrap();
        assert_eq!(loaded.console.poll_interval_ms, 1500);
        assert_eq!(loaded.console.max_lines, 200);
        assert_eq!(loaded.request_timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_unknown_default_type() {
        let config = ConsoleConfig {
            default_log_type: "Kernel Log".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_lines() {
        let config = ConsoleConfig {
            max_lines: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_line_limit() {
        let config = ConsoleConfig {
            max_lines: usize::MAX / 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = ConsoleConfig {
            max_lines: MAX_CONSOLE_LINES,
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_read_skips_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[console]\nmax_lines = 0\n").unwrap();

        assert!(LabConfig::load(&path).is_err());
        assert_eq!(LabConfig::read(&path).unwrap().console.max_lines, 0);
    }
}
