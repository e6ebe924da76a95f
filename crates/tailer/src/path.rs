//! Log file path derivation

use labconsole_common::{Attempt, ConsoleConfig, Error, LogPhase, LogType, Result};

/// Path of `log_type`'s file for `attempt`, relative to the job's output root.
///
/// Executing attempts write to the active directory; finished attempts have
/// their logs moved to the final directory.
pub fn log_path(
    attempt: Option<&Attempt>,
    log_type: Option<&LogType>,
    config: &ConsoleConfig,
) -> Option<String> {
    let attempt = attempt?;
    let log_type = log_type?;
    if log_type.file_name.is_empty() {
        return None;
    }

    let dir = match attempt.state.log_phase() {
        LogPhase::Active => &config.active_log_dir,
        LogPhase::Final => &config.final_log_dir,
    };
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        Some(log_type.file_name.clone())
    } else {
        Some(format!("{}/{}", dir, log_type.file_name))
    }
}

/// The fixed set of selectable log types
#[derive(Debug, Clone)]
pub struct LogTypeCatalog {
    types: Vec<LogType>,
}

impl LogTypeCatalog {
    pub fn new(types: Vec<LogType>) -> Self {
        Self { types }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.log_types.clone())
    }

    pub fn all(&self) -> &[LogType] {
        &self.types
    }

    /// Look up a log type by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<&LogType> {
        self.types
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::UnknownLogType(name.to_string()))
    }
}

impl Default for LogTypeCatalog {
    fn default() -> Self {
        Self::new(LogType::defaults())
    }
}
