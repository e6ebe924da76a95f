//! Core types for LabConsole

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution state of a job attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Queued,
    Running,
    Canceled,
    Completed,
    Error,
    Fatal,
    #[serde(other)]
    Unknown,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl ExecutionState {
    /// States after which an attempt produces no further output.
    pub const FINAL: [ExecutionState; 4] = [
        ExecutionState::Completed,
        ExecutionState::Error,
        ExecutionState::Fatal,
        ExecutionState::Canceled,
    ];

    pub fn is_final(self) -> bool {
        Self::FINAL.contains(&self)
    }

    /// Which log directory holds output for an attempt in this state.
    pub fn log_phase(self) -> LogPhase {
        if self.is_final() {
            LogPhase::Final
        } else {
            LogPhase::Active
        }
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionState::Queued => write!(f, "QUEUED"),
            ExecutionState::Running => write!(f, "RUNNING"),
            ExecutionState::Canceled => write!(f, "CANCELED"),
            ExecutionState::Completed => write!(f, "COMPLETED"),
            ExecutionState::Error => write!(f, "ERROR"),
            ExecutionState::Fatal => write!(f, "FATAL"),
            ExecutionState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Log directory classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPhase {
    /// Attempt still executing; logs live in the active directory.
    Active,
    /// Attempt finished; logs were moved to the final directory.
    Final,
}

/// One execution instance of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub attempt_id: String,
    #[serde(default)]
    pub command_id: String,
    #[serde(default)]
    pub state: ExecutionState,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Attempt {
    pub fn new(attempt_id: impl Into<String>, state: ExecutionState) -> Self {
        Self {
            attempt_id: attempt_id.into(),
            command_id: String::new(),
            state,
            start_time: None,
            end_time: None,
            summary: None,
        }
    }

    pub fn with_command(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = command_id.into();
        self
    }

    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }
}

/// Snapshot of a test run and its attempts, as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRunSnapshot {
    pub id: String,
    #[serde(default)]
    pub state: ExecutionState,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
}

/// One chunk of log output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogChunk {
    #[serde(default)]
    pub lines: Vec<String>,
    /// Byte offset the chunk starts at.
    #[serde(default)]
    pub offset: u64,
    /// Number of bytes covered by the chunk.
    #[serde(default)]
    pub length: u64,
}

/// A named log stream and the file that backs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogType {
    pub name: String,
    pub file_name: String,
}

impl LogType {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
        }
    }

    pub fn host_log() -> Self {
        Self::new("Host Log", "host_log.txt")
    }

    pub fn test_log() -> Self {
        Self::new("Test Log", "stdout.txt")
    }

    /// Built-in catalogue
    pub fn defaults() -> Vec<LogType> {
        vec![Self::host_log(), Self::test_log()]
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_states() {
        for state in ExecutionState::FINAL {
            assert!(state.is_final());
            assert_eq!(state.log_phase(), LogPhase::Final);
        }
        for state in [
            ExecutionState::Queued,
            ExecutionState::Running,
            ExecutionState::Unknown,
        ] {
            assert!(!state.is_final());
            assert_eq!(state.log_phase(), LogPhase::Active);
        }
    }

    #[test]
    fn test_attempt_deserialize() {
        let json = r#"{
            "attempt_id": "att-1",
            "command_id": "cmd-9",
            "state": "RUNNING",
            "start_time": "2024-03-01T10:00:00Z"
        }"#;
        let attempt: Attempt = serde_json::from_str(json).unwrap();
        assert_eq!(attempt.attempt_id, "att-1");
        assert_eq!(attempt.command_id, "cmd-9");
        assert_eq!(attempt.state, ExecutionState::Running);
        assert!(attempt.start_time.is_some());
        assert!(attempt.end_time.is_none());
    }

    #[test]
    fn test_unrecognized_state_is_unknown() {
        let attempt: Attempt =
            serde_json::from_str(r#"{"attempt_id": "a", "state": "BACKFILLING"}"#).unwrap();
        assert_eq!(attempt.state, ExecutionState::Unknown);
        assert!(!attempt.is_final());
    }

    #[test]
    fn test_log_chunk_defaults() {
        let chunk: LogChunk = serde_json::from_str(r#"{"lines": ["x"]}"#).unwrap();
        assert_eq!(chunk.lines, vec!["x".to_string()]);
        assert_eq!(chunk.offset, 0);
        assert_eq!(chunk.length, 0);
    }
}
