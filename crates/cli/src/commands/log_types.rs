//! Log type listing

use anyhow::Result;
use labconsole_common::{Attempt, ConsoleConfig, ExecutionState};
use labconsole_tailer::{log_path, LogTypeCatalog};
use serde::Serialize;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Serialize)]
pub struct LogTypeDisplay {
    pub name: String,
    pub file_name: String,
    pub active_path: String,
    pub final_path: String,
    pub default: bool,
}

impl TableDisplay for LogTypeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "File", "While running", "When finished", "Default"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.file_name.clone(),
            self.active_path.clone(),
            self.final_path.clone(),
            if self.default { "✓" } else { "" }.to_string(),
        ]
    }
}

fn describe(config: &ConsoleConfig) -> Vec<LogTypeDisplay> {
    let running = Attempt::new("", ExecutionState::Running);
    let finished = Attempt::new("", ExecutionState::Completed);

    LogTypeCatalog::from_config(config)
        .all()
        .iter()
        .map(|t| LogTypeDisplay {
            name: t.name.clone(),
            file_name: t.file_name.clone(),
            active_path: log_path(Some(&running), Some(t), config).unwrap_or_default(),
            final_path: log_path(Some(&finished), Some(t), config).unwrap_or_default(),
            default: t.name.eq_ignore_ascii_case(&config.default_log_type),
        })
        .collect()
}

pub fn execute(config: &ConsoleConfig, format: OutputFormat) -> Result<()> {
    print_list(&describe(config), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let rows = describe(&ConsoleConfig::default());
        assert_eq!(rows.len(), 2);

        let test_log = rows.iter().find(|r| r.name == "Test Log").unwrap();
        assert_eq!(test_log.active_path, "tmp/stdout.txt");
        assert_eq!(test_log.final_path, "logs/stdout.txt");
        assert!(test_log.default);
    }
}
