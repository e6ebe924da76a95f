//! Attempt listing

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use labconsole_common::Attempt;
use serde::Serialize;

use crate::client::HttpClient;
use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct AttemptsArgs {
    /// Test run ID
    pub job_id: String,
}

/// Attempt display wrapper for serialization
#[derive(Serialize)]
pub struct AttemptDisplay {
    pub attempt_id: String,
    pub command_id: String,
    pub state: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whether `tail` follows this attempt by default
    pub default: bool,
}

impl AttemptDisplay {
    fn from_attempts(attempts: &[Attempt]) -> Vec<Self> {
        let last = attempts.len().saturating_sub(1);
        attempts
            .iter()
            .enumerate()
            .map(|(i, a)| Self {
                attempt_id: a.attempt_id.clone(),
                command_id: a.command_id.clone(),
                state: a.state.to_string(),
                start_time: a.start_time,
                end_time: a.end_time,
                default: i == last,
            })
            .collect()
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl TableDisplay for AttemptDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Attempt", "Command", "State", "Started", "Ended", ""]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.attempt_id.clone(),
            self.command_id.clone(),
            self.state.clone(),
            format_time(self.start_time),
            format_time(self.end_time),
            if self.default { "◀ latest" } else { "" }.to_string(),
        ]
    }
}

pub async fn execute(args: AttemptsArgs, client: &HttpClient, format: OutputFormat) -> Result<()> {
    let run = client.get_test_run(&args.job_id).await?;
    print_list(&AttemptDisplay::from_attempts(&run.attempts), format);
    Ok(())
}
