//! Tail Command

use anyhow::Result;
use clap::Args;
use labconsole_common::LabConfig;
use labconsole_tailer::{AttemptSource, ConsoleEvent, LogTailer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::client::HttpClient;
use crate::output::{print_header, print_info, print_note, print_warning};

#[derive(Args)]
pub struct TailArgs {
    /// Test run ID
    pub job_id: String,

    /// Log type to follow (e.g. "Host Log", "Test Log")
    #[arg(short, long)]
    pub log_type: Option<String>,

    /// Attempt to follow instead of the latest one
    #[arg(short, long)]
    pub attempt: Option<String>,

    /// Seconds between attempt list refreshes
    #[arg(long, default_value = "5")]
    pub refresh_secs: u64,

    /// Override the log poll interval
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Override the console line limit
    #[arg(long)]
    pub max_lines: Option<usize>,
}

/// One line of terminal output
#[derive(Debug, PartialEq, Eq)]
enum ConsoleLine {
    Header(String),
    Note(String),
    Text(String),
}

fn lines_for(event: &ConsoleEvent) -> Vec<ConsoleLine> {
    match event {
        ConsoleEvent::Appended(lines) => lines.iter().cloned().map(ConsoleLine::Text).collect(),
        ConsoleEvent::Replaced(lines) => std::iter::once(ConsoleLine::Note(
            "… earlier output dropped …".to_string(),
        ))
        .chain(lines.iter().cloned().map(ConsoleLine::Text))
        .collect(),
        ConsoleEvent::Cleared => Vec::new(),
        ConsoleEvent::Restarted { attempt_id, path } => {
            let title = match path {
                Some(path) => format!("attempt {} · {}", attempt_id, path),
                None => format!("attempt {}", attempt_id),
            };
            vec![ConsoleLine::Header(title)]
        }
    }
}

fn render(event: &ConsoleEvent) {
    for line in lines_for(event) {
        match line {
            ConsoleLine::Header(title) => print_header(&title),
            ConsoleLine::Note(note) => print_note(&note),
            ConsoleLine::Text(text) => println!("{}", text),
        }
    }
}

pub async fn execute(args: TailArgs, client: Arc<HttpClient>, config: &LabConfig) -> Result<()> {
    let mut console = config.console.clone();
    if let Some(interval) = args.poll_interval_ms {
        console.poll_interval_ms = interval;
    }
    if let Some(max_lines) = args.max_lines {
        console.max_lines = max_lines;
    }

    let mut tailer = LogTailer::new(&args.job_id, client.clone(), console)?;
    if let Some(name) = &args.log_type {
        tailer.select_log_type(name)?;
    }
    let mut events = tailer.subscribe();

    let attempts = client.attempts(&args.job_id).await?;
    if attempts.is_empty() {
        print_info(&format!("Test run {} has no attempts yet, waiting…", args.job_id));
    }
    tailer.set_attempts(attempts);
    if let Some(attempt_id) = &args.attempt {
        tailer.select_attempt(attempt_id)?;
    }

    let mut refresh = tokio::time::interval(Duration::from_secs(args.refresh_secs.max(1)));
    refresh.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, stopping console");
                break;
            }
            _ = refresh.tick() => {
                match client.attempts(&args.job_id).await {
                    Ok(attempts) => tailer.set_attempts(attempts),
                    Err(e) => warn!("Failed to refresh attempts: {}", e),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => render(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        print_warning(&format!("Console fell behind, {} updates skipped", skipped));
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tailer.stop_polling();
    Ok(())
}
