//! LabConsole CLI - Main Entry Point
//!
//! Follows the log output of test-lab job attempts from the terminal.

use clap::{Parser, Subcommand};
use labconsole_common::LabConfig;
use std::path::PathBuf;
use std::sync::Arc;

mod client;
mod commands;
mod output;

use commands::{attempts, config, log_types, tail};

/// LabConsole CLI - live log console for test runs
#[derive(Parser)]
#[command(name = "labconsole")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "LABCONSOLE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Lab API base URL (overrides the configuration file)
    #[arg(long, env = "LABCONSOLE_API_URL", global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the log of a test run's attempt
    Tail(tail::TailArgs),

    /// List the attempts of a test run
    Attempts(attempts::AttemptsArgs),

    /// List the configured log types
    LogTypes,

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(labconsole_common::default_config_path);
    let api_url = cli.api_url;
    let load_config = || -> anyhow::Result<LabConfig> {
        let mut config = LabConfig::load(&config_path)?;
        if let Some(api_url) = &api_url {
            config.api_url = api_url.clone();
        }
        Ok(config)
    };
    let make_client = |config: &LabConfig| {
        client::HttpClient::new(&config.api_url, config.request_timeout())
    };

    match cli.command {
        Commands::Tail(args) => {
            let lab_config = load_config()?;
            let client = Arc::new(make_client(&lab_config)?);
            tail::execute(args, client, &lab_config).await?
        }
        Commands::Attempts(args) => {
            let client = make_client(&load_config()?)?;
            attempts::execute(args, &client, cli.format).await?
        }
        Commands::LogTypes => log_types::execute(&load_config()?.console, cli.format)?,
        Commands::Config(cmd) => config::execute(cmd, &config_path, api_url.as_deref())?,
        Commands::Version => {
            println!("LabConsole CLI v{}", labconsole_common::VERSION);
        }
    }

    Ok(())
}
