//! Config Commands

use anyhow::{bail, Result};
use clap::Subcommand;
use labconsole_common::LabConfig;
use std::path::Path;

use crate::output::{print_success, print_warning};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Operates on the file as-is, without validation.
pub fn execute(cmd: ConfigCommands, path: &Path, api_url: Option<&str>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let mut config = LabConfig::read(path)?;
            if let Some(api_url) = api_url {
                config.api_url = api_url.to_string();
            }
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            if let Err(e) = config.console.validate() {
                print_warning(&e.to_string());
            }
        }
        ConfigCommands::Init { force } => {
            init(path, force)?;
            print_success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    LabConfig::default().save(path)?;
    Ok(())
}
