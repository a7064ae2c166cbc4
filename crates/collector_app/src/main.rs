//! `job-collector`: one-off collection runs and store maintenance.
//!
//! Scheduling is left to the caller (cron, systemd timers, ...).
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use collector_engine::CollectorHandle;
use collector_logging::collector_info;

use logging::LogDestination;

#[derive(Parser)]
#[command(name = "job-collector")]
#[command(about = "Collects public job postings into a deduplicated CSV file")]
struct Cli {
    /// RON configuration file; ./collector.ron is used when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, global = true, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single collection cycle and exit
    CollectOnce {
        /// Maximum number of postings to collect (0 uses the configured maximum)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete the data file and recreate a fresh header
    ResetData,

    /// Drop duplicate postings from the data file
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let app_config = config::load(cli.config.as_deref())?;
    let handle = CollectorHandle::new(app_config.into()).context("starting collector")?;

    match cli.command {
        Commands::CollectOnce { limit } => {
            let written = handle.run_cycle(limit)?;
            collector_info!(
                "Collection finished: {} new row(s) in {:?}",
                written,
                handle.store_path()
            );
        }
        Commands::ResetData => handle.reset_store()?,
        Commands::Compact => {
            let removed = handle.compact_store()?;
            collector_info!("Removed {} duplicate row(s) from {:?}", removed, handle.store_path());
        }
    }
    Ok(())
}
