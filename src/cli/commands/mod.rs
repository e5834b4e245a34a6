//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `sync`: Source library to front-end data files
//! - `enrich`: Online lookups written back to Calibre
//! - `stats`: Summary of the persisted library
//! - `config`: Show or initialize the configuration

mod config;
mod enrich;
mod stats;
mod sync;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;

pub use config::cmd_config;
pub use enrich::cmd_enrich;
pub use stats::cmd_stats;
pub use sync::{SyncArgs, cmd_sync};

/// Shelf Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "SHELF_MINDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a source library and merge it into the front-end data
    Sync(SyncArgs),
    /// Look books up online and write new tags and synopses back to Calibre
    Enrich {
        /// Path to Calibre's metadata.db (default: library.calibre_path from config)
        #[arg(long)]
        calibre_db: Option<PathBuf>,
        /// Maximum number of books to look up
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only look up books with few tags or a short synopsis
        #[arg(long)]
        only_missing: bool,
        /// Dry run - show what would be written without touching the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Summarize the persisted library
    Stats {
        /// Library file (default: from config)
        #[arg(long)]
        library: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli);

    match &cli.command {
        Commands::Sync(args) => {
            let rt = Runtime::new()?;
            cmd_sync(&rt, &config, args)
        }
        Commands::Enrich {
            calibre_db,
            limit,
            only_missing,
            dry_run,
        } => {
            let rt = Runtime::new()?;
            cmd_enrich(
                &rt,
                &config,
                calibre_db.as_ref(),
                *limit,
                *only_missing,
                *dry_run,
            )
        }
        Commands::Stats { library, json } => cmd_stats(&config, library.as_ref(), *json),
        Commands::Config { init } => cmd_config(&config, cli.config.as_ref(), *init),
    }
}

fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Shorten a title for one-line progress output
pub(crate) fn short_title(title: &str) -> String {
    const MAX_CHARS: usize = 50;
    if title.chars().count() <= MAX_CHARS {
        title.to_string()
    } else {
        let cut: String = title.chars().take(MAX_CHARS - 3).collect();
        format!("{}...", cut)
    }
}
