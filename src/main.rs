//! Shelf Minder - e-book library metadata sync.
//!
//! Reads a Calibre library (or a JSON export of one), infers reading
//! attributes for every book, and merges the result into the data files a
//! reading-recommendation front end consumes. Can also fill metadata gaps
//! from online catalogues and write them back to Calibre.

pub mod cli;
pub mod config;
pub mod cover;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod inference;
pub mod library;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod overlay;
pub mod quality;
pub mod source;
pub mod sync;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("shelf_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
