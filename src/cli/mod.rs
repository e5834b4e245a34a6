//! Command-line interface for shelf-minder.
//!
//! Subcommands sync a library into the front-end data files, enrich a
//! Calibre library from online catalogues, and summarize the result.

mod commands;

pub use commands::{Cli, Commands, run_command};
