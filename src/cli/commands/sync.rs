//! Library sync command.

use clap::Args;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::enrichment::EnrichmentService;
use crate::source::Source;
use crate::sync::{self, SyncOptions, SyncReport};

use super::short_title;

/// Arguments for `sync`
#[derive(Args, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Read records from a JSON export
    #[arg(long, conflicts_with = "calibre_path")]
    pub json_export: Option<PathBuf>,
    /// Read records from a Calibre library directory
    #[arg(long)]
    pub calibre_path: Option<PathBuf>,
    /// Output directory (default: library.output_dir from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Add overlay entries for books without one
    #[arg(long)]
    pub generate_hooks: bool,
    /// Copy cover images into the output directory
    #[arg(long)]
    pub copy_covers: bool,
    /// Fill missing tags and synopses online before normalizing
    #[arg(long)]
    pub lookup: bool,
    /// Don't write sync_report.json
    #[arg(long)]
    pub no_report: bool,
    /// Dry run - show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Combine flags with config; flags win.
    pub fn to_options(&self, config: &Config) -> anyhow::Result<SyncOptions> {
        let source = match (&self.json_export, &self.calibre_path, &config.library.calibre_path) {
            (Some(export), _, _) => Source::JsonExport(export.clone()),
            (None, Some(library), _) | (None, None, Some(library)) => {
                Source::Calibre(library.clone())
            }
            (None, None, None) => anyhow::bail!(
                "No source given: pass --json-export or --calibre-path, or set library.calibre_path in the config"
            ),
        };

        let mut options = SyncOptions::from_config(config, source);
        if let Some(output) = &self.output {
            options.output_dir = output.clone();
        }
        options.lookup = self.lookup;
        options.generate_hooks |= self.generate_hooks;
        options.copy_covers |= self.copy_covers;
        options.write_report &= !self.no_report;
        options.dry_run = self.dry_run;
        Ok(options)
    }
}

/// Sync a source library into the front-end data files
pub fn cmd_sync(rt: &Runtime, config: &Config, args: &SyncArgs) -> anyhow::Result<()> {
    let options = args.to_options(config)?;

    rt.block_on(async {
        let service = if options.lookup {
            Some(EnrichmentService::new(&config.lookup)?)
        } else {
            None
        };

        println!("Syncing {} into {:?}", options.source, options.output_dir);
        if options.dry_run {
            println!("(dry run - nothing will be written)");
        }
        println!();

        let report = sync::run(&options, service.as_ref()).await?;
        print_report(&report);
        anyhow::Ok(())
    })
}

fn print_report(report: &SyncReport) {
    for title in &report.added {
        println!("  + {}", short_title(title));
    }
    for title in &report.updated {
        println!("  ~ {}", short_title(title));
    }

    println!();
    println!("=== Sync {} ===", if report.dry_run { "preview" } else { "complete" });
    println!("Records read:    {}", report.read);
    if report.enriched > 0 {
        println!("Enriched online: {}", report.enriched);
    }
    println!("Added:           {}", report.added.len());
    println!("Updated:         {}", report.updated.len());
    println!("Library size:    {}", report.total_books);
    if report.repeated_matches > 0 {
        println!("Repeated matches: {} (same book twice in the source?)", report.repeated_matches);
    }

    if let Some(covers) = &report.covers {
        println!(
            "Covers:          {} copied, {} unchanged, {} missing",
            covers.copied,
            covers.unchanged,
            covers.missing.len()
        );
        for title in covers.missing.iter().take(10) {
            println!("  ✗ {}", short_title(title));
        }
        if covers.missing.len() > 10 {
            println!("  ... and {} more", covers.missing.len() - 10);
        }
    }
    if let Some(added) = report.hooks_added {
        println!("Overlay entries: {} added", added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.library.calibre_path = Some(PathBuf::from("/books/Calibre"));
        config.sync.copy_covers = true;

        let args = SyncArgs {
            output: Some(PathBuf::from("/tmp/out")),
            generate_hooks: true,
            no_report: true,
            ..Default::default()
        };
        let options = args.to_options(&config).unwrap();

        assert_eq!(options.source, Source::Calibre(PathBuf::from("/books/Calibre")));
        assert_eq!(options.output_dir, PathBuf::from("/tmp/out"));
        assert!(options.copy_covers);
        assert!(options.generate_hooks);
        assert!(!options.write_report);
    }

    #[test]
    fn test_json_export_wins_over_configured_library() {
        let mut config = Config::default();
        config.library.calibre_path = Some(PathBuf::from("/books/Calibre"));
        let args = SyncArgs {
            json_export: Some(PathBuf::from("export.json")),
            ..Default::default()
        };

        let options = args.to_options(&config).unwrap();
        assert_eq!(options.source, Source::JsonExport(PathBuf::from("export.json")));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        assert!(SyncArgs::default().to_options(&Config::default()).is_err());
    }
}
