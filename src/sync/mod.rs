//! The sync pipeline.
//!
//! One run reads every record from a source, optionally fills metadata
//! gaps online, normalizes the batch and merges it into the persisted
//! library against a single snapshot. Then, unless it is a dry run, it
//! writes the library and the collateral outputs (covers, overlay entries,
//! report).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Config, LibraryConfig};
use crate::cover::{self, CoverReport};
use crate::enrichment::{EnrichmentService, LookupRequest};
use crate::error::Result;
use crate::library;
use crate::merge::merge_library;
use crate::model::SourceBook;
use crate::normalize::normalize_all;
use crate::overlay;
use crate::quality::MetadataGaps;
use crate::source::{self, Source};

/// File name of the run report inside the output directory.
pub const REPORT_FILE: &str = "sync_report.json";

/// What a sync run reads, writes and does.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub source: Source,
    pub output_dir: PathBuf,
    /// Output file names
    pub files: LibraryConfig,
    /// Fill gaps through online lookups before normalizing
    pub lookup: bool,
    pub generate_hooks: bool,
    pub copy_covers: bool,
    pub write_report: bool,
    /// Compute everything, write nothing
    pub dry_run: bool,
}

impl SyncOptions {
    /// Options from config for `source`; CLI flags are applied on top.
    pub fn from_config(config: &Config, source: Source) -> Self {
        Self {
            source,
            output_dir: config.library.output_dir.clone(),
            files: config.library.clone(),
            lookup: false,
            generate_hooks: config.sync.generate_hooks,
            copy_covers: config.sync.copy_covers,
            write_report: config.sync.write_report,
            dry_run: false,
        }
    }

    pub fn library_path(&self) -> PathBuf {
        self.files.library_path(&self.output_dir)
    }
}

/// Outcome of a sync run, also written as `sync_report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source: String,
    pub dry_run: bool,
    /// Records read from the source
    pub read: usize,
    /// Records changed by online lookups
    pub enriched: usize,
    /// Books in the library after the merge
    pub total_books: usize,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// Records that matched a book another record in the batch already updated
    pub repeated_matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub covers: Option<CoverReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks_added: Option<usize>,
}

/// Run a sync.
///
/// `lookup` is only used when `options.lookup` is set.
pub async fn run(options: &SyncOptions, lookup: Option<&EnrichmentService>) -> Result<SyncReport> {
    let started_at = Utc::now();

    let mut sources = source::load(&options.source).await?;
    let read = sources.len();
    tracing::info!("Read {} records from {}", read, options.source);

    let enriched = match lookup.filter(|_| options.lookup) {
        Some(service) => fill_gaps(service, &mut sources).await,
        None => 0,
    };

    let library_path = options.library_path();
    let existing = library::load(&library_path)?;
    let first_id = existing.iter().map(|b| b.id).max().unwrap_or(0) + 1;

    let normalized = normalize_all(&sources, first_id);
    let outcome = merge_library(existing, normalized);

    let mut report = SyncReport {
        started_at,
        finished_at: started_at,
        source: options.source.to_string(),
        dry_run: options.dry_run,
        read,
        enriched,
        total_books: outcome.books.len(),
        added: outcome.added,
        updated: outcome.updated,
        repeated_matches: outcome.repeated_matches,
        covers: None,
        hooks_added: None,
    };

    if options.dry_run {
        tracing::info!(
            "Dry run: would add {} and update {} books",
            report.added.len(),
            report.updated.len()
        );
        report.finished_at = Utc::now();
        return Ok(report);
    }

    library::save(&library_path, &outcome.books)?;

    if options.copy_covers {
        let covers_dir = options.files.covers_path(&options.output_dir);
        report.covers = Some(cover::copy_covers(&outcome.books, &covers_dir)?);
    }

    if options.generate_hooks {
        let hooks_path = options.files.hooks_path(&options.output_dir);
        report.hooks_added = Some(overlay::generate(&hooks_path, &outcome.books)?);
    }

    report.finished_at = Utc::now();
    if options.write_report {
        library::write_json_atomic(&options.output_dir.join(REPORT_FILE), &report)?;
    }

    Ok(report)
}

/// Look up the records that lack tags or a synopsis and fill what was found.
///
/// Returns how many records changed.
async fn fill_gaps(service: &EnrichmentService, sources: &mut [SourceBook]) -> usize {
    if !service.has_providers() {
        tracing::warn!("Lookups requested but every provider is disabled");
        return 0;
    }

    let wanted: Vec<usize> = sources
        .iter()
        .enumerate()
        .filter_map(|(i, book)| {
            let gaps = MetadataGaps::assess(book);
            tracing::debug!(
                "\"{}\": {}",
                book.title.as_deref().unwrap_or_default(),
                gaps.descriptions().join(", ")
            );
            gaps.needs_lookup().then_some(i)
        })
        .collect();

    tracing::info!("Looking up {} of {} records", wanted.len(), sources.len());
    let requests: Vec<LookupRequest> = wanted
        .iter()
        .map(|&i| LookupRequest::for_book(&sources[i]))
        .collect();
    let found = service.enrich_all(&requests).await;

    let mut changed = 0;
    for (i, enrichment) in wanted.into_iter().zip(found) {
        if enrichment.fill_gaps(&mut sources[i]) {
            changed += 1;
        }
    }

    tracing::info!("Lookups improved {} records", changed);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::traits::mocks::MockLookup;
    use crate::enrichment::{EnrichmentConfig, LookupResult, LookupSource};
    use std::path::Path;
    use std::time::Duration;

    fn write_export(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("export.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn options(dir: &Path, export: PathBuf) -> SyncOptions {
        SyncOptions {
            output_dir: dir.join("data"),
            ..SyncOptions::from_config(&Config::default(), Source::JsonExport(export))
        }
    }

    const EXPORT: &str = r#"[
        {"title": "1984", "authors": ["George Orwell"], "tags": ["dystopia", "science fiction"], "pages": 328},
        {"title": "En busca del tiempo perdido", "authors": ["Marcel Proust"], "pages": 700}
    ]"#;

    #[tokio::test]
    async fn test_first_sync_adds_everything() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), EXPORT);
        let opts = options(dir.path(), export);

        let report = run(&opts, None).await.unwrap();

        assert_eq!(report.read, 2);
        assert_eq!(report.added.len(), 2);
        assert!(report.updated.is_empty());

        let books = library::load(&opts.library_path()).unwrap();
        assert_eq!(books.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(opts.output_dir.join(REPORT_FILE).exists());
    }

    #[tokio::test]
    async fn test_resync_keeps_ids_and_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), EXPORT);
        let opts = options(dir.path(), export);
        run(&opts, None).await.unwrap();

        // An editor marks the first book
        let mut books = library::load(&opts.library_path()).unwrap();
        books[0].previously_read = true;
        books[0].hook = Some("Un clásico incómodo.".to_string());
        library::save(&opts.library_path(), &books).unwrap();

        let report = run(&opts, None).await.unwrap();
        assert!(report.added.is_empty());
        assert_eq!(report.updated.len(), 2);

        let after = library::load(&opts.library_path()).unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].id, 1);
        assert!(after[0].previously_read);
        assert_eq!(after[0].hook.as_deref(), Some("Un clásico incómodo."));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), EXPORT);
        let opts = SyncOptions {
            dry_run: true,
            ..options(dir.path(), export)
        };

        let report = run(&opts, None).await.unwrap();
        assert_eq!(report.added.len(), 2);
        assert!(!opts.output_dir.exists());
    }

    #[tokio::test]
    async fn test_collateral_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("cover.jpg");
        std::fs::write(&cover, b"jpeg").unwrap();
        let export = write_export(
            dir.path(),
            &format!(
                r#"[{{"title": "Niebla", "authors": ["Unamuno"], "cover_path": {:?}}}, {{"title": "Sin tapa"}}]"#,
                cover.to_string_lossy()
            ),
        );
        let opts = SyncOptions {
            copy_covers: true,
            generate_hooks: true,
            ..options(dir.path(), export)
        };

        let report = run(&opts, None).await.unwrap();

        let covers = report.covers.unwrap();
        assert_eq!(covers.copied, 1);
        assert_eq!(covers.missing, vec!["Sin tapa".to_string()]);
        assert!(opts.output_dir.join("portadas/1.jpg").exists());
        assert_eq!(report.hooks_added, Some(2));
    }

    #[tokio::test]
    async fn test_lookup_fills_gaps_before_normalizing() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_export(dir.path(), r#"[{"title": "Dune", "authors": ["Frank Herbert"]}]"#);
        let opts = SyncOptions {
            lookup: true,
            ..options(dir.path(), export)
        };

        let found = LookupResult {
            pages: Some(896),
            genres: vec!["Science Fiction".to_string()],
            ..LookupResult::empty(LookupSource::OpenLibrary)
        };
        let service = EnrichmentService::with_providers(
            EnrichmentConfig {
                request_delay: Duration::ZERO,
                max_retries: 0,
                max_concurrent: 1,
            },
            Some(Box::new(MockLookup::with_result(found))),
            None,
        );

        let report = run(&opts, Some(&service)).await.unwrap();
        assert_eq!(report.enriched, 1);

        let books = library::load(&opts.library_path()).unwrap();
        assert_eq!(books[0].page_count, 896);
    }
}
