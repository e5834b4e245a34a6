//! Producers of source records.
//!
//! A sync reads its input from one of:
//! - a JSON export file ([`json_export`])
//! - a Calibre library, through `calibredb` ([`calibredb`]) when it is
//!   installed, otherwise straight from `metadata.db` ([`crate::db`])

pub mod calibredb;
pub mod json_export;

use std::path::{Path, PathBuf};

use crate::db;
use crate::error::{Error, Result, ResultExt};
use crate::model::SourceBook;
use crate::quality::MetadataGaps;

/// Where source records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A JSON export file
    JsonExport(PathBuf),
    /// A Calibre library directory
    Calibre(PathBuf),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JsonExport(path) => write!(f, "JSON export {}", path.display()),
            Self::Calibre(path) => write!(f, "Calibre library {}", path.display()),
        }
    }
}

/// Load every record from a source.
pub async fn load(source: &Source) -> Result<Vec<SourceBook>> {
    tracing::info!("Reading {}", source);
    match source {
        Source::JsonExport(path) => json_export::read(path),
        Source::Calibre(library) => load_calibre(library).await,
    }
}

async fn load_calibre(library: &Path) -> Result<Vec<SourceBook>> {
    if !library.is_dir() {
        return Err(Error::not_found(library));
    }

    if let Some(books) = calibredb::list(library).await? {
        return Ok(books);
    }

    let db_path = db::metadata_db_path(library);
    if !db_path.exists() {
        return Err(Error::not_found(db_path));
    }

    tracing::info!("Falling back to {}", db_path.display());
    let pool = db::open(&db_path)
        .await
        .with_context(format!("Failed to open {}", db_path.display()))?;
    let books = db::read_books(&pool, Some(library)).await?;
    pool.close().await;

    Ok(books)
}

/// Keep only the records a lookup could improve, up to `limit` of them.
///
/// With `only_missing` unset every record is kept.
pub fn select_for_lookup(
    books: Vec<SourceBook>,
    only_missing: bool,
    limit: Option<usize>,
) -> Vec<SourceBook> {
    books
        .into_iter()
        .filter(|book| !only_missing || MetadataGaps::assess(book).needs_lookup())
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
