//! Cover copying for the front end.
//!
//! Each book's cover is copied to `<covers dir>/<id>.jpg`. Copies run in
//! parallel; a destination that already holds the same bytes is left
//! alone so unchanged covers keep their timestamps.

mod hash;

pub use hash::{content_hash, same_content};

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, ResultExt};
use crate::model::Book;

/// Extension every copied cover gets.
pub const COVER_EXTENSION: &str = "jpg";

/// What happened to each book's cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverReport {
    pub copied: usize,
    pub unchanged: usize,
    /// Titles of books without a readable cover
    pub missing: Vec<String>,
}

enum CoverOutcome {
    Copied,
    Unchanged,
    Missing(String),
}

/// Destination of a book's cover.
pub fn cover_destination(dest_dir: &Path, book_id: i64) -> PathBuf {
    dest_dir.join(format!("{}.{}", book_id, COVER_EXTENSION))
}

/// Copy every book's cover into `dest_dir`.
///
/// Books without a cover, or whose cover can't be copied, are listed in
/// [`CoverReport::missing`]; only failing to create `dest_dir` is an error.
pub fn copy_covers(books: &[Book], dest_dir: &Path) -> Result<CoverReport> {
    std::fs::create_dir_all(dest_dir)
        .with_context(format!("Failed to create {}", dest_dir.display()))?;

    let outcomes: Vec<CoverOutcome> = books
        .par_iter()
        .map(|book| copy_cover(book, dest_dir))
        .collect();

    let mut report = CoverReport::default();
    for outcome in outcomes {
        match outcome {
            CoverOutcome::Copied => report.copied += 1,
            CoverOutcome::Unchanged => report.unchanged += 1,
            CoverOutcome::Missing(title) => report.missing.push(title),
        }
    }

    tracing::info!(
        "Covers: {} copied, {} unchanged, {} missing",
        report.copied,
        report.unchanged,
        report.missing.len()
    );
    Ok(report)
}

fn copy_cover(book: &Book, dest_dir: &Path) -> CoverOutcome {
    let Some(source) = book.cover_path.as_deref().map(Path::new) else {
        return CoverOutcome::Missing(book.title.clone());
    };
    if !source.is_file() {
        tracing::debug!("Cover for \"{}\" not found at {}", book.title, source.display());
        return CoverOutcome::Missing(book.title.clone());
    }

    let dest = cover_destination(dest_dir, book.id);
    if same_content(source, &dest) {
        return CoverOutcome::Unchanged;
    }

    match std::fs::copy(source, &dest) {
        Ok(_) => CoverOutcome::Copied,
        Err(e) => {
            tracing::warn!("Failed to copy cover for \"{}\": {}", book.title, e);
            CoverOutcome::Missing(book.title.clone())
        }
    }
}
