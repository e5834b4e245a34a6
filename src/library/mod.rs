//! The persisted library (`biblioteca_app.json`).
//!
//! An ordered JSON list of [`Book`] records, written UTF-8 with non-ASCII
//! characters kept literal. Order is the merge order: updated books stay
//! where they were, new books are appended.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result, ResultExt};
use crate::inference::round_tenth;
use crate::model::Book;

/// Load the library. A missing file is an empty library.
pub fn load(path: &Path) -> Result<Vec<Book>> {
    if !path.exists() {
        tracing::info!("No library at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(path)
        .with_context(format!("Failed to read {}", path.display()))?;
    let books: Vec<Book> =
        serde_json::from_str(&text).with_context(format!("Failed to parse {}", path.display()))?;

    let duplicates = duplicate_ids(&books);
    if !duplicates.is_empty() {
        tracing::warn!(
            "Library {} repeats ids {:?}; merges will match the first",
            path.display(),
            duplicates
        );
    }

    tracing::debug!("Loaded {} books from {}", books.len(), path.display());
    Ok(books)
}

/// Write the library.
pub fn save(path: &Path, books: &[Book]) -> Result<()> {
    write_json_atomic(path, &books)?;
    tracing::info!("Saved {} books to {}", books.len(), path.display());
    Ok(())
}

/// Pretty-print `value` to `path` through a temporary file and a rename.
///
/// Creates the parent directory when needed.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(format!("Failed to create {}", dir.display()))?;
    }

    let mut contents = serde_json::to_string_pretty(value)?;
    contents.push('\n');

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents)
        .with_context(format!("Failed to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        Error::Io(e).context(format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ))
    })
}

fn duplicate_ids(books: &[Book]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut repeated: Vec<i64> = books
        .iter()
        .map(|b| b.id)
        .filter(|id| !seen.insert(*id))
        .collect();
    repeated.sort_unstable();
    repeated.dedup();
    repeated
}

// ============================================================================
// Statistics
// ============================================================================

/// Summary of a library for the `stats` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LibraryStats {
    pub books: usize,
    pub previously_read: usize,
    pub total_pages: u64,
    pub total_hours: f64,
    pub by_category: BTreeMap<String, usize>,
    pub by_mood: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
    pub by_pacing: BTreeMap<String, usize>,
    pub by_award: BTreeMap<String, usize>,
    /// Books carrying any editorial overlay field
    pub with_overlay: usize,
}

impl LibraryStats {
    pub fn compute(books: &[Book]) -> Self {
        let mut stats = Self {
            books: books.len(),
            ..Default::default()
        };

        for book in books {
            if book.previously_read {
                stats.previously_read += 1;
            }
            if !book.overlay().is_empty() {
                stats.with_overlay += 1;
            }
            stats.total_pages += u64::from(book.page_count);
            stats.total_hours += book.estimated_hours;

            for category in &book.categories {
                *stats.by_category.entry(category.clone()).or_default() += 1;
            }
            for award in &book.awards {
                *stats.by_award.entry(award.clone()).or_default() += 1;
            }
            *stats.by_mood.entry(book.mood.to_string()).or_default() += 1;
            *stats.by_difficulty.entry(book.difficulty.to_string()).or_default() += 1;
            *stats.by_pacing.entry(book.pacing.to_string()).or_default() += 1;
        }

        stats.total_hours = round_tenth(stats.total_hours);
        stats
    }
}
