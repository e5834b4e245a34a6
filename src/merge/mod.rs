//! Fuzzy deduplication and library merging.
//!
//! Freshly normalized records are reconciled against a snapshot of the
//! persisted library:
//! - A record whose title is near-identical to an existing one, sharing at
//!   least one author, **updates** that record in place and keeps its id,
//!   its `previously_read` flag and any editorial overlay fields.
//! - Anything else is **added** with the next free id.
//!
//! Matching is first-match-wins in library order. There is no global
//! assignment, so a false positive or negative is accepted silently and
//! only surfaces in the logged counts.

use std::collections::{HashMap, HashSet};

use crate::model::{Book, Overlay};

/// Titles must be more similar than this to count as the same book.
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

/// Result of merging a batch into a library.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// The merged library: existing records in their original order
    /// (updated in place), then additions in batch order
    pub books: Vec<Book>,
    /// Titles of records added
    pub added: Vec<String>,
    /// Titles of records that replaced an existing one
    pub updated: Vec<String>,
    /// Incoming records that matched a book already updated earlier in the batch
    pub repeated_matches: usize,
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Similarity of two titles in `[0, 1]`.
///
/// Case- and whitespace-normalized equality scores 1.0; otherwise the
/// Jaccard index of the two word sets.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a == b {
        return 1.0;
    }

    let words_a: HashSet<&str> = a.split(' ').filter(|w| !w.is_empty()).collect();
    let words_b: HashSet<&str> = b.split(' ').filter(|w| !w.is_empty()).collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

fn shares_author(candidate: &Book, existing: &Book) -> bool {
    let known: HashSet<String> = existing
        .authors
        .iter()
        .map(|a| a.trim().to_lowercase())
        .collect();
    candidate
        .authors
        .iter()
        .any(|a| known.contains(&a.trim().to_lowercase()))
}

/// Index of the first library record `candidate` duplicates, if any.
pub fn find_duplicate(library: &[Book], candidate: &Book) -> Option<usize> {
    library.iter().position(|existing| {
        title_similarity(&candidate.title, &existing.title) > DUPLICATE_THRESHOLD
            && shares_author(candidate, existing)
    })
}

/// What an incoming record inherits from the record it replaces.
struct Inherited {
    index: usize,
    id: i64,
    previously_read: bool,
    overlay: Overlay,
}

/// Merge a batch of normalized records into a library snapshot.
///
/// Every incoming record is matched against the library as it was before
/// the batch, so two incoming records never match each other. Ids for
/// additions start after the highest id in the snapshot.
pub fn merge_library(library: Vec<Book>, incoming: Vec<Book>) -> MergeOutcome {
    let inherited: Vec<Option<Inherited>> = incoming
        .iter()
        .map(|candidate| {
            find_duplicate(&library, candidate).map(|index| {
                let existing = &library[index];
                Inherited {
                    index,
                    id: existing.id,
                    previously_read: existing.previously_read,
                    overlay: existing.overlay(),
                }
            })
        })
        .collect();

    let mut next_id = library.iter().map(|b| b.id).max().unwrap_or(0);
    let mut outcome = MergeOutcome {
        books: library,
        ..Default::default()
    };
    let mut touched: HashMap<usize, usize> = HashMap::new();

    for (mut book, inherited) in incoming.into_iter().zip(inherited) {
        match inherited {
            Some(found) => {
                book.id = found.id;
                book.previously_read = found.previously_read;
                book.adopt_overlay(&found.overlay);
                tracing::debug!("Updating #{} \"{}\"", book.id, book.title);

                let hits = touched.entry(found.index).or_default();
                *hits += 1;
                if *hits > 1 {
                    outcome.repeated_matches += 1;
                }

                outcome.updated.push(book.title.clone());
                outcome.books[found.index] = book;
            }
            None => {
                next_id += 1;
                book.id = next_id;
                tracing::debug!("Adding #{} \"{}\"", book.id, book.title);
                outcome.added.push(book.title.clone());
                outcome.books.push(book);
            }
        }
    }

    if outcome.repeated_matches > 0 {
        tracing::warn!(
            "{} incoming record(s) matched a book already updated in this batch",
            outcome.repeated_matches
        );
    }
    tracing::info!(
        "Merged batch: {} added, {} updated, {} total",
        outcome.added.len(),
        outcome.updated.len(),
        outcome.books.len()
    );

    outcome
}
