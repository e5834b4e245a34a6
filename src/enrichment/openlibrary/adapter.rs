//! Adapter layer: Convert Open Library DTOs to domain models
//!
//! This is the ONLY place where Open Library DTO types are converted to
//! domain types.

use super::dto;
use crate::enrichment::domain::{LookupResult, LookupSource, titles_overlap};
use crate::enrichment::genres::is_ignored;

/// Subjects considered per document
const MAX_SUBJECTS_SCANNED: usize = 15;

/// Subjects kept per document
const MAX_GENRES: usize = 8;

/// Longer subjects are catalogue headings, not genres
const MAX_GENRE_CHARS: usize = 50;

/// Shorter work descriptions are placeholders
const MIN_DESCRIPTION_CHARS: usize = 50;

/// Convert a search response into a lookup result for `query_title`.
///
/// Picks the first document whose title contains, or is contained in, the
/// query title; otherwise the first document.
pub fn to_lookup_result(query_title: &str, response: dto::SearchResponse) -> Option<LookupResult> {
    let wanted = query_title.trim().to_lowercase();
    let mut docs = response.docs;

    let best = docs
        .iter()
        .position(|doc| titles_overlap(&wanted, doc.title.as_deref()))
        .unwrap_or(0);
    if best >= docs.len() {
        return None;
    }
    let doc = docs.swap_remove(best);

    let genres = doc
        .subject
        .iter()
        .take(MAX_SUBJECTS_SCANNED)
        .filter(|s| !is_ignored(s) && s.chars().count() < MAX_GENRE_CHARS)
        .take(MAX_GENRES)
        .cloned()
        .collect();

    Some(LookupResult {
        source: LookupSource::OpenLibrary,
        title: doc.title,
        pages: doc.number_of_pages_median.filter(|p| *p > 0),
        genres,
        description: None,
        year: doc.first_publish_year.map(|y| y.to_string()),
        work_key: doc.key,
    })
}

/// Extract a usable description from a work record.
pub fn work_description(work: dto::WorkResponse) -> Option<String> {
    work.description
        .map(|d| d.text().trim().to_string())
        .filter(|d| d.chars().count() > MIN_DESCRIPTION_CHARS)
}
