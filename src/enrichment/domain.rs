//! Internal domain models for online metadata lookups.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use crate::model::SourceBook;

use super::genres::translate_genre;

/// Synopses longer than this are considered complete.
pub const MIN_SYNOPSIS_CHARS: usize = 100;

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    OpenLibrary,
    GoogleBooks,
}

impl std::fmt::Display for LookupSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenLibrary => f.write_str("Open Library"),
            Self::GoogleBooks => f.write_str("Google Books"),
        }
    }
}

/// Best-effort metadata for one book from one provider
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub source: LookupSource,
    /// Title as the provider spells it
    pub title: Option<String>,
    pub pages: Option<u32>,
    /// Untranslated subjects/categories, provider order
    pub genres: Vec<String>,
    pub description: Option<String>,
    /// Four-digit publication year
    pub year: Option<String>,
    /// Open Library work key (`/works/OL...W`), used to fetch a description
    pub work_key: Option<String>,
}

impl LookupResult {
    pub fn empty(source: LookupSource) -> Self {
        Self {
            source,
            title: None,
            pages: None,
            genres: Vec::new(),
            description: None,
            year: None,
            work_key: None,
        }
    }
}

/// Whether a provider's title and the wanted (lowercased) title contain
/// one another. Providers append subtitles and drop articles freely.
pub fn titles_overlap(wanted: &str, candidate: Option<&str>) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() || wanted.is_empty() {
        return false;
    }
    candidate.contains(wanted) || wanted.contains(&candidate)
}

/// Combined findings for one book across all providers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookEnrichment {
    pub pages: Option<u32>,
    /// Translated genre labels, deduplicated, first-seen order
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub year: Option<String>,
}

impl BookEnrichment {
    /// Whether any provider contributed anything.
    pub fn is_empty(&self) -> bool {
        self.pages.is_none()
            && self.genres.is_empty()
            && self.description.is_none()
            && self.year.is_none()
    }

    /// Translate and add raw provider genres, skipping ones already present.
    pub fn add_genres<S: AsRef<str>>(&mut self, raw: &[S]) {
        for genre in raw {
            let translated = translate_genre(genre.as_ref());
            if !translated.is_empty() && !self.genres.contains(&translated) {
                self.genres.push(translated);
            }
        }
    }

    /// Genres not already among `tags` (case-insensitive).
    pub fn new_tags(&self, tags: &[String]) -> Vec<String> {
        let known: Vec<String> = tags.iter().map(|t| t.trim().to_lowercase()).collect();
        self.genres
            .iter()
            .filter(|g| !known.contains(&g.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Fill what `book` lacks. Never overwrites known values.
    ///
    /// Returns true if the book changed.
    pub fn fill_gaps(&self, book: &mut SourceBook) -> bool {
        let mut changed = false;

        if book.pages == 0
            && let Some(pages) = self.pages.filter(|p| *p > 0)
        {
            book.pages = pages;
            changed = true;
        }

        let new_tags = self.new_tags(&book.tags);
        if !new_tags.is_empty() {
            book.tags.extend(new_tags);
            changed = true;
        }

        if book.synopsis.chars().count() <= MIN_SYNOPSIS_CHARS
            && let Some(description) = &self.description
        {
            book.synopsis = description.clone();
            changed = true;
        }

        if book.year.is_empty()
            && let Some(year) = &self.year
        {
            book.year = year.clone();
            changed = true;
        }

        changed
    }
}

/// Errors that can occur during lookups
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl EnrichmentError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Network(_))
    }
}
