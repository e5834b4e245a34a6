//! Enrichment service - orchestrates book lookups across providers
//!
//! This is the high-level API for filling metadata gaps:
//! 1. Search Open Library (pages, subjects, work key)
//! 2. Search Google Books (pages, categories, description)
//! 3. Fall back to the Open Library work record for a description
//! 4. Translate and merge genres from both
//!
//! Provider failures never fail a book: they are logged and the book gets
//! whatever the other provider found.

use std::time::Duration;

use futures::StreamExt;

use crate::config::LookupConfig;
use crate::enrichment::{
    domain::{BookEnrichment, EnrichmentError, LookupResult, MIN_SYNOPSIS_CHARS},
    googlebooks::GoogleBooksClient,
    openlibrary::OpenLibraryClient,
    traits::MetadataLookup,
};
use crate::model::SourceBook;

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Pause between consecutive requests for one book, and the base of the retry backoff
    pub request_delay: Duration,
    /// Retries for rate-limited or network failures
    pub max_retries: u32,
    /// Books looked up at the same time
    pub max_concurrent: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self::from(&LookupConfig::default())
    }
}

impl From<&LookupConfig> for EnrichmentConfig {
    fn from(config: &LookupConfig) -> Self {
        Self {
            request_delay: config.request_delay(),
            max_retries: config.max_retries,
            max_concurrent: config.max_concurrent.max(1),
        }
    }
}

/// One book to look up
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub title: String,
    pub authors: Vec<String>,
    /// Only fetch a description when the book lacks a usable one
    pub want_description: bool,
}

impl LookupRequest {
    pub fn for_book(book: &SourceBook) -> Self {
        Self {
            title: book.title.clone().unwrap_or_default(),
            authors: book.authors.clone(),
            want_description: book.synopsis.chars().count() <= MIN_SYNOPSIS_CHARS,
        }
    }
}

/// Service for enriching book metadata from external sources
pub struct EnrichmentService {
    config: EnrichmentConfig,
    open_library: Option<Box<dyn MetadataLookup>>,
    google_books: Option<Box<dyn MetadataLookup>>,
}

impl EnrichmentService {
    /// Create a service with the providers enabled in `config`
    pub fn new(config: &LookupConfig) -> Result<Self, EnrichmentError> {
        let open_library: Option<Box<dyn MetadataLookup>> = if config.open_library {
            Some(Box::new(OpenLibraryClient::new(config.timeout())?))
        } else {
            None
        };
        let google_books: Option<Box<dyn MetadataLookup>> = if config.google_books {
            Some(Box::new(GoogleBooksClient::new(
                config.language.clone(),
                config.timeout(),
            )?))
        } else {
            None
        };

        Ok(Self::with_providers(config.into(), open_library, google_books))
    }

    /// Create a service with explicit providers
    pub fn with_providers(
        config: EnrichmentConfig,
        open_library: Option<Box<dyn MetadataLookup>>,
        google_books: Option<Box<dyn MetadataLookup>>,
    ) -> Self {
        Self {
            config,
            open_library,
            google_books,
        }
    }

    /// Whether any provider is enabled
    pub fn has_providers(&self) -> bool {
        self.open_library.is_some() || self.google_books.is_some()
    }

    /// Look up one book across all providers
    pub async fn enrich(&self, request: &LookupRequest) -> BookEnrichment {
        let open_library = match &self.open_library {
            Some(provider) => self.lookup_with_retry(provider.as_ref(), request).await,
            None => None,
        };

        if open_library.is_some() && self.google_books.is_some() {
            tokio::time::sleep(self.config.request_delay).await;
        }

        let google_books = match &self.google_books {
            Some(provider) => self.lookup_with_retry(provider.as_ref(), request).await,
            None => None,
        };

        let mut enrichment = BookEnrichment {
            pages: open_library
                .as_ref()
                .and_then(|r| r.pages)
                .or_else(|| google_books.as_ref().and_then(|r| r.pages)),
            year: open_library
                .as_ref()
                .and_then(|r| r.year.clone())
                .or_else(|| google_books.as_ref().and_then(|r| r.year.clone())),
            ..Default::default()
        };

        for result in [&open_library, &google_books].into_iter().flatten() {
            enrichment.add_genres(&result.genres);
        }

        if request.want_description {
            enrichment.description = match google_books.and_then(|r| r.description) {
                Some(description) => Some(description),
                None => self.work_description(open_library.as_ref(), request).await,
            };
        }

        tracing::debug!(
            "\"{}\": pages={:?}, {} genre(s), description={}",
            request.title,
            enrichment.pages,
            enrichment.genres.len(),
            enrichment.description.is_some()
        );
        enrichment
    }

    /// Look up a batch of books with bounded concurrency
    ///
    /// Returns results in the same order as `requests`.
    pub async fn enrich_all(&self, requests: &[LookupRequest]) -> Vec<BookEnrichment> {
        let total = requests.len();
        let mut results = Vec::with_capacity(total);

        let mut stream = futures::stream::iter(requests)
            .map(|request| self.enrich(request))
            .buffered(self.config.max_concurrent.max(1));

        while let Some(enrichment) = stream.next().await {
            results.push(enrichment);
            if results.len() % 10 == 0 {
                tracing::info!("Looked up {}/{} books", results.len(), total);
            }
        }

        results
    }

    async fn lookup_with_retry(
        &self,
        provider: &dyn MetadataLookup,
        request: &LookupRequest,
    ) -> Option<LookupResult> {
        let mut attempt = 0;
        loop {
            match provider.lookup(&request.title, &request.authors).await {
                Ok(result) => return result,
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = retry_backoff(self.config.request_delay, attempt);
                    tracing::warn!(
                        "{} lookup for \"{}\" failed ({}), retry {}/{} in {:?}",
                        provider.source(),
                        request.title,
                        e,
                        attempt,
                        self.config.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(EnrichmentError::NoMatches) => return None,
                Err(e) => {
                    tracing::warn!(
                        "{} lookup for \"{}\" failed: {}",
                        provider.source(),
                        request.title,
                        e
                    );
                    return None;
                }
            }
        }
    }

    async fn work_description(
        &self,
        open_library: Option<&LookupResult>,
        request: &LookupRequest,
    ) -> Option<String> {
        let (provider, result) = self.open_library.as_ref().zip(open_library)?;
        result.work_key.as_ref()?;

        tokio::time::sleep(self.config.request_delay).await;
        match provider.description(result).await {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!("Description lookup for \"{}\" failed: {}", request.title, e);
                None
            }
        }
    }
}

/// Delay before retry number `attempt`, doubling each time and saturating.
fn retry_backoff(delay: Duration, attempt: u32) -> Duration {
    delay.saturating_mul(2u32.saturating_pow(attempt))
}
