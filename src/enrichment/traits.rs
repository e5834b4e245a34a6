//! Trait definitions for external lookup clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use shelf_minder::enrichment::traits::MetadataLookup;
//!
//! async fn pages<T: MetadataLookup>(client: &T) -> Option<u32> {
//!     let result = client.lookup("Rayuela", &["Julio Cortázar".into()]).await.ok()??;
//!     result.pages
//! }
//! ```

use async_trait::async_trait;

use super::domain::{EnrichmentError, LookupResult, LookupSource};

/// A bibliographic web service that can be searched by title and author.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Which provider this is.
    fn source(&self) -> LookupSource;

    /// Search for a book. `Ok(None)` means the provider has nothing for it.
    async fn lookup(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<LookupResult>, EnrichmentError>;

    /// Fetch a long description for a previous result, if the provider
    /// needs a second request for it.
    async fn description(&self, _result: &LookupResult) -> Result<Option<String>, EnrichmentError> {
        Ok(None)
    }
}

#[async_trait]
impl MetadataLookup for super::openlibrary::OpenLibraryClient {
    fn source(&self) -> LookupSource {
        LookupSource::OpenLibrary
    }

    async fn lookup(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<LookupResult>, EnrichmentError> {
        self.search(title, authors).await
    }

    async fn description(&self, result: &LookupResult) -> Result<Option<String>, EnrichmentError> {
        match &result.work_key {
            Some(key) => self.work_description(key).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MetadataLookup for super::googlebooks::GoogleBooksClient {
    fn source(&self) -> LookupSource {
        LookupSource::GoogleBooks
    }

    async fn lookup(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<LookupResult>, EnrichmentError> {
        self.search(title, authors).await
    }
}
