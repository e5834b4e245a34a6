//! Google Books HTTP client
//!
//! See: https://developers.google.com/books/docs/v1/using
//!
//! Anonymous access is enough for the volumes search at our request rate.

use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::USER_AGENT;
use crate::enrichment::domain::{EnrichmentError, LookupResult};

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
    /// Preferred result language, empty for none
    language: String,
}

impl GoogleBooksClient {
    /// Create a new client preferring results in `language`
    pub fn new(language: impl Into<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        Self::with_base_url("https://www.googleapis.com/books/v1", language, timeout)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            language: language.into(),
        })
    }

    /// Search by title and first author
    ///
    /// Tries the preferred language first, then any language.
    pub async fn search(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<LookupResult>, EnrichmentError> {
        let mut response = self
            .send_search_request(&self.search_url(title, authors, true))
            .await?;

        if response.items.is_empty() && !self.language.is_empty() {
            tracing::debug!(
                "Google Books: nothing in '{}' for \"{}\", retrying any language",
                self.language,
                title
            );
            response = self
                .send_search_request(&self.search_url(title, authors, false))
                .await?;
        }

        Ok(adapter::to_lookup_result(title, response))
    }

    /// Build the volumes query, e.g. `q=intitle:"Dune"+inauthor:"Frank Herbert"`
    pub(crate) fn search_url(&self, title: &str, authors: &[String], restrict_language: bool) -> String {
        // `+` separates query terms and must stay literal
        let mut query = format!("intitle:%22{}%22", urlencoding::encode(title.trim()));
        if let Some(author) = authors.first().map(|a| a.trim()).filter(|a| !a.is_empty()) {
            query.push_str(&format!("+inauthor:%22{}%22", urlencoding::encode(author)));
        }

        let mut url = format!("{}/volumes?q={}&maxResults=3", self.base_url, query);
        if restrict_language && !self.language.is_empty() {
            url.push_str(&format!("&langRestrict={}", urlencoding::encode(&self.language)));
        }
        url
    }

    async fn send_search_request(&self, url: &str) -> Result<dto::VolumesResponse, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if status.is_server_error() {
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ErrorResponse>().await {
                return Err(EnrichmentError::ApiError(error.error.message));
            }
            return Err(EnrichmentError::ApiError(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::VolumesResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
