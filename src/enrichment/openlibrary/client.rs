//! Open Library HTTP client
//!
//! See: https://openlibrary.org/developers/api
//!
//! Open Library asks clients to identify themselves with a User-Agent.

use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::USER_AGENT;
use crate::enrichment::domain::{EnrichmentError, LookupResult};

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str =
    "key,title,author_name,number_of_pages_median,subject,first_publish_year";

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    /// Create a new client
    pub fn new(timeout: Duration) -> Result<Self, EnrichmentError> {
        Self::with_base_url("https://openlibrary.org", timeout)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
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
        })
    }

    /// Search by title and first author
    pub async fn search(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<LookupResult>, EnrichmentError> {
        let url = self.search_url(title, authors);
        let response: dto::SearchResponse = self.get_json(&url).await?;
        tracing::debug!("Open Library: {} result(s) for \"{}\"", response.num_found, title);
        Ok(adapter::to_lookup_result(title, response))
    }

    /// Fetch the description of a work (`/works/OL...W`)
    pub async fn work_description(&self, work_key: &str) -> Result<Option<String>, EnrichmentError> {
        if !work_key.starts_with("/works/") {
            return Err(EnrichmentError::InvalidResponse(format!(
                "not a work key: {}",
                work_key
            )));
        }
        let url = format!("{}{}.json", self.base_url, work_key);
        match self.get_json::<dto::WorkResponse>(&url).await {
            Ok(work) => Ok(adapter::work_description(work)),
            Err(EnrichmentError::NoMatches) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn search_url(&self, title: &str, authors: &[String]) -> String {
        let author = authors.first().map(String::as_str).unwrap_or("");
        let query = format!("{} {}", title, author);
        format!(
            "{}/search.json?q={}&limit=3&fields={}",
            self.base_url,
            urlencoding::encode(query.trim()),
            SEARCH_FIELDS
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NoMatches);
        }

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
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenLibraryClient {
        OpenLibraryClient::with_base_url("http://localhost:8080", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = OpenLibraryClient::new(Duration::from_secs(15)).unwrap();
        assert_eq!(client.base_url, "https://openlibrary.org");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client().search_url("El túnel", &["Ernesto Sabato".to_string()]);
        assert!(url.starts_with("http://localhost:8080/search.json?q=El%20t%C3%BAnel%20Ernesto%20Sabato"));
        assert!(url.contains("&limit=3&fields=key,title,"));
    }

    #[test]
    fn test_search_url_without_author() {
        let url = client().search_url("Ficciones", &[]);
        assert!(url.contains("q=Ficciones&"));
    }

    #[tokio::test]
    async fn test_work_description_rejects_non_work_keys() {
        let result = client().work_description("/books/OL1M").await;
        assert!(matches!(result, Err(EnrichmentError::InvalidResponse(_))));
    }
}
