//! Book enrichment module - fills metadata gaps from online catalogues.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`openlibrary/dto.rs`, `googlebooks/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Genres** (`genres.rs`) - Translation of provider subjects to Spanish tags
//! - **Service** - High-level orchestration of the lookup flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap providers without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentService, LookupRequest};
//!
//! let service = EnrichmentService::new(&config.lookup)?;
//! let found = service.enrich(&LookupRequest::for_book(&book)).await;
//! found.fill_gaps(&mut book);
//! ```

pub mod domain;
pub mod genres;
pub mod googlebooks;
pub mod openlibrary;
pub mod service;
pub mod traits;

pub use domain::{BookEnrichment, EnrichmentError, LookupResult, LookupSource};
pub use genres::translate_genre;
pub use service::{EnrichmentConfig, EnrichmentService, LookupRequest};
pub use traits::MetadataLookup;

/// User agent sent to every provider
pub const USER_AGENT: &str = concat!(
    "ShelfMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/shelf-minder)"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("ShelfMinder/"));
    }
}
