//! Open Library API Data Transfer Objects
//!
//! These types match what the Open Library API returns for the fields we
//! request. DO NOT use these types outside the openlibrary module - convert
//! to domain types.
//!
//! API Reference: https://openlibrary.org/dev/docs/api/search

use serde::{Deserialize, Serialize};

/// `/search.json` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// One work in a search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchDoc {
    /// Work key, e.g. `/works/OL45804W`
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    /// Median page count across editions
    pub number_of_pages_median: Option<u32>,
    #[serde(default)]
    pub subject: Vec<String>,
    pub first_publish_year: Option<i32>,
}

/// `/works/<id>.json` response (only the fields we read)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkResponse {
    pub title: Option<String>,
    pub description: Option<Description>,
}

/// Work descriptions are either plain text or a typed text object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed {
        #[serde(rename = "type")]
        kind: Option<String>,
        value: String,
    },
}

impl Description {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Typed { value, .. } => value,
        }
    }
}
