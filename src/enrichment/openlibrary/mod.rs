//! Open Library API integration
//!
//! Provides page counts, subjects and work descriptions. A search returns
//! work-level documents; descriptions live on the work record and need a
//! second request.
//!
//! API docs: https://openlibrary.org/developers/api

pub mod dto;
mod adapter;
mod client;

pub use adapter::{to_lookup_result, work_description};
pub use client::OpenLibraryClient;
