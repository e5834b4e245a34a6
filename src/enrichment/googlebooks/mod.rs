//! Google Books API integration
//!
//! Best source for descriptions and categories. Searches prefer a
//! language and retry without the restriction when nothing comes back.
//!
//! API docs: https://developers.google.com/books/docs/v1/using

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_lookup_result;
pub use client::GoogleBooksClient;
