//! Test utilities and fixtures for shelf-minder tests.
//!
//! Provides record factories and a throwaway Calibre database so tests
//! don't each repeat the schema.
//!
//! # Example
//!
//! ```ignore
//! use shelf_minder::test_utils::{temp_calibre_db, insert_calibre_book};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, dir) = temp_calibre_db().await;
//!     insert_calibre_book(&pool, 1, "Rayuela", &["Julio Cortázar"], &[], None).await;
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tempfile::TempDir;

use crate::model::{Book, SourceBook};

/// The subset of Calibre's schema the sync reads and writes.
const CALIBRE_SCHEMA: &[&str] = &[
    "CREATE TABLE books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL DEFAULT 'Unknown' COLLATE NOCASE,
        sort TEXT COLLATE NOCASE,
        timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        pubdate TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        series_index REAL NOT NULL DEFAULT 1.0,
        author_sort TEXT COLLATE NOCASE,
        path TEXT NOT NULL DEFAULT '',
        has_cover BOOL DEFAULT 0
    )",
    "CREATE TABLE authors (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL COLLATE NOCASE,
        sort TEXT COLLATE NOCASE,
        UNIQUE(name)
    )",
    "CREATE TABLE books_authors_link (
        id INTEGER PRIMARY KEY,
        book INTEGER NOT NULL,
        author INTEGER NOT NULL,
        UNIQUE(book, author)
    )",
    "CREATE TABLE tags (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL COLLATE NOCASE,
        UNIQUE (name)
    )",
    "CREATE TABLE books_tags_link (
        id INTEGER PRIMARY KEY,
        book INTEGER NOT NULL,
        tag INTEGER NOT NULL,
        UNIQUE(book, tag)
    )",
    "CREATE TABLE series (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL COLLATE NOCASE,
        sort TEXT COLLATE NOCASE,
        UNIQUE (name)
    )",
    "CREATE TABLE books_series_link (
        id INTEGER PRIMARY KEY,
        book INTEGER NOT NULL,
        series INTEGER NOT NULL,
        UNIQUE(book)
    )",
    "CREATE TABLE comments (
        id INTEGER PRIMARY KEY,
        book INTEGER NOT NULL,
        text TEXT NOT NULL COLLATE NOCASE,
        UNIQUE(book)
    )",
];

/// Creates an empty Calibre library in a temporary directory.
///
/// The directory doubles as the library root, so book folders and cover
/// files can be created under it. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn temp_calibre_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join(crate::db::METADATA_DB))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    for statement in CALIBRE_SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create Calibre schema");
    }

    (pool, dir)
}

/// Inserts a book the way Calibre lays it out.
///
/// The book folder is `<first author>/<title> (<id>)`, the pubdate is in
/// 1990 and the book claims a cover.
pub async fn insert_calibre_book(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    authors: &[&str],
    tags: &[&str],
    comments: Option<&str>,
) {
    let folder = format!("{}/{} ({})", authors.first().unwrap_or(&"Unknown"), title, id);
    sqlx::query(
        "INSERT INTO books (id, title, pubdate, path, has_cover)
         VALUES (?, ?, '1990-05-01 00:00:00+00:00', ?, 1)",
    )
    .bind(id)
    .bind(title)
    .bind(&folder)
    .execute(pool)
    .await
    .expect("Failed to insert book");

    for author in authors {
        sqlx::query("INSERT OR IGNORE INTO authors (name) VALUES (?)")
            .bind(author)
            .execute(pool)
            .await
            .expect("Failed to insert author");
        sqlx::query(
            "INSERT INTO books_authors_link (book, author)
             SELECT ?, id FROM authors WHERE name = ?",
        )
        .bind(id)
        .bind(author)
        .execute(pool)
        .await
        .expect("Failed to link author");
    }

    for tag in tags {
        sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
            .bind(tag)
            .execute(pool)
            .await
            .expect("Failed to insert tag");
        sqlx::query(
            "INSERT INTO books_tags_link (book, tag)
             SELECT ?, id FROM tags WHERE name = ?",
        )
        .bind(id)
        .bind(tag)
        .execute(pool)
        .await
        .expect("Failed to link tag");
    }

    if let Some(text) = comments {
        sqlx::query("INSERT INTO comments (book, text) VALUES (?, ?)")
            .bind(id)
            .bind(text)
            .execute(pool)
            .await
            .expect("Failed to insert comments");
    }
}

/// Creates a source record with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let book = SourceBook {
///     pages: 900,
///     ..mock_source_book()
/// };
/// ```
pub fn mock_source_book() -> SourceBook {
    SourceBook {
        title: Some("La sombra del viento".to_string()),
        authors: vec!["Carlos Ruiz Zafón".to_string()],
        tags: vec!["Novela".to_string(), "Misterio".to_string()],
        pages: 565,
        synopsis: "Barcelona, 1945. Un niño descubre un libro maldito.".to_string(),
        year: "2001".to_string(),
        ..Default::default()
    }
}

/// Creates a canonical record with the given id, title and authors.
pub fn mock_book(id: i64, title: &str, authors: &[&str]) -> Book {
    Book {
        id,
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        page_count: 300,
        estimated_hours: 7.5,
        reading_hours: 7.5,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_calibre_db_starts_empty() {
        let (pool, dir) = temp_calibre_db().await;

        let books = crate::db::read_books(&pool, Some(dir.path())).await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_insert_calibre_book_shares_authors() {
        let (pool, _dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 1, "Uno", &["Autora"], &["Tag"], None).await;
        insert_calibre_book(&pool, 2, "Dos", &["Autora"], &["Tag"], None).await;

        let (authors,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(authors, 1);
    }

    #[test]
    fn test_mock_book_defaults() {
        let book = mock_book(42, "Ficciones", &["Jorge Luis Borges"]);
        assert_eq!(book.id, 42);
        assert_eq!(book.authors, vec!["Jorge Luis Borges".to_string()]);
        assert!(book.hook.is_none());
    }
}
