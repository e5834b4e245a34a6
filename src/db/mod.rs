//! Calibre `metadata.db` access.
//!
//! Uses SQLx with SQLite to read books straight from a Calibre library
//! and to write enrichment results back:
//! - Book listing with authors, tags, series and comments
//! - Tag get-or-create and linking
//! - Comment (synopsis) upserts
//!
//! Calibre must be closed while this runs; it does not expect other
//! writers.
//!
//! # Example
//!
//! ```ignore
//! use shelf_minder::db::{open, read_books};
//!
//! let pool = open(Path::new("Calibre Library/metadata.db")).await?;
//! let books = read_books(&pool, Some(Path::new("Calibre Library"))).await?;
//! ```

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::model::SourceBook;

/// File name of the Calibre database inside a library directory.
pub const METADATA_DB: &str = "metadata.db";

/// Separator for concatenated author and tag names; never part of a name.
const LIST_SEPARATOR: char = '\u{1f}';

/// Open an existing Calibre database.
///
/// Never creates the file: a missing database is an error.
pub async fn open(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// One book row with its related names concatenated.
#[derive(Debug, Clone, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    pubdate: Option<String>,
    /// Book directory relative to the library root
    path: Option<String>,
    series_index: Option<f64>,
    has_cover: Option<bool>,
    authors: Option<String>,
    tags: Option<String>,
    series: Option<String>,
    comments: Option<String>,
}

fn split_list(joined: Option<String>) -> Vec<String> {
    joined
        .unwrap_or_default()
        .split(LIST_SEPARATOR)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl BookRow {
    fn into_source_book(self, library_dir: Option<&Path>) -> SourceBook {
        let year = self
            .pubdate
            .as_deref()
            .map(|d| d.chars().take(4).collect::<String>())
            .unwrap_or_default();

        let cover_path = library_dir
            .zip(self.path.as_deref())
            .filter(|_| self.has_cover.unwrap_or(true))
            .map(|(root, rel)| root.join(rel).join("cover.jpg"))
            .filter(|p| p.exists())
            .map(|p| p.to_string_lossy().into_owned());

        SourceBook {
            title: Some(self.title),
            authors: split_list(self.authors),
            tags: split_list(self.tags),
            pages: 0,
            synopsis: self.comments.unwrap_or_default(),
            year,
            series: self.series,
            series_index: self.series_index,
            source_id: Some(self.id),
            cover_path,
        }
    }
}

/// Read every book in the library.
///
/// `library_dir` is used to resolve cover images; without it no cover
/// paths are set.
pub async fn read_books(
    pool: &SqlitePool,
    library_dir: Option<&Path>,
) -> sqlx::Result<Vec<SourceBook>> {
    let rows = sqlx::query_as::<_, BookRow>(
        r#"
        SELECT
            b.id, b.title, CAST(b.pubdate AS TEXT) AS pubdate, b.path,
            b.series_index, b.has_cover,
            (SELECT GROUP_CONCAT(a.name, char(31))
                FROM books_authors_link bal JOIN authors a ON a.id = bal.author
                WHERE bal.book = b.id) AS authors,
            (SELECT GROUP_CONCAT(t.name, char(31))
                FROM books_tags_link btl JOIN tags t ON t.id = btl.tag
                WHERE btl.book = b.id) AS tags,
            (SELECT s.name
                FROM books_series_link bsl JOIN series s ON s.id = bsl.series
                WHERE bsl.book = b.id LIMIT 1) AS series,
            (SELECT c.text FROM comments c WHERE c.book = b.id) AS comments
        FROM books b
        ORDER BY b.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Read {} books from Calibre database", rows.len());
    Ok(rows
        .into_iter()
        .map(|row| row.into_source_book(library_dir))
        .collect())
}

/// Add tags to a book, creating tags that don't exist yet.
///
/// Tags already linked to the book are skipped. Returns how many new
/// links were made.
pub async fn add_tags(pool: &SqlitePool, book_id: i64, tags: &[String]) -> sqlx::Result<usize> {
    let mut tx = pool.begin().await?;
    let mut linked = 0;

    for name in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

        let tag_id = match existing {
            Some((id,)) => id,
            None => sqlx::query("INSERT INTO tags (name) VALUES (?)")
                .bind(name)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
        };

        let already: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM books_tags_link WHERE book = ? AND tag = ?")
                .bind(book_id)
                .bind(tag_id)
                .fetch_optional(&mut *tx)
                .await?;

        if already.is_none() {
            sqlx::query("INSERT INTO books_tags_link (book, tag) VALUES (?, ?)")
                .bind(book_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
            linked += 1;
        }
    }

    tx.commit().await?;
    Ok(linked)
}

/// Set a book's comments (synopsis), inserting the row if needed.
pub async fn set_comments(pool: &SqlitePool, book_id: i64, text: &str) -> sqlx::Result<()> {
    let updated = sqlx::query("UPDATE comments SET text = ? WHERE book = ?")
        .bind(text)
        .bind(book_id)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        sqlx::query("INSERT INTO comments (book, text) VALUES (?, ?)")
            .bind(book_id)
            .bind(text)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Path of the database inside a library directory.
pub fn metadata_db_path(library_dir: &Path) -> PathBuf {
    library_dir.join(METADATA_DB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_calibre_book, temp_calibre_db};

    #[tokio::test]
    async fn test_read_books_joins_names() {
        let (pool, dir) = temp_calibre_db().await;
        insert_calibre_book(
            &pool,
            1,
            "Buenos presagios",
            &["Terry Pratchett", "Neil Gaiman"],
            &["Fantasy", "Humor"],
            Some("<p>El fin del mundo se acerca.</p>"),
        )
        .await;

        let books = read_books(&pool, Some(dir.path())).await.unwrap();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.title.as_deref(), Some("Buenos presagios"));
        assert_eq!(book.authors.len(), 2);
        assert!(book.authors.contains(&"Neil Gaiman".to_string()));
        assert_eq!(book.tags.len(), 2);
        assert_eq!(book.synopsis, "<p>El fin del mundo se acerca.</p>");
        assert_eq!(book.year, "1990");
        assert_eq!(book.source_id, Some(1));
        // No cover file on disk
        assert!(book.cover_path.is_none());
    }

    #[tokio::test]
    async fn test_read_books_without_relations() {
        let (pool, _dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 4, "Solo", &[], &[], None).await;

        let books = read_books(&pool, None).await.unwrap();
        assert!(books[0].authors.is_empty());
        assert!(books[0].tags.is_empty());
        assert!(books[0].synopsis.is_empty());
    }

    #[tokio::test]
    async fn test_cover_resolved_when_present() {
        let (pool, dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 2, "Con portada", &["Autora"], &[], None).await;

        let book_dir = dir.path().join("Autora/Con portada (2)");
        std::fs::create_dir_all(&book_dir).unwrap();
        std::fs::write(book_dir.join("cover.jpg"), b"jpeg").unwrap();

        let books = read_books(&pool, Some(dir.path())).await.unwrap();
        let cover = books[0].cover_path.as_deref().unwrap();
        assert!(cover.ends_with("cover.jpg"));
    }

    #[tokio::test]
    async fn test_add_tags_is_idempotent() {
        let (pool, _dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 1, "Libro", &["Autor"], &["Novela"], None).await;

        let tags = vec!["Novela".to_string(), "Terror".to_string(), " ".to_string()];
        assert_eq!(add_tags(&pool, 1, &tags).await.unwrap(), 1);
        assert_eq!(add_tags(&pool, 1, &tags).await.unwrap(), 0);

        let books = read_books(&pool, None).await.unwrap();
        assert_eq!(books[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn test_set_comments_upserts() {
        let (pool, _dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 1, "Libro", &["Autor"], &[], None).await;

        set_comments(&pool, 1, "Primera").await.unwrap();
        set_comments(&pool, 1, "Segunda").await.unwrap();

        let books = read_books(&pool, None).await.unwrap();
        assert_eq!(books[0].synopsis, "Segunda");
    }

    #[tokio::test]
    async fn test_open_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open(&dir.path().join(METADATA_DB)).await.is_err());
    }
}
