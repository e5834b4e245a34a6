//! Online enrichment written back to Calibre.

use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::db;
use crate::enrichment::{BookEnrichment, EnrichmentService, LookupRequest, domain::MIN_SYNOPSIS_CHARS};
use crate::model::SourceBook;
use crate::source::select_for_lookup;

use super::short_title;

/// What enrichment would change on one book
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WriteBack {
    pub new_tags: Vec<String>,
    pub synopsis: Option<String>,
}

impl WriteBack {
    pub(crate) fn plan(book: &SourceBook, found: &BookEnrichment) -> Self {
        let synopsis = found
            .description
            .clone()
            .filter(|_| book.synopsis.trim().chars().count() <= MIN_SYNOPSIS_CHARS);

        Self {
            new_tags: found.new_tags(&book.tags),
            synopsis,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.new_tags.is_empty() && self.synopsis.is_none()
    }
}

/// Look books up online and write new tags and synopses to metadata.db
pub fn cmd_enrich(
    rt: &Runtime,
    config: &Config,
    calibre_db: Option<&PathBuf>,
    limit: Option<usize>,
    only_missing: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let db_path = match (calibre_db, &config.library.calibre_path) {
        (Some(path), _) => path.clone(),
        (None, Some(library)) => db::metadata_db_path(library),
        (None, None) => anyhow::bail!(
            "No database given: pass --calibre-db or set library.calibre_path in the config"
        ),
    };
    if !db_path.exists() {
        anyhow::bail!("Calibre database not found: {:?}", db_path);
    }

    rt.block_on(async {
        let service = EnrichmentService::new(&config.lookup)?;
        if !service.has_providers() {
            anyhow::bail!("Every lookup provider is disabled in the config");
        }

        let pool = db::open(&db_path).await?;
        let books = db::read_books(&pool, None).await?;
        let total = books.len();
        let books = select_for_lookup(books, only_missing, limit);

        println!("Enriching {} of {} books from {:?}", books.len(), total, db_path);
        if dry_run {
            println!("(dry run - nothing will be written)");
        }
        println!();

        let requests: Vec<LookupRequest> = books.iter().map(LookupRequest::for_book).collect();
        let found = service.enrich_all(&requests).await;

        let mut updated = 0;
        let mut tags_added = 0;
        let mut synopses = 0;
        let mut failed = 0;

        for (book, enrichment) in books.iter().zip(&found) {
            let title = short_title(book.title.as_deref().unwrap_or_default());
            let plan = WriteBack::plan(book, enrichment);
            if plan.is_empty() {
                println!("  - {}", title);
                continue;
            }

            println!(
                "  ✓ {} (+{} tags{})",
                title,
                plan.new_tags.len(),
                if plan.synopsis.is_some() { ", synopsis" } else { "" }
            );
            if !plan.new_tags.is_empty() {
                println!("      {}", plan.new_tags.join(", "));
            }

            if dry_run {
                updated += 1;
                tags_added += plan.new_tags.len();
                synopses += usize::from(plan.synopsis.is_some());
                continue;
            }

            let Some(book_id) = book.source_id else {
                continue;
            };
            match write_back(&pool, book_id, &plan).await {
                Ok(linked) => {
                    updated += 1;
                    tags_added += linked;
                    synopses += usize::from(plan.synopsis.is_some());
                }
                Err(e) => {
                    eprintln!("  ✗ Failed to update {}: {}", title, e);
                    failed += 1;
                }
            }
        }

        pool.close().await;

        println!();
        println!("=== Enrichment {} ===", if dry_run { "preview" } else { "complete" });
        println!("Looked up:      {}", books.len());
        println!("Books updated:  {}", updated);
        println!("Tags added:     {}", tags_added);
        println!("Synopses added: {}", synopses);
        if failed > 0 {
            println!("Failed:         {}", failed);
        }
        Ok(())
    })
}

async fn write_back(pool: &sqlx::SqlitePool, book_id: i64, plan: &WriteBack) -> sqlx::Result<usize> {
    let linked = db::add_tags(pool, book_id, &plan.new_tags).await?;
    if let Some(synopsis) = &plan.synopsis {
        db::set_comments(pool, book_id, synopsis).await?;
    }
    Ok(linked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_calibre_book, mock_source_book, temp_calibre_db};

    fn found() -> BookEnrichment {
        BookEnrichment {
            genres: vec!["Misterio".to_string(), "Histórica".to_string()],
            description: Some("d".repeat(200)),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_skips_known_tags() {
        let plan = WriteBack::plan(&mock_source_book(), &found());
        assert_eq!(plan.new_tags, vec!["Histórica".to_string()]);
        assert!(plan.synopsis.is_some());
    }

    #[test]
    fn test_plan_keeps_long_synopsis() {
        let book = SourceBook {
            synopsis: "s".repeat(150),
            ..mock_source_book()
        };
        assert!(WriteBack::plan(&book, &found()).synopsis.is_none());
    }

    #[tokio::test]
    async fn test_write_back() {
        let (pool, _dir) = temp_calibre_db().await;
        insert_calibre_book(&pool, 5, "Libro", &["Autor"], &["Misterio"], None).await;

        let plan = WriteBack {
            new_tags: vec!["Histórica".to_string()],
            synopsis: Some("Una sinopsis nueva.".to_string()),
        };
        assert_eq!(write_back(&pool, 5, &plan).await.unwrap(), 1);

        let books = db::read_books(&pool, None).await.unwrap();
        assert_eq!(books[0].tags.len(), 2);
        assert_eq!(books[0].synopsis, "Una sinopsis nueva.");
    }
}
