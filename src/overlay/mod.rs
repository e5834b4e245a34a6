//! Editorial overlay file (`hooks.json`).
//!
//! Maps a book id (as text) to hand-written copy for the front end. The
//! sync only ever adds entries: an existing entry is never modified or
//! removed, and keys it does not model are written back untouched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ResultExt};
use crate::library::write_json_atomic;
use crate::model::Book;

/// Overlay entries keyed by book id.
pub type Hooks = BTreeMap<String, HookEntry>;

/// One book's editorial copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookEntry {
    pub hook: String,
    pub themes: Vec<String>,
    pub experience: String,
    #[serde(alias = "perfectFor")]
    pub perfect_for: String,
    #[serde(alias = "whyMatters")]
    pub why_matters: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookEntry {
    /// The entry a sync creates for a book without one.
    pub fn for_book(book: &Book) -> Self {
        Self {
            hook: book.blurb.clone(),
            experience: book.mood.label().to_string(),
            ..Default::default()
        }
    }
}

/// Load the overlay file. A missing file is an empty overlay.
pub fn load(path: &Path) -> Result<Hooks> {
    if !path.exists() {
        tracing::debug!("No overlay at {}, starting empty", path.display());
        return Ok(Hooks::new());
    }

    let text = std::fs::read_to_string(path)
        .with_context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(format!("Failed to parse {}", path.display()))
}

/// Write the overlay file, UTF-8 and pretty-printed.
pub fn save(path: &Path, hooks: &Hooks) -> Result<()> {
    write_json_atomic(path, hooks)
}

/// Add a default entry for every book that has none.
///
/// Returns how many entries were added.
pub fn fill_missing_entries(hooks: &mut Hooks, books: &[Book]) -> usize {
    let mut added = 0;
    for book in books {
        hooks.entry(book.id.to_string()).or_insert_with(|| {
            added += 1;
            HookEntry::for_book(book)
        });
    }
    added
}

/// Load, fill and save in one step. Returns how many entries were added.
pub fn generate(path: &Path, books: &[Book]) -> Result<usize> {
    let mut hooks = load(path)?;
    let added = fill_missing_entries(&mut hooks, books);

    if added > 0 {
        save(path, &hooks)?;
        tracing::info!("Added {} overlay entries to {}", added, path.display());
    } else {
        tracing::debug!("Overlay already covers every book");
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mood;
    use crate::test_utils::mock_book;

    #[test]
    fn test_default_entry_from_book() {
        let book = Book {
            blurb: "Una novela sobre el tiempo.".to_string(),
            mood: Mood::Reflective,
            ..mock_book(3, "El Aleph", &["Borges"])
        };

        let entry = HookEntry::for_book(&book);
        assert_eq!(entry.hook, "Una novela sobre el tiempo.");
        assert_eq!(entry.experience, "reflexivo");
        assert!(entry.themes.is_empty());
        assert!(entry.perfect_for.is_empty());
    }

    #[test]
    fn test_existing_entries_are_kept() {
        let mut hooks = Hooks::new();
        hooks.insert(
            "1".to_string(),
            HookEntry {
                hook: "Escrito a mano".to_string(),
                ..Default::default()
            },
        );

        let books = vec![mock_book(1, "Uno", &["A"]), mock_book(2, "Dos", &["B"])];
        assert_eq!(fill_missing_entries(&mut hooks, &books), 1);
        assert_eq!(fill_missing_entries(&mut hooks, &books), 0);
        assert_eq!(hooks["1"].hook, "Escrito a mano");
        assert!(hooks.contains_key("2"));
    }

    #[test]
    fn test_round_trip_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hooks.json");
        std::fs::write(
            &path,
            r#"{"7": {"hook": "Imprescindible", "perfectFor": "viajes", "tono": "cálido"}}"#,
        )
        .unwrap();

        let added = generate(&path, &[mock_book(8, "Otro", &["C"])]).unwrap();
        assert_eq!(added, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        // Non-ASCII is written literally
        assert!(text.contains("cálido"));

        let hooks = load(&path).unwrap();
        assert_eq!(hooks["7"].perfect_for, "viajes");
        assert_eq!(hooks["7"].extra["tono"], "cálido");
        assert!(hooks.contains_key("8"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("hooks.json")).unwrap().is_empty());
    }
}
