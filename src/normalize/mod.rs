//! Record normalization.
//!
//! Source libraries expose the same logical field under different names:
//! Calibre's own JSON uses `title`/`authors`/`comments`, the front end's
//! export uses `t`/`a`/`syn`, and so on. Each logical field has a
//! priority-ordered alias list; the first alias present with a non-null
//! value wins. [`normalize`] then applies defaults and runs inference to
//! produce exactly one canonical [`Book`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::inference::{
    detect_awards, estimate_hours, generate_blurb, infer_categories, infer_difficulty,
    infer_mood, infer_pacing, round_tenth,
};
use crate::model::{Book, SourceBook};

/// A source record as decoded from JSON, keyed by whatever names the source uses.
pub type RawRecord = Map<String, Value>;

/// Title used when a record has none.
pub const UNTITLED: &str = "Untitled";

/// Author used when a record has none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Calibre's pubdate year for "unknown".
const UNDEFINED_YEAR: &str = "0101";

/// Page count assumed when a record has none.
pub const DEFAULT_PAGES: u32 = 250;

/// Field aliases, highest priority first.
pub mod aliases {
    pub const TITLE: &[&str] = &["title", "t"];
    pub const AUTHORS: &[&str] = &["authors", "a"];
    pub const TAGS: &[&str] = &["tags", "subjects"];
    pub const PAGES: &[&str] = &["pages", "pg"];
    pub const SYNOPSIS: &[&str] = &["description", "comments", "syn"];
    pub const YEAR: &[&str] = &["year", "pubdate", "y"];
    pub const SERIES: &[&str] = &["series", "s"];
    pub const SERIES_INDEX: &[&str] = &["series_index", "si"];
    pub const SOURCE_ID: &[&str] = &["calibre_id", "id"];
    pub const COVER: &[&str] = &["cover_path", "cover"];
}

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

fn first_present<'a>(raw: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a list field. A bare string is split on `separator`.
fn as_list(value: &Value, separator: &str) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        Value::String(s) => s.split(separator).map(String::from).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn as_pages(value: &Value) -> Option<u32> {
    as_f64(value)
        .filter(|f| *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<&RawRecord> for SourceBook {
    fn from(raw: &RawRecord) -> Self {
        let get = |keys: &[&str]| first_present(raw, keys);

        Self {
            title: get(aliases::TITLE).and_then(as_text),
            // Calibre joins multiple authors with " & "
            authors: get(aliases::AUTHORS)
                .map(|v| as_list(v, " & "))
                .unwrap_or_default(),
            tags: get(aliases::TAGS).map(|v| as_list(v, ",")).unwrap_or_default(),
            pages: get(aliases::PAGES).and_then(as_pages).unwrap_or(0),
            synopsis: get(aliases::SYNOPSIS).and_then(as_text).unwrap_or_default(),
            year: get(aliases::YEAR).and_then(as_text).unwrap_or_default(),
            series: get(aliases::SERIES)
                .and_then(as_text)
                .filter(|s| !s.trim().is_empty()),
            series_index: get(aliases::SERIES_INDEX).and_then(as_f64),
            source_id: get(aliases::SOURCE_ID).and_then(as_i64),
            cover_path: get(aliases::COVER)
                .and_then(as_text)
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Remove HTML tags from a synopsis.
pub fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").trim().to_string()
}

/// Keep only the first four characters of a date-like year.
///
/// Calibre's placeholder date for undated books becomes an empty year.
pub fn truncate_year(year: &str) -> String {
    let year: String = year.trim().chars().take(4).collect();
    if year == UNDEFINED_YEAR {
        String::new()
    } else {
        year
    }
}

/// Build the canonical record for a source book.
///
/// `provisional_id` is kept unless the merge finds an existing duplicate.
pub fn normalize(source: &SourceBook, provisional_id: i64) -> Book {
    let title = source
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let mut authors: Vec<String> = source
        .authors
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if authors.is_empty() {
        authors.push(UNKNOWN_AUTHOR.to_string());
    }

    let tags: Vec<String> = source
        .tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let pages = if source.pages == 0 {
        DEFAULT_PAGES
    } else {
        source.pages
    };
    let synopsis = strip_markup(&source.synopsis);

    let series = source
        .series
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    // Calibre stores an index of 1.0 even for books outside any series
    let series_position = series.as_ref().and(source.series_index);

    let categories = infer_categories(&tags);
    let difficulty = infer_difficulty(pages, &authors, &tags);
    let estimated_hours = estimate_hours(pages, difficulty);
    let mood = infer_mood(&categories, &tags, &synopsis);
    let pacing = infer_pacing(pages, &categories);
    let awards = detect_awards(&tags, &title, &authors);
    let blurb = generate_blurb(&synopsis, &categories, &authors);

    Book {
        id: provisional_id,
        title,
        authors,
        categories,
        series,
        series_position,
        difficulty,
        pacing,
        mood,
        page_count: pages,
        estimated_hours,
        reading_hours: round_tenth(estimated_hours * 0.9),
        awards,
        accent_color: 0,
        synopsis,
        blurb,
        publication_year: truncate_year(&source.year),
        previously_read: false,
        source_id: source.source_id,
        cover_path: source.cover_path.clone(),
        ..Default::default()
    }
}

/// Normalize a batch, handing out provisional ids from `first_id` upward.
pub fn normalize_all(sources: &[SourceBook], first_id: i64) -> Vec<Book> {
    sources
        .iter()
        .zip(first_id..)
        .map(|(source, id)| normalize(source, id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Mood, Pacing};
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_long_aliases_win_over_short() {
        let source = SourceBook::from(&raw(json!({
            "title": "Largo",
            "t": "Corto",
            "pg": 120,
        })));
        assert_eq!(source.title.as_deref(), Some("Largo"));
        assert_eq!(source.pages, 120);
    }

    #[test]
    fn test_null_alias_falls_through() {
        let source = SourceBook::from(&raw(json!({
            "description": null,
            "comments": "<p>Texto</p>",
        })));
        assert_eq!(source.synopsis, "<p>Texto</p>");
    }

    #[test]
    fn test_string_fields_become_lists() {
        let source = SourceBook::from(&raw(json!({
            "authors": "Terry Pratchett & Neil Gaiman",
            "tags": "Fantasy, Humor ,",
        })));
        assert_eq!(source.authors, vec!["Terry Pratchett", "Neil Gaiman"]);
        assert_eq!(source.tags, vec!["Fantasy", "Humor"]);
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        let source = SourceBook::from(&raw(json!({
            "pages": "lots",
            "series_index": "first",
            "calibre_id": "x",
        })));
        assert_eq!(source.pages, 0);
        assert_eq!(source.series_index, None);
        assert_eq!(source.source_id, None);
    }

    #[test]
    fn test_numeric_strings_parse() {
        let source = SourceBook::from(&raw(json!({
            "pages": " 312 ",
            "si": "2.5",
            "year": 1967,
        })));
        assert_eq!(source.pages, 312);
        assert_eq!(source.series_index, Some(2.5));
        assert_eq!(source.year, "1967");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("  <div><p>Hola <b>mundo</b></p></div> "), "Hola mundo");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_truncate_year() {
        assert_eq!(truncate_year("1998-05-01T00:00:00+00:00"), "1998");
        assert_eq!(truncate_year("2001"), "2001");
        assert_eq!(truncate_year(""), "");
        assert_eq!(truncate_year("0101-01-01T00:00:00+00:00"), "");
        assert_eq!(truncate_year("0101"), "");
    }

    #[test]
    fn test_normalize_undated_calibre_book() {
        let source = SourceBook::from(&raw(json!({
            "title": "Sin fecha",
            "pubdate": "0101-01-01T00:00:00+00:00",
            "series": null,
            "series_index": 1.0,
        })));
        let book = normalize(&source, 1);
        assert_eq!(book.publication_year, "");
        assert!(book.series.is_none());
        assert!(book.series_position.is_none());
    }

    #[test]
    fn test_normalize_orwell() {
        let source = SourceBook {
            title: Some("1984".to_string()),
            authors: vec!["George Orwell".to_string()],
            tags: vec!["dystopia".to_string(), "science fiction".to_string()],
            pages: 328,
            ..Default::default()
        };

        let book = normalize(&source, 1);

        assert!(book.categories.iter().any(|c| c == "ciencia ficción"));
        assert_eq!(book.difficulty, Difficulty::Medium);
        assert_eq!(book.estimated_hours, 8.2);
        assert_eq!(book.pacing, Pacing::Medium);
    }

    #[test]
    fn test_normalize_proust_is_dense() {
        let source = SourceBook {
            title: Some("Por el camino de Swann".to_string()),
            authors: vec!["Marcel Proust".to_string()],
            tags: vec!["juvenil".to_string()],
            pages: 700,
            ..Default::default()
        };
        assert_eq!(normalize(&source, 1).difficulty, Difficulty::Dense);
    }

    #[test]
    fn test_normalize_empty_record_uses_defaults() {
        let book = normalize(&SourceBook::default(), 42);

        assert_eq!(book.id, 42);
        assert_eq!(book.title, UNTITLED);
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR]);
        assert_eq!(book.categories.as_slice(), &["ficción".to_string()]);
        assert_eq!(book.page_count, DEFAULT_PAGES);
        assert_eq!(book.estimated_hours, 6.2); // 250 / 40
        assert_eq!(book.reading_hours, 5.6);
        assert_eq!(book.mood, Mood::Emotional);
        assert_eq!(book.blurb, "Una obra de Unknown que merece ser descubierta.");
        assert_eq!(book.publication_year, "");
        assert!(!book.previously_read);
        assert!(book.overlay().is_empty());
    }

    #[test]
    fn test_normalize_all_assigns_sequential_ids() {
        let sources: Vec<SourceBook> = [json!({"title": "A"}), json!({"title": "B"})]
            .into_iter()
            .map(|v| SourceBook::from(&raw(v)))
            .collect();
        let books = normalize_all(&sources, 10);
        assert_eq!(books[0].id, 10);
        assert_eq!(books[1].id, 11);
        assert_eq!(books[1].title, "B");
    }

    #[test]
    fn test_normalize_keeps_provenance() {
        let source = SourceBook::from(&raw(json!({
            "id": 77,
            "cover": "/lib/A/B (77)/cover.jpg",
            "series": "Mundodisco",
            "series_index": 3,
        })));
        let book = normalize(&source, 1);
        assert_eq!(book.source_id, Some(77));
        assert_eq!(book.cover_path.as_deref(), Some("/lib/A/B (77)/cover.jpg"));
        assert_eq!(book.series.as_deref(), Some("Mundodisco"));
        assert_eq!(book.series_position, Some(3.0));
    }
}
