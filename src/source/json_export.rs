//! JSON export files.
//!
//! Exports come in three shapes, all accepted:
//! - a list of records
//! - an object with a `books` list
//! - an object whose values are records (keyed by id)

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result, ResultExt};
use crate::model::SourceBook;
use crate::normalize::RawRecord;

/// Read an export file into source records.
pub fn read(path: &Path) -> Result<Vec<SourceBook>> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let text = std::fs::read_to_string(path)
        .with_context(format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(format!("Failed to parse {}", path.display()))?;

    let records = records_from_value(value)?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());

    Ok(records.iter().map(SourceBook::from).collect())
}

/// Pull raw records out of any supported export shape.
///
/// Entries that are not JSON objects are skipped with a warning.
pub fn records_from_value(value: Value) -> Result<Vec<RawRecord>> {
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("books") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                // "books" was just a record key, put it back
                map.insert("books".to_string(), other);
                map.into_iter().map(|(_, v)| v).collect()
            }
            None => map.into_iter().map(|(_, v)| v).collect(),
        },
        other => {
            return Err(Error::source(format!(
                "Export must be a list or an object, found {}",
                json_kind(&other)
            )));
        }
    };

    let total = entries.len();
    let records: Vec<RawRecord> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();

    if records.len() < total {
        tracing::warn!("Skipped {} export entries that are not records", total - records.len());
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
