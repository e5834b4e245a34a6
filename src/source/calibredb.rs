//! Reading a library through Calibre's `calibredb` command.
//!
//! `calibredb` knows about every field Calibre stores, so it is preferred
//! over reading `metadata.db` directly. It is often not installed; any
//! failure to run it means "unavailable" and the caller falls back.

use std::path::Path;

use serde_json::Value;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::model::SourceBook;

/// Executable name, resolved through `PATH`.
pub const CALIBREDB: &str = "calibredb";

/// Fields requested from `calibredb list`.
pub const FIELDS: &str =
    "id,title,authors,tags,series,series_index,publisher,pubdate,comments,cover,formats";

/// List every book in the library.
///
/// Returns `Ok(None)` when `calibredb` is missing, exits with an error or
/// prints something that is not a record list.
pub async fn list(library: &Path) -> Result<Option<Vec<SourceBook>>> {
    let output = Command::new(CALIBREDB)
        .arg("list")
        .arg("--library-path")
        .arg(library)
        .arg("--fields")
        .arg(FIELDS)
        .arg("--for-machine")
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} not found on PATH", CALIBREDB);
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!("Could not run {}: {}", CALIBREDB, e);
            return Ok(None);
        }
    };

    if !output.status.success() {
        tracing::warn!(
            "{} exited with {}: {}",
            CALIBREDB,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(None);
    }

    match parse_output(&output.stdout) {
        Ok(books) => {
            tracing::info!("Read {} books through {}", books.len(), CALIBREDB);
            Ok(Some(books))
        }
        Err(e) => {
            tracing::warn!("Unreadable {} output: {}", CALIBREDB, e);
            Ok(None)
        }
    }
}

/// Parse the `--for-machine` output, a JSON list of records.
pub fn parse_output(stdout: &[u8]) -> Result<Vec<SourceBook>> {
    let value: Value = serde_json::from_slice(stdout)?;
    let Value::Array(items) = value else {
        return Err(Error::source("calibredb output is not a list"));
    };

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(SourceBook::from)
        .collect())
}
