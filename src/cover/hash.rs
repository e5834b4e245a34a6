//! Content hashing for covers.
//!
//! Covers are small, so the whole file is hashed.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::Path;

/// SHA-256 of a file's contents as lowercase hex (64 characters).
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn content_hash(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Whether two files have identical contents.
///
/// A missing or unreadable file never matches.
pub fn same_content(a: &Path, b: &Path) -> bool {
    let (Ok(len_a), Ok(len_b)) = (std::fs::metadata(a), std::fs::metadata(b)) else {
        return false;
    };
    if len_a.len() != len_b.len() {
        return false;
    }

    match (content_hash(a), content_hash(b)) {
        (Ok(hash_a), Ok(hash_b)) => hash_a == hash_b,
        _ => false,
    }
}
