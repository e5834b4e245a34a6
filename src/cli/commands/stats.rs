//! Library summary command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::library::{self, LibraryStats};

/// Print a summary of the persisted library
pub fn cmd_stats(config: &Config, library_path: Option<&PathBuf>, json: bool) -> anyhow::Result<()> {
    let path = match library_path {
        Some(path) => path.clone(),
        None => config.library.library_path(&config.library.output_dir),
    };
    if !path.exists() {
        anyhow::bail!("Library not found: {:?}", path);
    }

    let books = library::load(&path)?;
    let stats = LibraryStats::compute(&books);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("=== {:?} ===", path);
    println!("Books:           {}", stats.books);
    println!("Previously read: {}", stats.previously_read);
    println!("With overlay:    {}", stats.with_overlay);
    println!("Total pages:     {}", stats.total_pages);
    println!("Total hours:     {:.1}", stats.total_hours);

    print_counts("Categories", &stats.by_category);
    print_counts("Moods", &stats.by_mood);
    print_counts("Difficulty", &stats.by_difficulty);
    print_counts("Pacing", &stats.by_pacing);
    if !stats.by_award.is_empty() {
        print_counts("Awards", &stats.by_award);
    }
    Ok(())
}

/// Print counts, most common first
fn print_counts(heading: &str, counts: &BTreeMap<String, usize>) {
    let mut sorted: Vec<(&String, &usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!();
    println!("{}:", heading);
    for (label, count) in sorted {
        println!("  {:<24} {:>5}", label, count);
    }
}
