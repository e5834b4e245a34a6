//! Metadata gap assessment for source records.
//!
//! Flags what a record from the source library lacks, so lookups can be
//! limited to books that would benefit from them.
//!
//! # Gap Flags
//!
//! - `FEW_TAGS` - Two tags or fewer, too little to categorize reliably
//! - `NO_SYNOPSIS` - Synopsis missing or at most 100 characters
//! - `NO_PAGES` - Page count unknown
//! - `NO_YEAR` - Publication year unknown
//! - `NO_AUTHOR` - No author recorded

use bitflags::bitflags;

use crate::model::SourceBook;
use crate::normalize::truncate_year;

/// Records with more tags than this are considered tagged.
pub const MIN_TAGS: usize = 2;

/// Synopses longer than this are considered complete.
pub const MIN_SYNOPSIS_CHARS: usize = 100;

bitflags! {
    /// Flags describing what a source record lacks.
    ///
    /// Multiple flags can be set simultaneously. Use `.is_empty()` to check
    /// if a record is complete.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MetadataGaps: u32 {
        /// Two tags or fewer
        const FEW_TAGS = 1 << 0;
        /// Synopsis missing or short
        const NO_SYNOPSIS = 1 << 1;
        /// Page count unknown
        const NO_PAGES = 1 << 2;
        /// Publication year unknown
        const NO_YEAR = 1 << 3;
        /// No author
        const NO_AUTHOR = 1 << 4;

        /// Gaps an online lookup can fill with tags or a description
        const NEEDS_LOOKUP = Self::FEW_TAGS.bits() | Self::NO_SYNOPSIS.bits();
    }
}

impl MetadataGaps {
    /// Assess a source record.
    pub fn assess(book: &SourceBook) -> Self {
        let mut gaps = Self::empty();

        let tags = book.tags.iter().filter(|t| !t.trim().is_empty()).count();
        if tags <= MIN_TAGS {
            gaps |= Self::FEW_TAGS;
        }
        if book.synopsis.trim().chars().count() <= MIN_SYNOPSIS_CHARS {
            gaps |= Self::NO_SYNOPSIS;
        }
        if book.pages == 0 {
            gaps |= Self::NO_PAGES;
        }
        if truncate_year(&book.year).is_empty() {
            gaps |= Self::NO_YEAR;
        }
        if book.authors.iter().all(|a| a.trim().is_empty()) {
            gaps |= Self::NO_AUTHOR;
        }

        gaps
    }

    /// Whether an online lookup could improve the record.
    pub fn needs_lookup(&self) -> bool {
        self.intersects(Self::NEEDS_LOOKUP)
    }

    /// Get human-readable descriptions of all set flags.
    pub fn descriptions(&self) -> Vec<&'static str> {
        let mut descs = Vec::new();

        if self.contains(Self::FEW_TAGS) {
            descs.push("few tags");
        }
        if self.contains(Self::NO_SYNOPSIS) {
            descs.push("no synopsis");
        }
        if self.contains(Self::NO_PAGES) {
            descs.push("no page count");
        }
        if self.contains(Self::NO_YEAR) {
            descs.push("no year");
        }
        if self.contains(Self::NO_AUTHOR) {
            descs.push("no author");
        }

        descs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_book() -> SourceBook {
        SourceBook {
            title: Some("Pedro Páramo".to_string()),
            authors: vec!["Juan Rulfo".to_string()],
            tags: vec!["Novela".into(), "México".into(), "Realismo mágico".into()],
            pages: 124,
            synopsis: "Juan Preciado viaja a Comala ".repeat(5),
            year: "1955".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_has_no_gaps() {
        let gaps = MetadataGaps::assess(&complete_book());
        assert!(gaps.is_empty());
        assert!(!gaps.needs_lookup());
    }

    #[test]
    fn test_empty_record_has_every_gap() {
        let gaps = MetadataGaps::assess(&SourceBook::default());
        assert!(gaps.contains(MetadataGaps::FEW_TAGS | MetadataGaps::NO_SYNOPSIS));
        assert!(gaps.contains(MetadataGaps::NO_PAGES | MetadataGaps::NO_YEAR));
        assert!(gaps.contains(MetadataGaps::NO_AUTHOR));
        assert_eq!(gaps.descriptions().len(), 5);
    }

    #[test]
    fn test_two_tags_is_few() {
        let mut book = complete_book();
        book.tags.truncate(2);
        let gaps = MetadataGaps::assess(&book);
        assert_eq!(gaps, MetadataGaps::FEW_TAGS);
        assert!(gaps.needs_lookup());
    }

    #[test]
    fn test_missing_pages_alone_does_not_need_lookup() {
        let mut book = complete_book();
        book.pages = 0;
        let gaps = MetadataGaps::assess(&book);
        assert_eq!(gaps, MetadataGaps::NO_PAGES);
        assert!(!gaps.needs_lookup());
    }
}
