//! Core data models for the book library.
//!
//! Defines the two record shapes the sync pipeline works with:
//! - [`SourceBook`] - a raw record from Calibre or an export, after alias resolution
//! - [`Book`] - the canonical record persisted for the reading front end
//!
//! # Persisted Format
//!
//! [`Book`] serializes with the short keys the front end reads
//! (`t`, `a`, `v`, `d`, `m`, ...). Tier and mood values serialize as the
//! Spanish labels the front end filters on (`ligero`, `medio`, `denso`, ...).
//! Keys the pipeline does not know about are kept in [`Book::extra`] so a
//! hand-edited library survives a load/save cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::fmt;

/// Canonical category labels attached to a book, in inference order.
pub type Labels = SmallVec<[String; 4]>;

/// Coarse reading-effort classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "ligero")]
    Light,
    #[default]
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "denso")]
    Dense,
}

impl Difficulty {
    /// Pages read per hour at this difficulty.
    pub fn pages_per_hour(self) -> f64 {
        match self {
            Self::Light => 45.0,
            Self::Medium => 40.0,
            Self::Dense => 30.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "ligero",
            Self::Medium => "medio",
            Self::Dense => "denso",
        }
    }
}

/// Narrative pacing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pacing {
    #[serde(rename = "rápido")]
    Fast,
    #[default]
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "lento")]
    Slow,
}

impl Pacing {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fast => "rápido",
            Self::Medium => "medio",
            Self::Slow => "lento",
        }
    }
}

/// Emotional tone assigned to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "tenso")]
    Tense,
    #[default]
    #[serde(rename = "emotivo")]
    Emotional,
    #[serde(rename = "reflexivo")]
    Reflective,
    #[serde(rename = "inmersivo")]
    Immersive,
    #[serde(rename = "ligero")]
    Lighthearted,
    #[serde(rename = "oscuro")]
    Dark,
    #[serde(rename = "íntimo")]
    Intimate,
    #[serde(rename = "imaginativo")]
    Imaginative,
    #[serde(rename = "especulativo")]
    Speculative,
    #[serde(rename = "inquietante")]
    Unsettling,
    #[serde(rename = "entretenido")]
    Entertaining,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tense => "tenso",
            Self::Emotional => "emotivo",
            Self::Reflective => "reflexivo",
            Self::Immersive => "inmersivo",
            Self::Lighthearted => "ligero",
            Self::Dark => "oscuro",
            Self::Intimate => "íntimo",
            Self::Imaginative => "imaginativo",
            Self::Speculative => "especulativo",
            Self::Unsettling => "inquietante",
            Self::Entertaining => "entretenido",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw book record from a source library, after field aliases are resolved.
///
/// Every field is best-effort: empty vectors, `0` pages and empty strings
/// mean "unknown" and are defaulted by the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBook {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    /// Page count, 0 when unknown
    pub pages: u32,
    /// Free-text synopsis, possibly HTML
    pub synopsis: String,
    /// Publication date or year as text, possibly longer than 4 chars
    pub year: String,
    pub series: Option<String>,
    pub series_index: Option<f64>,
    /// Identifier in the source library (Calibre book id)
    pub source_id: Option<i64>,
    /// Cover image in the source library
    pub cover_path: Option<String>,
}

/// Editorially curated fields that must survive re-syncs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub hook: Option<String>,
    pub themes: Option<Vec<String>>,
    pub experience: Option<String>,
    pub perfect_for: Option<String>,
    pub why_matters: Option<String>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.hook.is_none()
            && self.themes.is_none()
            && self.experience.is_none()
            && self.perfect_for.is_none()
            && self.why_matters.is_none()
    }
}

/// A canonical book record as persisted for the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Unique within the persisted library, stable across re-syncs
    pub id: i64,
    #[serde(rename = "t")]
    pub title: String,
    #[serde(rename = "a")]
    pub authors: Vec<String>,
    #[serde(rename = "v")]
    pub categories: Labels,
    #[serde(rename = "s")]
    pub series: Option<String>,
    #[serde(rename = "si")]
    pub series_position: Option<f64>,
    #[serde(rename = "d")]
    pub difficulty: Difficulty,
    #[serde(rename = "p")]
    pub pacing: Pacing,
    #[serde(rename = "m")]
    pub mood: Mood,
    #[serde(rename = "pg")]
    pub page_count: u32,
    #[serde(rename = "h")]
    pub estimated_hours: f64,
    #[serde(rename = "rh")]
    pub reading_hours: f64,
    #[serde(rename = "aw")]
    pub awards: Vec<String>,
    /// Placeholder, filled in by the front-end build from the cover
    #[serde(rename = "ac")]
    pub accent_color: u32,
    #[serde(rename = "syn")]
    pub synopsis: String,
    #[serde(rename = "bl")]
    pub blurb: String,
    #[serde(rename = "y")]
    pub publication_year: String,
    #[serde(rename = "pv")]
    pub previously_read: bool,

    // Editorial overlay, never written by the sync itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfect_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_matters: Option<String>,

    // Provenance for collateral steps (cover copying)
    #[serde(rename = "_calibre_id")]
    pub source_id: Option<i64>,
    #[serde(rename = "_cover_path")]
    pub cover_path: Option<String>,

    /// Keys not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Book {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            authors: Vec::new(),
            categories: Labels::new(),
            series: None,
            series_position: None,
            difficulty: Difficulty::default(),
            pacing: Pacing::default(),
            mood: Mood::default(),
            page_count: 0,
            estimated_hours: 0.0,
            reading_hours: 0.0,
            awards: Vec::new(),
            accent_color: 0,
            synopsis: String::new(),
            blurb: String::new(),
            publication_year: String::new(),
            previously_read: false,
            hook: None,
            themes: None,
            experience: None,
            perfect_for: None,
            why_matters: None,
            source_id: None,
            cover_path: None,
            extra: Map::new(),
        }
    }
}

impl Book {
    /// The editorial overlay fields currently set on this record.
    pub fn overlay(&self) -> Overlay {
        Overlay {
            hook: self.hook.clone(),
            themes: self.themes.clone(),
            experience: self.experience.clone(),
            perfect_for: self.perfect_for.clone(),
            why_matters: self.why_matters.clone(),
        }
    }

    /// Copy every overlay field that is set on `overlay`, replacing ours.
    ///
    /// Fields unset on `overlay` are left alone.
    pub fn adopt_overlay(&mut self, overlay: &Overlay) {
        if let Some(hook) = &overlay.hook {
            self.hook = Some(hook.clone());
        }
        if let Some(themes) = &overlay.themes {
            self.themes = Some(themes.clone());
        }
        if let Some(experience) = &overlay.experience {
            self.experience = Some(experience.clone());
        }
        if let Some(perfect_for) = &overlay.perfect_for {
            self.perfect_for = Some(perfect_for.clone());
        }
        if let Some(why_matters) = &overlay.why_matters {
            self.why_matters = Some(why_matters.clone());
        }
    }
}
