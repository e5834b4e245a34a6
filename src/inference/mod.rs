//! Book attribute inference.
//!
//! Maps noisy source metadata (free-text tags, page counts, author names)
//! onto the normalized attributes the front end filters on: categories,
//! difficulty, reading time, mood, pacing, awards and a blurb.
//!
//! # Architecture
//!
//! - **Vocabulary** (`vocabulary.rs`) - Static, ordered lookup tables
//! - **Rules** (`rules.rs`) - One pure function per attribute
//! - **Blurb** (`blurb.rs`) - Promotional sentence generation
//!
//! Nothing in this module performs I/O or can fail.

pub mod blurb;
pub mod rules;
pub mod vocabulary;

pub use blurb::generate_blurb;
pub use rules::{
    category_for_tag, detect_awards, estimate_hours, infer_categories, infer_difficulty,
    infer_mood, infer_pacing, round_tenth,
};
