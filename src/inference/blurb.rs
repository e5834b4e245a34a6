//! Short promotional blurbs.
//!
//! Prefers the first substantial sentence of the synopsis; otherwise falls
//! back to a category template, and finally to a sentence naming the authors.

use super::vocabulary::BLURB_TEMPLATES;

/// Synopses at or under this length are not mined for a sentence.
const MIN_SYNOPSIS_CHARS: usize = 100;

/// A sentence must be longer than this to serve as a blurb.
const MIN_SENTENCE_CHARS: usize = 50;

/// Build a blurb for a book. Never returns an empty string.
pub fn generate_blurb(synopsis: &str, categories: &[String], authors: &[String]) -> String {
    if let Some(sentence) = lead_sentence(synopsis) {
        return sentence;
    }

    for category in categories {
        if let Some((_, template)) = BLURB_TEMPLATES.iter().find(|(c, _)| c == category) {
            return template.to_string();
        }
    }

    format!("Una obra de {} que merece ser descubierta.", authors.join(", "))
}

/// First sentence of a long synopsis that is long enough to stand alone.
fn lead_sentence(synopsis: &str) -> Option<String> {
    if synopsis.chars().count() <= MIN_SYNOPSIS_CHARS {
        return None;
    }

    synopsis
        .split('.')
        .map(str::trim)
        .find(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .map(|sentence| format!("{}.", sentence))
}
