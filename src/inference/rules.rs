//! Attribute inference rules.
//!
//! Every function here is pure and total: each branch has a fallback,
//! so a record with no usable metadata still gets a full attribute set.

use super::vocabulary::{
    AWARD_KEYWORDS, CATEGORY_VOCABULARY, DEFAULT_CATEGORY, DENSE_AUTHORS, DENSE_GENRE_MARKERS,
    FAST_CATEGORIES, JUVENILE_MARKERS, LIGHT_AUTHORS, LIGHT_AUTHOR_PAGE_LIMIT, MOOD_KEYWORDS,
    SLOW_CATEGORIES,
};
use crate::model::{Difficulty, Labels, Mood, Pacing};

/// Smallest estimate reported for a book with any pages at all.
const MIN_HOURS: f64 = 0.1;

/// Look up a single tag in the category vocabulary.
///
/// Exact match first, then the first key that contains the tag or is
/// contained in it.
pub fn category_for_tag(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }

    if let Some((_, label)) = CATEGORY_VOCABULARY.iter().find(|(key, _)| *key == tag) {
        return Some(label);
    }

    CATEGORY_VOCABULARY
        .iter()
        .find(|(key, _)| tag.contains(key) || key.contains(tag.as_str()))
        .map(|(_, label)| *label)
}

/// Map raw tags to canonical category labels. Never empty.
pub fn infer_categories<S: AsRef<str>>(tags: &[S]) -> Labels {
    let mut labels = Labels::new();
    for tag in tags {
        if let Some(label) = category_for_tag(tag.as_ref())
            && !labels.iter().any(|l| l == label)
        {
            labels.push(label.to_string());
        }
    }

    if labels.is_empty() {
        labels.push(DEFAULT_CATEGORY.to_string());
    }
    labels
}

fn author_matches(authors: &[String], list: &[&str]) -> bool {
    authors.iter().any(|author| {
        let author = author.to_lowercase();
        list.iter().any(|entry| author.contains(entry))
    })
}

/// Classify reading effort from authors, page count and tags.
pub fn infer_difficulty(pages: u32, authors: &[String], tags: &[String]) -> Difficulty {
    if author_matches(authors, DENSE_AUTHORS) {
        return Difficulty::Dense;
    }
    if author_matches(authors, LIGHT_AUTHORS) && pages < LIGHT_AUTHOR_PAGE_LIMIT {
        return Difficulty::Light;
    }

    match pages {
        0..150 => Difficulty::Light,
        150..350 => {
            let juvenile = tags
                .iter()
                .any(|t| JUVENILE_MARKERS.contains(&t.trim().to_lowercase().as_str()));
            if juvenile {
                Difficulty::Light
            } else {
                Difficulty::Medium
            }
        }
        350..600 => {
            let blob = tags.join(" ").to_lowercase();
            if DENSE_GENRE_MARKERS.iter().any(|m| blob.contains(m)) {
                Difficulty::Dense
            } else {
                Difficulty::Medium
            }
        }
        _ => Difficulty::Dense,
    }
}

/// Estimated reading time in hours, rounded to one decimal.
///
/// Returns 0.0 only when the page count is unknown (0).
pub fn estimate_hours(pages: u32, difficulty: Difficulty) -> f64 {
    if pages == 0 {
        return 0.0;
    }
    let hours = f64::from(pages) / difficulty.pages_per_hour();
    round_tenth(hours).max(MIN_HOURS)
}

/// Round to one decimal, ties to even.
///
/// Only quarters can sit exactly on a tie, and their tenfold is exact, so
/// those are rounded directly. Anything else goes through the exact
/// decimal expansion of the float.
pub fn round_tenth(value: f64) -> f64 {
    if (value * 4.0).fract() == 0.0 {
        return (value * 10.0).round_ties_even() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Pick the mood whose keywords appear most often in the book's text.
pub fn infer_mood(categories: &[String], tags: &[String], synopsis: &str) -> Mood {
    let blob = categories
        .iter()
        .chain(tags.iter())
        .map(String::as_str)
        .chain(std::iter::once(synopsis))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut best: Option<(Mood, usize)> = None;
    for (mood, keywords) in MOOD_KEYWORDS {
        let score = keywords.iter().filter(|kw| blob.contains(*kw)).count();
        // Strictly greater keeps the earlier mood on ties
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((*mood, score));
        }
    }

    best.map(|(mood, _)| mood).unwrap_or_default()
}

/// Classify pacing from categories, then page count.
pub fn infer_pacing(pages: u32, categories: &[String]) -> Pacing {
    let has_any = |set: &[&str]| categories.iter().any(|c| set.contains(&c.as_str()));

    if has_any(FAST_CATEGORIES) {
        Pacing::Fast
    } else if has_any(SLOW_CATEGORIES) {
        Pacing::Slow
    } else if pages > 500 {
        Pacing::Slow
    } else if pages < 200 {
        Pacing::Fast
    } else {
        Pacing::Medium
    }
}

/// Detect literary awards mentioned in tags, title or authors.
pub fn detect_awards(tags: &[String], title: &str, authors: &[String]) -> Vec<String> {
    let blob = tags
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(title))
        .chain(authors.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    AWARD_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| blob.contains(kw)))
        .map(|(award, _)| award.to_string())
        .collect()
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn tag() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "fiction", "Mystery", "juvenil", "Philosophy", "historia", "poetry", "drama",
            ])
            .prop_map(String::from),
            "[a-zA-Z ]{0,20}",
        ]
    }

    fn author() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec!["Marcel Proust", "Stephen King", "Ana Pérez"])
                .prop_map(String::from),
            "[a-zA-Z ]{1,20}",
        ]
    }

    proptest! {
        /// Category inference never returns an empty set
        #[test]
        fn categories_never_empty(tags in prop::collection::vec(tag(), 0..6)) {
            prop_assert!(!infer_categories(&tags).is_empty());
        }

        /// Difficulty does not decrease as page count grows
        #[test]
        fn difficulty_monotonic_in_pages(
            authors in prop::collection::vec(author(), 0..3),
            tags in prop::collection::vec(tag(), 0..4),
            a in 0u32..1200,
            b in 0u32..1200,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(infer_difficulty(lo, &authors, &tags) <= infer_difficulty(hi, &authors, &tags));
        }

        /// Any book with pages gets a positive, reproducible estimate
        #[test]
        fn hours_positive_and_pure(
            pages in 1u32..5000,
            difficulty in prop::sample::select(vec![Difficulty::Light, Difficulty::Medium, Difficulty::Dense]),
        ) {
            let first = estimate_hours(pages, difficulty);
            prop_assert!(first > 0.0);
            prop_assert_eq!(first, estimate_hours(pages, difficulty));
        }
    }
}
