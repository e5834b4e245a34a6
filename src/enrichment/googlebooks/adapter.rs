//! Adapter layer: Convert Google Books DTOs to domain models

use super::dto;
use crate::enrichment::domain::{LookupResult, LookupSource, titles_overlap};

/// Convert a volumes response into a lookup result for `query_title`.
///
/// Picks the first volume whose title contains, or is contained in, the
/// query title; otherwise the first volume.
pub fn to_lookup_result(query_title: &str, response: dto::VolumesResponse) -> Option<LookupResult> {
    let wanted = query_title.trim().to_lowercase();
    let mut items = response.items;

    let best = items
        .iter()
        .position(|v| titles_overlap(&wanted, v.volume_info.title.as_deref()))
        .unwrap_or(0);
    if best >= items.len() {
        return None;
    }
    let info = items.swap_remove(best).volume_info;

    let year = info
        .published_date
        .as_deref()
        .map(|d| d.chars().take(4).collect::<String>())
        .filter(|y| !y.is_empty());

    Some(LookupResult {
        source: LookupSource::GoogleBooks,
        title: info.title,
        pages: info.page_count.filter(|p| *p > 0),
        genres: info.categories,
        description: info.description.filter(|d| !d.trim().is_empty()),
        year,
        work_key: None,
    })
}
