//! Cache Key Module
//!
//! Canonical keys for search pages. Two params that must return the same page
//! map to the same key regardless of facet order or blank queries.

use serde::Serialize;

use crate::models::{SearchFilters, SearchParams, SortBy};

#[derive(Debug, Serialize)]
struct CanonicalKey<'a> {
    query: Option<&'a str>,
    filters: SearchFilters,
    sort_by: SortBy,
    page: u32,
    limit: u32,
}

// == Cache Key ==
/// Derives the cache key for one page of results.
///
/// The query is trimmed (blank counts as absent), empty facets are dropped,
/// and list facets are sorted and deduplicated.
pub fn cache_key(params: &SearchParams) -> String {
    let key = CanonicalKey {
        query: params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty()),
        filters: canonical_filters(&params.filters),
        sort_by: params.sort_by,
        page: params.page,
        limit: params.limit,
    };

    serde_json::to_string(&key).unwrap_or_else(|_| format!("{:?}", key))
}

fn canonical_filters(filters: &SearchFilters) -> SearchFilters {
    let mut filters = filters.clone();
    for list in [&mut filters.country, &mut filters.discipline]
        .into_iter()
        .flatten()
    {
        list.sort();
        list.dedup();
    }
    if let Some(levels) = filters.degree_level.as_mut() {
        levels.sort();
        levels.dedup();
    }
    filters.normalized()
}
