//! Property-Based Tests for the Search Cache
//!
//! Uses proptest to check key canonicalization, capacity bounds and
//! statistics over generated operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{cache_key, SearchCache};
use crate::models::{DegreeLevel, SearchFilters, SearchParams, SearchResult, SortBy};

// == Strategies ==
fn country_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "Canada".to_string(),
            "Germany".to_string(),
            "United Kingdom".to_string(),
            "United States".to_string(),
        ]),
        0..6,
    )
}

fn level_list_strategy() -> impl Strategy<Value = Vec<DegreeLevel>> {
    prop::collection::vec(prop::sample::select(DegreeLevel::ALL.to_vec()), 0..5)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: u8 },
    Get { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0u8..20).prop_map(|key| CacheOp::Insert { key }),
        (0u8..20).prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Reordering or repeating list facet values never changes the key.
    #[test]
    fn prop_key_ignores_facet_order(
        countries in country_list_strategy(),
        levels in level_list_strategy(),
        page in 1u32..5
    ) {
        let mut reversed_countries = countries.clone();
        reversed_countries.reverse();
        let mut doubled_levels = levels.clone();
        doubled_levels.extend(levels.iter().rev().copied());

        let a = SearchParams {
            filters: SearchFilters {
                country: Some(countries),
                degree_level: Some(levels),
                ..Default::default()
            },
            page,
            ..Default::default()
        };
        let b = SearchParams {
            filters: SearchFilters {
                country: Some(reversed_countries),
                degree_level: Some(doubled_levels),
                ..Default::default()
            },
            page,
            ..Default::default()
        };

        prop_assert_eq!(cache_key(&a), cache_key(&b));
    }

    // Params differing in page or sort never share a key.
    #[test]
    fn prop_key_separates_pages(page_a in 1u32..50, page_b in 1u32..50) {
        prop_assume!(page_a != page_b);
        let a = SearchParams { page: page_a, ..Default::default() };
        let b = SearchParams { page: page_b, sort_by: SortBy::Ranking, ..Default::default() };
        let c = SearchParams { page: page_b, ..Default::default() };

        prop_assert_ne!(cache_key(&a), cache_key(&c));
        prop_assert_ne!(cache_key(&b), cache_key(&c));
    }

    // The cache never holds more than its capacity, and hit/miss counts
    // match the lookups performed.
    #[test]
    fn prop_capacity_and_stats(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let mut cache = SearchCache::new(Duration::from_secs(300), capacity);
        let mut lookups = 0u64;
        let mut inserted = HashSet::new();

        for op in ops {
            match op {
                CacheOp::Insert { key } => {
                    inserted.insert(key);
                    cache.insert(key.to_string(), SearchResult::empty(key as u32 + 1));
                }
                CacheOp::Get { key } => {
                    lookups += 1;
                    if let Some(result) = cache.get(&key.to_string()) {
                        prop_assert_eq!(result.page, key as u32 + 1);
                    }
                }
            }
            prop_assert!(cache.len() <= capacity);
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, lookups);
        prop_assert_eq!(stats.total_entries, cache.len());
        prop_assert!(cache.len() <= inserted.len());
    }

    // The most recently inserted page always survives eviction.
    #[test]
    fn prop_latest_insert_survives(
        capacity in 1usize..5,
        keys in prop::collection::vec(0u8..30, 1..40)
    ) {
        let mut cache = SearchCache::new(Duration::from_secs(300), capacity);
        for key in &keys {
            cache.insert(key.to_string(), SearchResult::empty(1));
        }
        let last = keys.last().map(|k| k.to_string()).unwrap_or_default();
        prop_assert!(cache.contains(&last));
    }
}
