//! Cache Module
//!
//! Short-lived cache of search result pages with TTL expiration and LRU
//! eviction, keyed by canonical search params.

mod entry;
mod key;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::cache_key;
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::SearchCache;

// == Defaults ==
/// Time a captured page stays usable (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default capacity before LRU eviction.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
