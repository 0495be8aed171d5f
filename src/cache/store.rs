//! Search Cache Module
//!
//! Search pages keyed by canonical params, expiring after a fixed TTL and
//! bounded by least-recently-used eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, RecencyList};
use crate::models::SearchResult;

// == Search Cache ==
#[derive(Debug)]
pub struct SearchCache {
    entries: HashMap<String, CacheEntry>,
    recency: RecencyList,
    stats: CacheStats,
    ttl: Duration,
    max_entries: usize,
}

impl SearchCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `ttl` - How long a captured page stays usable
    /// * `max_entries` - Capacity before the least recently used page is dropped
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the cached page for `key` if it is still valid.
    ///
    /// An expired entry is removed and counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<SearchResult> {
        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid(self.ttl),
            None => {
                self.stats.record_lookup(false);
                return None;
            }
        };

        if !valid {
            self.drop_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_lookup(false);
            return None;
        }

        self.recency.touch(key);
        self.stats.record_lookup(true);
        self.entries.get(key).map(|entry| entry.result.clone())
    }

    /// True if a valid entry exists, without touching recency or stats.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.is_valid(self.ttl))
    }

    // == Insert ==
    /// Captures `result` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: String, result: SearchResult) {
        self.insert_entry(key, CacheEntry::new(result));
    }

    /// Stores a pre-built entry, keeping its capture time.
    pub fn insert_entry(&mut self, key: String, entry: CacheEntry) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                match self.recency.pop_least_recent() {
                    Some(oldest) => {
                        debug!("Evicting cached search page {}", oldest);
                        self.entries.remove(&oldest);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        self.recency.touch(&key);
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Restore ==
    /// Reloads persisted entries, skipping expired ones.
    ///
    /// Entries are replayed oldest first so recency follows capture time.
    /// Returns the number of entries kept.
    pub fn restore(&mut self, entries: HashMap<String, CacheEntry>) -> usize {
        let now = current_timestamp_ms();
        let mut valid: Vec<(String, CacheEntry)> = entries
            .into_iter()
            .filter(|(_, entry)| entry.is_valid_at(now, self.ttl))
            .collect();
        valid.sort_by_key(|(_, entry)| entry.captured_at);

        let count = valid.len();
        for (key, entry) in valid {
            self.insert_entry(key, entry);
        }
        count
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_valid_at(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_entry(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Snapshot ==
    /// Clones every still-valid entry, for persistence.
    pub fn snapshot(&self) -> HashMap<String, CacheEntry> {
        let now = current_timestamp_ms();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_valid_at(now, self.ttl))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    fn drop_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.recency.forget(key);
        self.stats.set_total_entries(self.entries.len());
    }
}
