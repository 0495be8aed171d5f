//! Cache Entry Module
//!
//! A captured search page and the moment it was captured.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::SearchResult;

// == Cache Entry ==
/// Snapshot of one search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub result: SearchResult,
    /// Capture timestamp (Unix milliseconds)
    pub captured_at: u64,
}

impl CacheEntry {
    /// Captures `result` now.
    pub fn new(result: SearchResult) -> Self {
        Self::captured_at(result, current_timestamp_ms())
    }

    pub fn captured_at(result: SearchResult, captured_at: u64) -> Self {
        Self {
            result,
            captured_at,
        }
    }

    // == Is Valid ==
    /// True while `now - captured_at < ttl`.
    ///
    /// An entry is already stale at exactly `captured_at + ttl`.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.is_valid_at(current_timestamp_ms(), ttl)
    }

    pub fn is_valid_at(&self, now_ms: u64, ttl: Duration) -> bool {
        (now_ms.saturating_sub(self.captured_at) as u128) < ttl.as_millis()
    }

    /// Milliseconds since capture.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.captured_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
