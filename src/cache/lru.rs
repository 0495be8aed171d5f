//! Recency Module
//!
//! Orders cached search pages by last use so the least recently viewed page
//! is dropped first when the cache is full.

use std::collections::VecDeque;

// == Recency List ==
/// Cache keys ordered by last use.
///
/// - Front = most recently used
/// - Back = least recently used
#[derive(Debug, Default)]
pub struct RecencyList {
    order: VecDeque<String>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as just used.
    pub fn touch(&mut self, key: &str) {
        self.forget(key);
        self.order.push_front(key.to_string());
    }

    // == Forget ==
    /// Stops tracking a key; unknown keys are ignored.
    pub fn forget(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
