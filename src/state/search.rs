//! Search Orchestrator
//!
//! Owns the query, filters, sort order and pagination cursor, fetches pages
//! through the gateway and serves repeated requests from the search cache.
//!
//! Every search takes a request generation. A response that arrives after a
//! newer search has started is still cached but is not applied, so the
//! visible results always belong to the most recent request.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheEntry, CacheStats, SearchCache};
use crate::config::Config;
use crate::gateway::Gateway;
use crate::models::{Facet, Program, SearchFilters, SearchParams, SearchResult, SortBy};
use crate::persist::{
    load_record, save_record_async, Storage, SEARCH_CACHE_NAMESPACE, SEARCH_NAMESPACE,
};

// == Status ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

// == Outcome ==
/// How a call to [`SearchOrchestrator::search`] was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Served from a valid cache entry
    Cached,
    /// Fetched from the gateway and applied
    Fetched,
    /// Resolved after a newer search started; cached but not applied
    Stale,
    /// Gateway failed; error recorded, previous results kept
    Failed,
    /// Nothing to do (no next page, or a search is in flight)
    Skipped,
}

// == Snapshot ==
/// Read-only copy of the orchestrator state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub filters: SearchFilters,
    pub sort_by: SortBy,
    pub page: u32,
    pub results: Vec<Program>,
    pub total: usize,
    pub total_pages: u32,
    pub has_next: bool,
    pub status: SearchStatus,
    pub error: Option<String>,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    filters: SearchFilters,
    sort_by: SortBy,
    page: u32,
    results: Vec<Program>,
    total: usize,
    total_pages: u32,
    has_next: bool,
    status: SearchStatus,
    error: Option<String>,
    generation: u64,
}

impl SearchState {
    fn apply(&mut self, result: SearchResult, append: bool) {
        if append {
            self.results.extend(result.programs);
        } else {
            self.results = result.programs;
        }
        self.page = result.page;
        self.total = result.total;
        self.total_pages = result.total_pages;
        self.has_next = result.has_next;
        self.status = SearchStatus::Loaded;
        self.error = None;
    }

    fn reset_criteria(&mut self) {
        self.query.clear();
        self.filters = SearchFilters::default();
        self.sort_by = SortBy::default();
        self.page = 1;
    }
}

/// Durable search criteria.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSearch {
    #[serde(default)]
    query: String,
    #[serde(default)]
    filters: SearchFilters,
    #[serde(default)]
    sort_by: SortBy,
}

// == Search Orchestrator ==
pub struct SearchOrchestrator {
    gateway: Arc<dyn Gateway>,
    storage: Arc<dyn Storage>,
    state: RwLock<SearchState>,
    cache: RwLock<SearchCache>,
    page_size: u32,
}

impl SearchOrchestrator {
    // == Constructor ==
    /// Creates the orchestrator and restores persisted criteria and cache.
    ///
    /// # Arguments
    /// * `gateway` - Source of search pages
    /// * `storage` - Durable store for the criteria and cache records
    /// * `cache` - Empty cache carrying the TTL and capacity to use
    /// * `page_size` - Programs requested per page
    pub fn new(
        gateway: Arc<dyn Gateway>,
        storage: Arc<dyn Storage>,
        mut cache: SearchCache,
        page_size: u32,
    ) -> Self {
        let mut state = SearchState {
            page: 1,
            ..Default::default()
        };

        if let Some(persisted) = load_record::<PersistedSearch>(storage.as_ref(), SEARCH_NAMESPACE)
        {
            state.query = persisted.query;
            state.filters = persisted.filters.normalized();
            state.sort_by = persisted.sort_by;
        }
        if let Some(entries) =
            load_record::<HashMap<String, CacheEntry>>(storage.as_ref(), SEARCH_CACHE_NAMESPACE)
        {
            let restored = cache.restore(entries);
            info!("Restored {} cached search pages", restored);
        }

        Self {
            gateway,
            storage,
            state: RwLock::new(state),
            cache: RwLock::new(cache),
            page_size: page_size.max(1),
        }
    }

    /// Builds the orchestrator with the cache TTL, capacity and page size from `config`.
    pub fn from_config(
        gateway: Arc<dyn Gateway>,
        storage: Arc<dyn Storage>,
        config: &Config,
    ) -> Self {
        let cache = SearchCache::new(config.cache_ttl(), config.search_cache_max_entries);
        Self::new(gateway, storage, cache, config.page_size)
    }

    // == Criteria ==
    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
        self.persist_criteria().await;
    }

    /// Merges `partial` into the current filters and returns to page 1.
    pub async fn set_filters(&self, partial: SearchFilters) {
        {
            let mut state = self.state.write().await;
            state.filters.merge(partial);
            state.page = 1;
        }
        self.persist_criteria().await;
    }

    pub async fn remove_filter(&self, facet: Facet) {
        {
            let mut state = self.state.write().await;
            state.filters.remove(facet);
            state.page = 1;
        }
        self.persist_criteria().await;
    }

    pub async fn set_sort_by(&self, sort_by: SortBy) {
        {
            let mut state = self.state.write().await;
            state.sort_by = sort_by;
            state.page = 1;
        }
        self.persist_criteria().await;
    }

    /// Resets query, filters, sort and page. Cached pages are kept.
    pub async fn clear_filters(&self) {
        self.state.write().await.reset_criteria();
        self.persist_criteria().await;
    }

    /// Drops the visible results without touching the criteria.
    pub async fn clear_results(&self) {
        let mut state = self.state.write().await;
        state.results.clear();
        state.total = 0;
        state.total_pages = 0;
        state.has_next = false;
        state.page = 1;
        if state.status != SearchStatus::Loading {
            state.status = SearchStatus::Idle;
        }
    }

    pub async fn clear_error(&self) {
        let mut state = self.state.write().await;
        state.error = None;
        if state.status == SearchStatus::Error {
            state.status = if state.results.is_empty() {
                SearchStatus::Idle
            } else {
                SearchStatus::Loaded
            };
        }
    }

    // == Search ==
    /// Fetches the current page.
    ///
    /// With `reset_page` the first page replaces the results; otherwise the
    /// current page is fetched and appended.
    pub async fn search(&self, reset_page: bool) -> SearchOutcome {
        let page = if reset_page {
            1
        } else {
            self.state.read().await.page
        };
        self.run(page, !reset_page).await
    }

    // == Load More ==
    /// Appends the next page. Skipped when there is no next page or a
    /// search is already in flight.
    ///
    /// The page cursor only advances once the next page has been applied,
    /// so a failed attempt can be retried.
    pub async fn load_more(&self) -> SearchOutcome {
        let next_page = {
            let state = self.state.read().await;
            if !state.has_next || state.status == SearchStatus::Loading {
                return SearchOutcome::Skipped;
            }
            state.page + 1
        };
        self.run(next_page, true).await
    }

    async fn run(&self, page: u32, append: bool) -> SearchOutcome {
        let (params, generation) = {
            let mut state = self.state.write().await;
            state.generation += 1;
            let query = Some(state.query.clone()).filter(|q| !q.trim().is_empty());
            let params = SearchParams {
                query,
                filters: state.filters.clone(),
                sort_by: state.sort_by,
                page,
                limit: self.page_size,
            };
            (params, state.generation)
        };
        let key = cache_key(&params);

        let cached = self.cache.write().await.get(&key);
        if let Some(result) = cached {
            debug!("Search cache hit for page {}", page);
            let mut state = self.state.write().await;
            if state.generation != generation {
                return SearchOutcome::Stale;
            }
            state.apply(result, append);
            return SearchOutcome::Cached;
        }

        {
            let mut state = self.state.write().await;
            if state.generation == generation {
                state.status = SearchStatus::Loading;
                state.error = None;
            }
        }

        debug!("Search cache miss for page {}, fetching", page);
        let fetched = self.gateway.search_programs(&params).await;

        match fetched {
            Ok(result) => {
                let cached_pages = {
                    let mut cache = self.cache.write().await;
                    cache.insert(key, result.clone());
                    cache.purge_expired();
                    cache.snapshot()
                };
                let outcome = {
                    let mut state = self.state.write().await;
                    if state.generation == generation {
                        state.apply(result, append);
                        SearchOutcome::Fetched
                    } else {
                        debug!("Discarding superseded response for page {}", page);
                        SearchOutcome::Stale
                    }
                };
                self.persist_cache(&cached_pages).await;
                outcome
            }
            Err(e) => {
                let mut state = self.state.write().await;
                if state.generation != generation {
                    return SearchOutcome::Stale;
                }
                warn!("Search failed: {}", e);
                state.status = SearchStatus::Error;
                state.error = Some(e.to_string());
                SearchOutcome::Failed
            }
        }
    }

    // == Queries ==
    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.read().await;
        SearchSnapshot {
            query: state.query.clone(),
            filters: state.filters.clone(),
            sort_by: state.sort_by,
            page: state.page,
            results: state.results.clone(),
            total: state.total,
            total_pages: state.total_pages,
            has_next: state.has_next,
            status: state.status,
            error: state.error.clone(),
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Persistence ==
    /// Writes query, filters and sort order.
    async fn persist_criteria(&self) {
        let record = {
            let state = self.state.read().await;
            PersistedSearch {
                query: state.query.clone(),
                filters: state.filters.clone(),
                sort_by: state.sort_by,
            }
        };
        let saved = save_record_async(self.storage.clone(), SEARCH_NAMESPACE, &record).await;
        if let Err(e) = saved {
            warn!("Failed to persist search criteria: {}", e);
        }
    }

    /// Writes the still-valid cached pages.
    async fn persist_cache(&self, pages: &HashMap<String, CacheEntry>) {
        let saved = save_record_async(self.storage.clone(), SEARCH_CACHE_NAMESPACE, pages).await;
        if let Err(e) = saved {
            warn!("Failed to persist search cache: {}", e);
        }
    }
}
