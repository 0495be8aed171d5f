//! Configuration Module
//!
//! Handles loading runtime configuration and feature flags from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_ENTRIES};
use crate::models::DEFAULT_PAGE_SIZE;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, including the `/api` prefix
    pub api_base_url: String,
    /// Use the in-memory catalog instead of the REST backend
    pub use_mock_api: bool,
    /// Port of the development backend
    pub server_port: u16,
    /// Directory holding the persisted client records
    pub storage_dir: PathBuf,
    /// Search cache time-to-live in seconds
    pub search_cache_ttl: u64,
    /// Maximum number of cached search pages
    pub search_cache_max_entries: usize,
    /// Programs requested per search page
    pub page_size: u32,
    /// HTTP request timeout in seconds
    pub request_timeout: u64,
    /// Simulated latency of the in-memory catalog in milliseconds
    pub mock_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - REST backend base URL (default: http://localhost:8000/api)
    /// - `FEATURE_FLAG_USE_MOCK_API` - `true` selects the in-memory catalog (default: false)
    /// - `SERVER_PORT` - Development backend port (default: 8000)
    /// - `STORAGE_DIR` - Persisted client records (default: .program-discovery)
    /// - `SEARCH_CACHE_TTL` - Search cache TTL in seconds (default: 300)
    /// - `SEARCH_CACHE_MAX_ENTRIES` - Cached search pages (default: 100)
    /// - `SEARCH_PAGE_SIZE` - Programs per page (default: 12)
    /// - `REQUEST_TIMEOUT` - HTTP timeout in seconds (default: 30)
    /// - `MOCK_LATENCY_MS` - Simulated catalog latency (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            use_mock_api: env::var("FEATURE_FLAG_USE_MOCK_API")
                .map(|v| v == "true")
                .unwrap_or(defaults.use_mock_api),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            search_cache_ttl: parse_var("SEARCH_CACHE_TTL", defaults.search_cache_ttl),
            search_cache_max_entries: parse_var(
                "SEARCH_CACHE_MAX_ENTRIES",
                defaults.search_cache_max_entries,
            ),
            page_size: parse_var("SEARCH_PAGE_SIZE", defaults.page_size),
            request_timeout: parse_var("REQUEST_TIMEOUT", defaults.request_timeout),
            mock_latency_ms: parse_var("MOCK_LATENCY_MS", defaults.mock_latency_ms),
        }
    }

    /// Search cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            use_mock_api: false,
            server_port: 8000,
            storage_dir: PathBuf::from(".program-discovery"),
            search_cache_ttl: DEFAULT_CACHE_TTL_SECS,
            search_cache_max_entries: DEFAULT_MAX_ENTRIES,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: 30,
            mock_latency_ms: 0,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
