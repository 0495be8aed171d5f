//! Persistence Module
//!
//! Durable client-side records. Each store owns one namespace and writes a
//! single JSON record to it on every mutation; records are read back once at
//! startup.

mod file;
mod memory;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{DiscoveryError, Result};

pub use file::FileStorage;
pub use memory::MemoryStorage;

// == Namespaces ==
pub const AUTH_NAMESPACE: &str = "auth-storage";
pub const COMPARE_NAMESPACE: &str = "compare-storage";
pub const SHORTLIST_NAMESPACE: &str = "shortlist-storage";
pub const SEARCH_NAMESPACE: &str = "search-storage";
pub const SEARCH_CACHE_NAMESPACE: &str = "search-cache-storage";

// == Storage Trait ==
/// Namespaced string records surviving process restarts.
pub trait Storage: Send + Sync {
    /// Reads a record; `None` when nothing has been written.
    fn read(&self, namespace: &str) -> Result<Option<String>>;

    /// Replaces a record.
    fn write(&self, namespace: &str, contents: &str) -> Result<()>;

    /// Deletes a record; missing records are not an error.
    fn remove(&self, namespace: &str) -> Result<()>;
}

// == Typed Records ==
/// Loads and decodes a record.
///
/// Unreadable or corrupt records are logged and treated as absent so a bad
/// file never blocks startup.
pub fn load_record<T: DeserializeOwned>(storage: &dyn Storage, namespace: &str) -> Option<T> {
    let raw = match storage.read(namespace) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read {}: {}", namespace, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Discarding corrupt {} record: {}", namespace, e);
            None
        }
    }
}

/// Encodes and writes a record.
pub fn save_record<T: Serialize>(storage: &dyn Storage, namespace: &str, record: &T) -> Result<()> {
    let raw = serde_json::to_string(record)?;
    storage.write(namespace, &raw)
}

/// Encodes a record on the caller and writes it on the blocking pool.
pub async fn save_record_async<T: Serialize>(
    storage: Arc<dyn Storage>,
    namespace: &'static str,
    record: &T,
) -> Result<()> {
    let raw = serde_json::to_string(record)?;
    tokio::task::spawn_blocking(move || storage.write(namespace, &raw))
        .await
        .map_err(|e| DiscoveryError::Internal(format!("Storage task failed: {}", e)))?
}
