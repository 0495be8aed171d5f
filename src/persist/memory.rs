//! In-memory storage, for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Storage;
use crate::error::{DiscoveryError, Result};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces currently holding a record.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.read_guard()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.records
            .read()
            .map_err(|_| DiscoveryError::Storage("Memory storage lock poisoned".to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.records
            .write()
            .map_err(|_| DiscoveryError::Storage("Memory storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn read(&self, namespace: &str) -> Result<Option<String>> {
        Ok(self.read_guard()?.get(namespace).cloned())
    }

    fn write(&self, namespace: &str, contents: &str) -> Result<()> {
        self.write_guard()?
            .insert(namespace.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        self.write_guard()?.remove(namespace);
        Ok(())
    }
}
