//! File-backed storage
//!
//! One `<namespace>.json` file per record under a root directory. Writes go
//! to a temporary file first and are renamed into place, so a crash never
//! leaves a half-written record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Storage;
use crate::error::{DiscoveryError, Result};

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            DiscoveryError::Storage(format!("Cannot create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &str) -> Result<PathBuf> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DiscoveryError::Storage(format!(
                "Invalid namespace '{}'",
                namespace
            )));
        }
        Ok(self.root.join(format!("{}.json", namespace)))
    }
}

impl Storage for FileStorage {
    fn read(&self, namespace: &str) -> Result<Option<String>> {
        let path = self.path_for(namespace)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, namespace: &str, contents: &str) -> Result<()> {
        let path = self.path_for(namespace)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        debug!("Persisted {} ({} bytes)", namespace, contents.len());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        let path = self.path_for(namespace)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.write("auth-storage", r#"{"token":"t"}"#).unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(
            reopened.read("auth-storage").unwrap(),
            Some(r#"{"token":"t"}"#.to_string())
        );
        assert!(dir.path().join("auth-storage.json").exists());
        assert!(!dir.path().join("auth-storage.json.tmp").exists());
    }

    #[test]
    fn test_missing_record() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.read("compare-storage").unwrap(), None);
        storage.remove("compare-storage").unwrap();
    }

    #[test]
    fn test_creates_nested_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        storage.write("search-storage", "{}").unwrap();
        assert_eq!(storage.root(), nested.as_path());
        assert!(nested.join("search-storage.json").exists());
    }

    #[test]
    fn test_rejects_path_like_namespace() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let err = storage.write("../escape", "{}").unwrap_err();
        assert!(matches!(err, DiscoveryError::Storage(_)));
    }
}
