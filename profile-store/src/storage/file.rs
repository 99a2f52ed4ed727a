//! JSON-file backed key-value store
//!
//! The whole store is one JSON object (`{"key": "value", ...}`) on disk. Every
//! write rewrites the document into a sibling temporary file and renames it
//! over the previous one, so readers never observe a half-written document.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{stored_bytes, KeyValueStore, StoreError, StoreOperation, StoreResult};

/// Key-value store persisted as a single JSON document
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStore {
    /// Open a store at `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota_bytes: None,
        }
    }

    /// Reject writes that would grow the stored entries beyond `quota_bytes`
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self, operation: StoreOperation) -> StoreResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::io(
                    operation,
                    format!("Failed to read {}: {}", self.path.display(), e),
                ))
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            StoreError::serialization(
                operation,
                format!("Store document {} is not a JSON object of strings: {}", self.path.display(), e),
            )
        })
    }

    fn write_document(
        &self,
        operation: StoreOperation,
        document: &BTreeMap<String, String>,
    ) -> StoreResult<()> {
        let body = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::serialization(operation, e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(
                    operation,
                    format!("Failed to create directory {}: {}", parent.display(), e),
                )
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| {
            StoreError::io(operation, format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            StoreError::io(
                operation,
                format!("Failed to replace {}: {}", self.path.display(), e),
            )
        })?;

        tracing::debug!(path = %self.path.display(), keys = document.len(), "store document written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let mut document = self
            .read_document(StoreOperation::Read)
            .map_err(|e| e.with_key(key))?;
        Ok(document.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut document = self
            .read_document(StoreOperation::Write)
            .map_err(|e| e.with_key(key))?;
        document.insert(key.to_string(), value.to_string());

        if let Some(quota) = self.quota_bytes {
            let required = stored_bytes(document.iter());
            if required > quota {
                tracing::warn!(key, required, quota, path = %self.path.display(), "file store quota exceeded");
                return Err(StoreError::quota_exceeded(key, required, quota));
            }
        }

        self.write_document(StoreOperation::Write, &document)
            .map_err(|e| e.with_key(key))
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        let mut document = self
            .read_document(StoreOperation::Remove)
            .map_err(|e| e.with_key(key))?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(StoreOperation::Remove, &document)
            .map_err(|e| e.with_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreErrorKind;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::open(dir.path().join("nested").join("profiles.json"))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get_item("userProfiles").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_then_get_across_instances() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_item("userProfiles", "[]").unwrap();
        store.set_item("theme", "dark").unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get_item("userProfiles").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.remove_item("a").unwrap();
        store.remove_item("never-set").unwrap();

        assert_eq!(store.get_item("a").unwrap(), None);
        assert_eq!(store.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json at all").unwrap();

        let err = store.get_item("userProfiles").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Serialization);
        assert_eq!(err.operation, StoreOperation::Read);
        assert_eq!(err.key.as_deref(), Some("userProfiles"));
    }

    #[test]
    fn test_quota_leaves_previous_document_intact() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir).with_quota(16);
        store.set_item("k", "small").unwrap();

        let err = store.set_item("k", "a value far larger than sixteen bytes").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::QuotaExceeded);
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("small"));
    }
}
