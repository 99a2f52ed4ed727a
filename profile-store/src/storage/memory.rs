//! In-memory key-value store

use std::collections::HashMap;

use super::{stored_bytes, KeyValueStore, StoreError, StoreResult};

/// In-process key-value store
///
/// Counts successful writes so callers can tell whether a command reached
/// persistence at all.
///
/// ```rust
/// use profile_store::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set_item("greeting", "hello").unwrap();
/// assert_eq!(store.get_item("greeting").unwrap().as_deref(), Some("hello"));
/// assert_eq!(store.writes(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Number of successful `set_item` calls
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota_bytes {
            let others = stored_bytes(self.entries.iter().filter(|(k, _)| k.as_str() != key));
            let required = others + key.len() + value.len();
            if required > quota {
                tracing::warn!(key, required, quota, "memory store quota exceeded");
                return Err(StoreError::quota_exceeded(key, required, quota));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
