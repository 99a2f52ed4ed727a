//! Local key-value storage
//!
//! The directory persists into a string-keyed, string-valued store in the
//! manner of browser local storage. Two backends are provided:
//!
//! - [`MemoryStore`]: in-process map, used for tests and `--memory` runs
//! - [`FileStore`]: a single JSON document on disk (feature `file-store`)
//!
//! Both backends can enforce a byte quota on the stored values; a write that
//! would exceed it fails with [`StoreErrorKind::QuotaExceeded`].

mod error;
#[cfg(feature = "file-store")]
mod file;
mod memory;

pub use error::{StoreError, StoreErrorKind, StoreOperation, StoreResult};
#[cfg(feature = "file-store")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// A local key-value store holding string values
///
/// Reads take `&self`; writes take `&mut self` because the store is owned by
/// a single directory instance and never shared.
pub trait KeyValueStore {
    /// Return the value stored under `key`, or `None` when the key is absent
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

/// Bytes a set of entries occupies against a quota (keys plus values)
pub(crate) fn stored_bytes<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> usize {
    entries.map(|(k, v)| k.len() + v.len()).sum()
}
