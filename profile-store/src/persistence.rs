//! Persistence adapter for the user list
//!
//! The whole list lives as one JSON array under a single key. Saves replace
//! the value wholesale; there is no merging, no partial write and no retry.
//!
//! # Example
//!
//! ```rust
//! use profile_store::model::default_users;
//! use profile_store::persistence::UserRepository;
//! use profile_store::storage::MemoryStore;
//!
//! let mut repo = UserRepository::new(MemoryStore::new(), "userProfiles");
//! assert_eq!(repo.load().unwrap(), None);
//!
//! let users = default_users();
//! repo.save(&users).unwrap();
//! assert_eq!(repo.load().unwrap(), Some(users));
//! ```

use crate::error::{Error, Result};
use crate::model::User;
use crate::storage::{KeyValueStore, StoreError, StoreOperation};

/// Key the list is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "userProfiles";

/// Reads and writes the full user list through a [`KeyValueStore`]
#[derive(Debug)]
pub struct UserRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> UserRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key of the list
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted list; `Ok(None)` when nothing has been saved yet
    ///
    /// # Errors
    ///
    /// [`Error::Load`] when the store cannot be read or the value is not a
    /// well-formed user list.
    pub fn load(&self) -> Result<Option<Vec<User>>> {
        let Some(raw) = self.store.get_item(&self.key).map_err(Error::Load)? else {
            tracing::debug!(key = %self.key, "no persisted user list");
            return Ok(None);
        };

        let users: Vec<User> = serde_json::from_str(&raw).map_err(|e| {
            Error::Load(
                StoreError::serialization(StoreOperation::Read, e.to_string()).with_key(&self.key),
            )
        })?;

        tracing::debug!(key = %self.key, count = users.len(), "loaded user list");
        Ok(Some(users))
    }

    /// Replace the persisted list with `users`
    ///
    /// # Errors
    ///
    /// [`Error::Save`] when serialization or the store write fails.
    pub fn save(&mut self, users: &[User]) -> Result<()> {
        let raw = serde_json::to_string(users).map_err(|e| {
            Error::Save(
                StoreError::serialization(StoreOperation::Write, e.to_string()).with_key(&self.key),
            )
        })?;

        self.store.set_item(&self.key, &raw).map_err(Error::Save)?;
        tracing::debug!(key = %self.key, count = users.len(), bytes = raw.len(), "saved user list");
        Ok(())
    }

    /// Load the persisted list, or persist and return `seed` when there is none
    ///
    /// # Errors
    ///
    /// [`Error::Load`] when reading fails, [`Error::Save`] when the seed
    /// cannot be written.
    pub fn load_or_seed(&mut self, seed: Vec<User>) -> Result<Vec<User>> {
        if let Some(users) = self.load()? {
            return Ok(users);
        }

        tracing::info!(key = %self.key, count = seed.len(), "seeding user list");
        self.save(&seed)?;
        Ok(seed)
    }

    /// Remove the persisted list entirely
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(&self.key).map_err(Error::Save)?;
        tracing::info!(key = %self.key, "cleared user list");
        Ok(())
    }
}
