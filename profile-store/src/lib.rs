//! # profile-store
//!
//! Core of a user-profile directory: a list of users (name, email, role,
//! avatar) that can be searched, added, edited and deleted, persisted as a
//! single JSON value in a local key-value store.
//!
//! ## Features
//!
//! - **State container**: [`ProfileDirectory`](directory::ProfileDirectory) owns the canonical list
//! - **Commands**: add, edit and delete validate, persist, then install the new list
//! - **Search**: case-insensitive filtering over name, email and role
//! - **Modal flow**: add/edit form and delete confirmation with inline validation errors
//! - **Storage**: in-memory and JSON-file key-value backends with byte quotas
//! - **Configuration**: layered TOML files and `PROFILES_` environment variables
//!
//! ## Example
//!
//! ```rust
//! use profile_store::prelude::*;
//!
//! let mut directory = DirectoryBuilder::new()
//!     .with_config(Config::default())
//!     .with_store(MemoryStore::new())
//!     .build();
//!
//! directory.load()?;
//! directory.open_add();
//! directory.set_field(Field::Name, "Ann Lee")?;
//! directory.set_field(Field::Email, "ann@x.com")?;
//! directory.set_field(Field::Role, "Manager")?;
//! let ann = directory.submit()?;
//!
//! assert_eq!(directory.users().last(), Some(&ann));
//! # Ok::<(), profile_store::Error>(())
//! ```

pub mod builder;
pub mod clock;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod model;
pub mod observability;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::{DirectoryBuilder, DynDirectory};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{Config, LogFormat, StorageBackend};
    pub use crate::directory::{DirectorySettings, ProfileDirectory};
    pub use crate::error::{Error, FailureKind, Result};
    pub use crate::filter::filter_users;
    pub use crate::model::{default_users, Role, User, UserId, DEFAULT_AVATAR};
    pub use crate::observability::init_tracing;
    pub use crate::persistence::{UserRepository, DEFAULT_STORAGE_KEY};
    pub use crate::state::{ErrorNotice, Status, UserForm};
    pub use crate::storage::{KeyValueStore, MemoryStore, StoreError, StoreErrorKind};
    #[cfg(feature = "file-store")]
    pub use crate::storage::FileStore;
    pub use crate::validation::{validate, Field, UserInput, ValidationErrors, Violation};
}
