//! Directory builder with configuration-driven defaults

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StorageBackend, StorageConfig};
use crate::directory::{DirectorySettings, ProfileDirectory};
use crate::persistence::UserRepository;
use crate::storage::{KeyValueStore, MemoryStore};

/// Directory over boxed store and clock, as produced by [`DirectoryBuilder`]
pub type DynDirectory = ProfileDirectory<Box<dyn KeyValueStore>, Box<dyn Clock>>;

/// Builds a [`ProfileDirectory`] with sensible defaults
///
/// All fields are optional:
/// - config: `Config::load()`, falling back to `Config::default()`
/// - store: opened from `config.storage`
/// - clock: [`SystemClock`]
///
/// # Example
///
/// ```rust
/// use profile_store::builder::DirectoryBuilder;
/// use profile_store::config::Config;
/// use profile_store::storage::MemoryStore;
///
/// let mut directory = DirectoryBuilder::new()
///     .with_config(Config::default())
///     .with_store(MemoryStore::new())
///     .build();
/// directory.load().unwrap();
/// assert_eq!(directory.users().len(), 3);
/// ```
#[derive(Default)]
pub struct DirectoryBuilder {
    config: Option<Config>,
    store: Option<Box<dyn KeyValueStore>>,
    clock: Option<Box<dyn Clock>>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration (optional, defaults to `Config::load()`)
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this store instead of the one `config.storage` describes
    pub fn with_store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Use this clock for new ids (optional, defaults to [`SystemClock`])
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Build the directory; it still has to be loaded
    pub fn build(self) -> DynDirectory {
        let config = self.config.unwrap_or_else(|| {
            Config::load().unwrap_or_else(|e| {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            })
        });

        let store = self.store.unwrap_or_else(|| open_store(&config.storage));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        ProfileDirectory::new(
            UserRepository::new(store, config.storage.key.clone()),
            clock,
            DirectorySettings::from(&config.directory),
        )
    }
}

/// Open the store described by `storage`
pub fn open_store(storage: &StorageConfig) -> Box<dyn KeyValueStore> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::debug!("using in-memory store");
            Box::new(match storage.quota() {
                Some(quota) => MemoryStore::with_quota(quota),
                None => MemoryStore::new(),
            })
        }
        #[cfg(feature = "file-store")]
        StorageBackend::File => {
            let path = storage.resolved_path();
            tracing::debug!(path = %path.display(), "using file store");
            let store = crate::storage::FileStore::open(path);
            Box::new(match storage.quota() {
                Some(quota) => store.with_quota(quota),
                None => store,
            })
        }
        #[cfg(not(feature = "file-store"))]
        StorageBackend::File => {
            tracing::warn!("file store support not compiled in, using in-memory store");
            Box::new(MemoryStore::new())
        }
    }
}
