//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: PROFILES_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/profile-directory/config.toml
//! 4. System directory: /etc/profile-directory/config.toml
//! 5. Default values
//!
//! # Example (config.toml)
//!
//! ```toml
//! [service]
//! log_level = "debug"
//! log_format = "pretty"
//!
//! [storage]
//! backend = "file"
//! path = "/var/lib/profiles/profiles.json"
//! key = "userProfiles"
//! quota_bytes = 5242880
//!
//! [directory]
//! seed_on_empty = true
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::DEFAULT_AVATAR;
use crate::persistence::DEFAULT_STORAGE_KEY;

/// Directory name used under XDG and /etc
pub const APP_NAME: &str = "profile-directory";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PROFILES_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Key-value storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Directory behaviour
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, reported in logs
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human-readable, multi-line
    Pretty,
    /// Human-readable, single line
    Compact,
}

/// Which key-value backend to persist into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON document on disk
    #[default]
    File,
    /// Process memory; nothing survives exit
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: StorageBackend,

    /// Store document path for the file backend (defaults to the XDG data dir)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the user list is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Byte quota across all stored values (0 disables the quota)
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

/// Directory behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Avatar URL applied when a user is saved without one
    #[serde(default = "default_avatar")]
    pub default_avatar: String,

    /// Write the sample users when nothing has been persisted yet
    #[serde(default = "default_true")]
    pub seed_on_empty: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            environment: default_environment(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_storage_key(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_avatar: default_avatar(),
            seed_on_empty: true,
        }
    }
}

impl StorageConfig {
    /// Quota to enforce, if any
    pub fn quota(&self) -> Option<usize> {
        (self.quota_bytes > 0).then_some(self.quota_bytes)
    }

    /// Path of the store document: the configured path, or
    /// `~/.local/share/profile-directory/profiles.json`
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        xdg_dirs
            .place_data_file("profiles.json")
            .unwrap_or_else(|e| {
                tracing::warn!("XDG data directory unavailable ({}), using ./profiles.json", e);
                PathBuf::from("profiles.json")
            })
    }
}

fn default_service_name() -> String {
    APP_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_quota_bytes() -> usize {
    // Browser local storage allows roughly 5 MiB per origin
    5 * 1024 * 1024
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/profile-directory/config.toml
    /// 3. System directory: /etc/profile-directory/config.toml
    ///
    /// Environment variables (PROFILES_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path; environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// All possible config file paths, highest priority first
    pub fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Ok(path) = xdg_dirs.place_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_NAME).join("config.toml"));
        paths
    }

    /// Where a user-level config file is expected
    pub fn recommended_path() -> PathBuf {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        xdg_dirs.place_config_file("config.toml").unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| String::from("~")))
                .join(".config")
                .join(APP_NAME)
                .join("config.toml")
        })
    }
}
