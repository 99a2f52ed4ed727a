//! Error types

use std::fmt;
use thiserror::Error;

use crate::storage::StoreError;
use crate::validation::ValidationErrors;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failure category as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The stored list could not be read or parsed
    Load,
    /// The list could not be written to the store
    Save,
    /// Submitted form values were rejected
    Validation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load_failure"),
            Self::Save => write!(f, "save_failure"),
            Self::Validation => write!(f, "validation_failure"),
        }
    }
}

impl serde::Serialize for FailureKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Reading or parsing the persisted list failed
    #[error("Failed to load users from storage: {0}")]
    Load(StoreError),

    /// Writing the list to the store failed
    #[error("Failed to save users to storage: {0}")]
    Save(StoreError),

    /// Form values were rejected; nothing was mutated
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// No user with the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// The directory is in its error state and must be reloaded first
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// No form or confirmation is open for the requested action
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map to the load/save/validation categories, if the error is one of them
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Error::Load(_) => Some(FailureKind::Load),
            Error::Save(_) => Some(FailureKind::Save),
            Error::Validation(_) => Some(FailureKind::Validation),
            _ => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
