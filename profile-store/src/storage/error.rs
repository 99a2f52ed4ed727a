//! Key-value store error types
//!
//! Structured errors for store operations, carrying the operation, a
//! category, a message and the key involved.
//!
//! # Example
//!
//! ```rust
//! use profile_store::storage::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::quota_exceeded("userProfiles", 6_000_000, 5_242_880);
//! assert_eq!(error.kind, StoreErrorKind::QuotaExceeded);
//! assert_eq!(error.operation, StoreOperation::Write);
//! assert_eq!(error.key.as_deref(), Some("userProfiles"));
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Reading a value by key
    Read,
    /// Writing a value under a key
    Write,
    /// Removing a key
    Remove,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Writing the value would exceed the store's byte quota
    QuotaExceeded,
    /// The backing medium could not be read or written
    Io,
    /// The stored document or value could not be (de)serialized
    Serialization,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "quota_exceeded"),
            Self::Io => write!(f, "io"),
            Self::Serialization => write!(f, "serialization"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The key involved, when known
    pub key: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(
        operation: StoreOperation,
        kind: StoreErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            key: None,
        }
    }

    /// Create a "quota exceeded" error for a write of `required` bytes
    pub fn quota_exceeded(key: impl Into<String>, required: usize, quota: usize) -> Self {
        Self {
            operation: StoreOperation::Write,
            kind: StoreErrorKind::QuotaExceeded,
            message: format!("Storing {required} bytes exceeds the quota of {quota} bytes"),
            key: Some(key.into()),
        }
    }

    /// Create an I/O error
    pub fn io(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Io, message)
    }

    /// Create a serialization error
    pub fn serialization(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Serialization, message)
    }

    /// Add key context to an existing error
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    ///
    /// ```rust
    /// use profile_store::storage::{StoreError, StoreOperation};
    ///
    /// assert!(StoreError::io(StoreOperation::Read, "device busy").is_retriable());
    /// assert!(!StoreError::serialization(StoreOperation::Read, "bad json").is_retriable());
    /// ```
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Io)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref key) = self.key {
            write!(f, " [key: {}]", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_operation_display() {
        assert_eq!(format!("{}", StoreOperation::Read), "read");
        assert_eq!(format!("{}", StoreOperation::Write), "write");
        assert_eq!(format!("{}", StoreOperation::Remove), "remove");
    }

    #[test]
    fn test_store_error_kind_display() {
        assert_eq!(
            format!("{}", StoreErrorKind::QuotaExceeded),
            "quota_exceeded"
        );
        assert_eq!(format!("{}", StoreErrorKind::Io), "io");
        assert_eq!(
            format!("{}", StoreErrorKind::Serialization),
            "serialization"
        );
        assert_eq!(format!("{}", StoreErrorKind::Other), "other");
    }

    #[test]
    fn test_quota_exceeded_convenience() {
        let error = StoreError::quota_exceeded("userProfiles", 20, 10);
        assert_eq!(error.operation, StoreOperation::Write);
        assert_eq!(error.kind, StoreErrorKind::QuotaExceeded);
        assert!(error.message.contains("20 bytes"));
        assert!(error.message.contains("10 bytes"));
    }

    #[test]
    fn test_display_without_key() {
        let error = StoreError::io(StoreOperation::Read, "permission denied");
        let display = error.to_string();
        assert!(display.contains("io"));
        assert!(display.contains("read"));
        assert!(display.contains("permission denied"));
        assert!(!display.contains("["));
    }

    #[test]
    fn test_display_with_key() {
        let error = StoreError::serialization(StoreOperation::Write, "bad").with_key("userProfiles");
        assert!(error.to_string().ends_with("[key: userProfiles]"));
    }

    #[test]
    fn test_is_retriable() {
        assert!(StoreError::io(StoreOperation::Write, "busy").is_retriable());
        assert!(!StoreError::quota_exceeded("k", 2, 1).is_retriable());
        assert!(!StoreError::new(StoreOperation::Remove, StoreErrorKind::Other, "x").is_retriable());
    }
}
