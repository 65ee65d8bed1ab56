//! Storage abstraction trait
//!
//! All blob-store backends implement [`Storage`]. The resolver works
//! against this trait without coupling to any backend's details, and "not
//! found" is an ordinary value-level outcome so callers can fall through to
//! other sources.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob-store capability: a simple keyed byte store with mime-type lookup.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read an object's bytes. `NotFound` when the key has no object.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Write an object, creating parent structure as needed.
    async fn put(&self, key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Content type of the stored object. `NotFound` when missing.
    async fn mime_type(&self, key: &str) -> StorageResult<String>;
}

/// Reject keys that could escape the store's namespace. Shared by all
/// backends so the rules stay consistent.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.split('/').any(|segment| segment == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("a/b/c.png").is_ok());
        assert!(validate_key("c.png").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("a/../b.png").is_err());
        assert!(validate_key("../b.png").is_err());
    }
}
