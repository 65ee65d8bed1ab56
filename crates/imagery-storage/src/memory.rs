//! In-memory storage backend
//!
//! HashMap-backed store. Used as a test double and as a lightweight
//! fallback store; the map lives behind a mutex so clones share contents.

use crate::mime::mime_type_for_path;
use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object synchronously (test convenience).
    pub fn insert(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        validate_key(key)?;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn mime_type(&self, key: &str) -> StorageResult<String> {
        if !self.exists(key).await? {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(mime_type_for_path(key).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let storage = MemoryStorage::new();
        storage.put("a/b.jpg", vec![1, 2, 3]).await.unwrap();

        assert_eq!(storage.get("a/b.jpg").await.unwrap(), vec![1, 2, 3]);
        assert!(storage.exists("a/b.jpg").await.unwrap());
        assert_eq!(storage.mime_type("a/b.jpg").await.unwrap(), "image/jpeg");

        storage.delete("a/b.jpg").await.unwrap();
        assert!(!storage.exists("a/b.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.get("missing.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_contents() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        storage.insert("x.png", vec![9]);
        assert_eq!(clone.get("x.png").await.unwrap(), vec![9]);
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.put("../x.png", vec![]).await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
