//! In-memory key/value medium.
//!
//! Thread-safe string map using tokio synchronization primitives. An
//! optional byte quota mimics the size limit browsers put on local storage,
//! so quota failures can be exercised without a real medium.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fanclub_core::cache::{KeyValueStorage, Result, StorageError};

/// In-memory key/value medium.
///
/// Cloning yields a handle onto the same map, which is how tests observe
/// what the TTL store physically wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total bytes of keys plus values, if limited.
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Creates an empty, unbounded medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty medium that rejects writes beyond `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Arc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Returns the number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

fn used_bytes(items: &HashMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().await;

        if let Some(quota) = self.quota_bytes {
            let replaced = items.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = used_bytes(&items) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "writing {} needs {} bytes, quota is {}",
                    key, needed, quota
                )));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let storage = MemoryStorage::new();

        storage.set_item("test:key", "test value").await.unwrap();
        let result = storage.get_item("test:key").await.unwrap();

        assert_eq!(result, Some("test value".to_string()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("nonexistent:key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "v").await.unwrap();

        storage.remove_item("k").await.unwrap();
        storage.remove_item("k").await.unwrap();

        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_items() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set_item("shared", "1").await.unwrap();

        assert_eq!(handle.get_item("shared").await.unwrap(), Some("1".into()));
        assert_eq!(handle.len().await, 1);
    }

    #[tokio::test]
    async fn test_keys_lists_everything() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();

        let mut keys = storage.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);

        storage.set_item("k", "12345").await.unwrap();
        let result = storage.set_item("other", "123456").await;

        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));
        assert_eq!(storage.get_item("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(10);

        storage.set_item("k", "123456789").await.unwrap();
        // Overwriting the same key frees the old value first.
        storage.set_item("k", "987654321").await.unwrap();

        assert_eq!(storage.get_item("k").await.unwrap(), Some("987654321".into()));
    }
}
