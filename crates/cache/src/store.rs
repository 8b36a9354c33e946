//! Namespaced key/value store with per-entry time-to-live.
//!
//! Every key is written as `prefix + key` into a shared backing medium.
//! Expiry is evaluated lazily: an entry found dead on read is evicted and
//! reported as a miss. A dead entry that is never read again stays in the
//! medium until `clear`, `remove` or `sweep_expired` reaches it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fanclub_core::cache::{
    decode_entry, decode_envelope, decode_meta, encode_entry, into_typed, namespaced, strip_namespace,
    CacheEntry, KeyValueStorage, Result, StorageError, DEFAULT_PREFIX,
};
use fanclub_core::domain::Versioned;

/// Namespaced TTL store over a [`KeyValueStorage`] medium.
///
/// Cheap to clone; clones share the medium.
#[derive(Clone)]
pub struct TtlStore {
    storage: Arc<dyn KeyValueStorage>,
    prefix: String,
    default_ttl: Duration,
}

impl TtlStore {
    /// Creates a store writing under `prefix` into `storage`.
    ///
    /// # Arguments
    ///
    /// * `storage` - The backing medium, possibly shared with other state
    /// * `prefix` - Namespace prepended to every key. A blank prefix is
    ///   replaced by [`DEFAULT_PREFIX`].
    /// * `default_ttl` - TTL applied when `set` is called without one
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        prefix: impl Into<String>,
        default_ttl: Duration,
    ) -> Self {
        let mut prefix = prefix.into();
        if prefix.trim().is_empty() {
            tracing::warn!(default = DEFAULT_PREFIX, "Blank cache prefix, using the default");
            prefix = DEFAULT_PREFIX.to_string();
        }

        Self {
            storage,
            prefix,
            default_ttl,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Writes `data` under `key`, replacing any previous entry.
    ///
    /// `None` uses the store's default TTL. Failures are logged and returned
    /// so the caller can tell a lost write from a stored one.
    pub async fn set<T>(&self, key: &str, data: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Versioned + ?Sized,
    {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(data, T::SCHEMA_VERSION, now_ms(), ttl);

        let result = match encode_entry(&entry) {
            Ok(raw) => {
                self.storage
                    .set_item(&namespaced(&self.prefix, key), &raw)
                    .await
            }
            Err(err) => Err(StorageError::Serialization(err.to_string())),
        };

        match &result {
            Ok(()) => tracing::trace!(key, ttl_ms = entry.ttl_ms, "Cache entry written"),
            Err(err) => tracing::warn!(key, error = %err, "Failed to write cache entry"),
        }
        result
    }

    /// Reads the live value under `key`.
    ///
    /// Absent, unreadable, expired, or schema-mismatched entries are all a
    /// miss; the last three are evicted. Storage errors never escape.
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Versioned,
    {
        let envelope = self.lookup(key).await?;

        match into_typed::<T>(envelope) {
            Ok(entry) => {
                tracing::trace!(key, "Cache hit");
                Some(entry.data)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache entry does not match its type, evicting");
                self.evict(key).await;
                None
            }
        }
    }

    /// Returns true if `key` holds a live entry readable as `T`.
    ///
    /// Equivalent to `get::<T>(key).is_some()`, including eviction of dead,
    /// malformed, or schema-mismatched entries.
    pub async fn has<T>(&self, key: &str) -> bool
    where
        T: DeserializeOwned + Versioned,
    {
        self.get::<T>(key).await.is_some()
    }

    /// Checks that `key` holds a live entry readable as `T`, without
    /// evicting anything.
    pub async fn is_live<T>(&self, key: &str) -> bool
    where
        T: DeserializeOwned + Versioned,
    {
        match self.storage.get_item(&namespaced(&self.prefix, key)).await {
            Ok(Some(raw)) => decode_entry::<T>(&raw).is_ok_and(|entry| entry.is_live(now_ms())),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to read cache entry");
                false
            }
        }
    }

    /// Deletes `key`. Deleting an absent key is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(&namespaced(&self.prefix, key))
            .await
            .inspect_err(|err| tracing::warn!(key, error = %err, "Failed to remove cache entry"))
    }

    /// Deletes every key under this store's prefix and nothing else.
    ///
    /// Keeps going past individual failures and reports the first one.
    /// Returns the number of keys removed.
    pub async fn clear(&self) -> Result<usize> {
        let keys = self.physical_keys().await?;
        let mut removed = 0;
        let mut first_error = None;

        for key in keys {
            match self.storage.remove_item(&key).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "Failed to clear cache entry");
                    first_error.get_or_insert(err);
                }
            }
        }

        tracing::debug!(prefix = %self.prefix, removed, "Cache cleared");
        match first_error {
            Some(err) => Err(err),
            None => Ok(removed),
        }
    }

    /// Evicts every dead or unreadable entry under the prefix.
    ///
    /// Returns the number of entries evicted.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let now = now_ms();
        let mut evicted = 0;

        for key in self.physical_keys().await? {
            let Ok(Some(raw)) = self.storage.get_item(&key).await else {
                continue;
            };
            let live = decode_meta(&raw).is_ok_and(|meta| meta.is_live(now));
            if !live && self.storage.remove_item(&key).await.is_ok() {
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::debug!(prefix = %self.prefix, evicted, "Swept expired cache entries");
        }
        Ok(evicted)
    }

    /// Lists the logical keys (prefix stripped) currently stored, live or not.
    pub async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .physical_keys()
            .await?
            .iter()
            .filter_map(|key| strip_namespace(&self.prefix, key).map(str::to_string))
            .collect())
    }

    async fn physical_keys(&self) -> Result<Vec<String>> {
        let keys = self.storage.keys().await?;
        Ok(keys
            .into_iter()
            .filter(|key| key.starts_with(&self.prefix))
            .collect())
    }

    /// Reads and liveness-checks the envelope under `key`.
    async fn lookup(&self, key: &str) -> Option<CacheEntry<serde_json::Value>> {
        let raw = match self.storage.get_item(&namespaced(&self.prefix, key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                return None;
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to read cache entry, treating as miss");
                return None;
            }
        };

        let envelope = match decode_envelope(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(key, error = %err, "Malformed cache entry, evicting");
                self.evict(key).await;
                return None;
            }
        };

        if !envelope.is_live(now_ms()) {
            tracing::trace!(key, "Cache entry expired, evicting");
            self.evict(key).await;
            return None;
        }

        Some(envelope)
    }

    async fn evict(&self, key: &str) {
        let _ = self.remove(key).await;
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
