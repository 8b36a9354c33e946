use async_trait::async_trait;

use super::Result;

/// Backing key/value medium for the TTL store.
///
/// Any persistent or in-memory string map satisfies this. The medium is
/// shared with other application state, so implementations must never
/// assume they own every key.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Gets the raw stored string for a key.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores a raw string under a key, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a key. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every key currently held by the medium.
    async fn keys(&self) -> Result<Vec<String>>;
}
