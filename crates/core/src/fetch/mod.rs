//! Network fetch seam used by the cache-aside layer.

mod error;

use async_trait::async_trait;

pub use error::{FetchError, Result};

/// Fetches a JSON resource from the API.
///
/// Implementations only distinguish success from failure; HTTP status
/// interpretation beyond that is theirs to decide.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource_path: &str) -> Result<serde_json::Value>;
}
