//! Cache-aside read path.
//!
//! Resolves a resource from its domain cache first and falls back to the
//! network on a miss, writing the fetched value through to the cache.
//! Network failures are returned unchanged and never cached. A failed
//! write-through is logged and the fetched value is still returned.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use fanclub_core::cache::{fetch_action, hit_action, ResourceKey, StorageError};
use fanclub_core::domain::{ChatMessage, Club, User};
use fanclub_core::fetch::{FetchError, Fetcher, Result};

use crate::domain::{ChatCache, ClubsCache, UserCache};
use crate::monitor::CacheMonitor;
use crate::query::QueryClient;

/// Cache-first resolver for the resources the domain caches know about.
pub struct CacheAside {
    user: Arc<UserCache>,
    clubs: Arc<ClubsCache>,
    chat: Arc<ChatCache>,
    fetcher: Arc<dyn Fetcher>,
    monitor: Option<Arc<CacheMonitor>>,
}

impl CacheAside {
    pub fn new(
        user: Arc<UserCache>,
        clubs: Arc<ClubsCache>,
        chat: Arc<ChatCache>,
        fetcher: Arc<dyn Fetcher>,
        monitor: Option<Arc<CacheMonitor>>,
    ) -> Self {
        Self {
            user,
            clubs,
            chat,
            fetcher,
            monitor,
        }
    }

    /// Resolves `resource`, consulting its domain cache first.
    ///
    /// Resources without a domain cache go straight to the network.
    pub async fn get(&self, resource: &ResourceKey) -> Result<Value> {
        let key = resource.query_key();

        match resource {
            ResourceKey::UserProfile => {
                if let Some(user) = self.user.get_user().await {
                    return self.hit(&key, &user);
                }
                let user: User = self.fetch_typed(resource, &key).await?;
                self.write_through(&key, self.user.set_user(&user).await);
                to_value(&user)
            }
            ResourceKey::ClubList => {
                if let Some(clubs) = self.clubs.get_clubs().await {
                    return self.hit(&key, &clubs);
                }
                let clubs: Vec<Club> = self.fetch_typed(resource, &key).await?;
                self.write_through(&key, self.clubs.set_clubs(&clubs).await);
                to_value(&clubs)
            }
            ResourceKey::ChatHistory(room_id) => {
                if let Some(messages) = self.chat.get_chat_history(room_id).await {
                    return self.hit(&key, &messages);
                }
                let messages: Vec<ChatMessage> = self.fetch_typed(resource, &key).await?;
                self.write_through(&key, self.chat.set_chat_history(room_id, &messages).await);
                to_value(&messages)
            }
            ResourceKey::Other(path) => {
                tracing::trace!(path = %path, "Uncached resource, passing through");
                self.fetcher.fetch(path).await
            }
        }
    }

    /// Resolves `resource` through the query layer, which de-duplicates
    /// concurrent requests for the same key and tracks their state.
    pub async fn query(self: &Arc<Self>, queries: &QueryClient, resource: &ResourceKey) -> Result<Value> {
        let this = Arc::clone(self);
        let owned = resource.clone();
        queries
            .fetch_query(&resource.query_key(), move || async move {
                this.get(&owned).await
            })
            .await
    }

    fn hit<T: Serialize>(&self, key: &str, data: &T) -> Result<Value> {
        tracing::trace!(key, "Cache hit");
        self.record(hit_action(key));
        to_value(data)
    }

    async fn fetch_typed<T: DeserializeOwned>(&self, resource: &ResourceKey, key: &str) -> Result<T> {
        let path = resource.resource_path();
        tracing::debug!(key, path = %path, "Cache miss, fetching");
        self.record(fetch_action(key));

        let value = self.fetcher.fetch(&path).await?;
        serde_json::from_value(value).map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }

    fn write_through(&self, key: &str, result: std::result::Result<(), StorageError>) {
        if let Err(err) = result {
            tracing::warn!(key, error = %err, "Failed to cache fetched resource");
        }
    }

    fn record(&self, action: String) {
        if let Some(monitor) = &self.monitor {
            monitor.log(action, None);
        }
    }
}

fn to_value<T: Serialize>(data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| FetchError::InvalidResponse(e.to_string()))
}
