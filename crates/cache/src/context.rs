//! Per-session wiring of the cache subsystem.
//!
//! A [`CacheContext`] is built once at login and handed to whatever needs
//! cache access. [`CacheContext::teardown`] ends the session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use fanclub_core::cache::{CacheAction, KeyValueStorage, StorageError};
use fanclub_core::fetch::Fetcher;

use crate::config::CacheConfig;
use crate::coordinator::CacheCoordinator;
use crate::domain::{ChatCache, ClubsCache, UserCache};
use crate::fetch::CacheAside;
use crate::monitor::CacheMonitor;
use crate::query::QueryClient;
use crate::sweep::spawn_sweeper;
use crate::TtlStore;

/// Every cache component of one session, wired together.
pub struct CacheContext {
    config: CacheConfig,
    store: TtlStore,
    user: Arc<UserCache>,
    clubs: Arc<ClubsCache>,
    chat: Arc<ChatCache>,
    monitor: Option<Arc<CacheMonitor>>,
    queries: Arc<QueryClient>,
    cache_aside: Arc<CacheAside>,
    coordinator: CacheCoordinator,
    shutdown_tx: broadcast::Sender<()>,
    sweeper: Option<JoinHandle<()>>,
}

impl CacheContext {
    /// Builds the cache components over `storage` and `fetcher`.
    ///
    /// Starts the background sweeper when the config asks for one, which
    /// requires a running tokio runtime.
    pub fn init(
        config: CacheConfig,
        storage: Arc<dyn KeyValueStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let store = TtlStore::new(storage, config.prefix.clone(), config.default_ttl());
        let user = Arc::new(UserCache::new(store.clone(), config.user_ttl()));
        let clubs = Arc::new(ClubsCache::new(store.clone(), config.clubs_ttl()));
        let chat = Arc::new(ChatCache::new(store.clone(), config.chat_ttl()));

        let monitor = config
            .monitor_enabled
            .then(|| Arc::new(CacheMonitor::new(config.monitor_capacity)));
        let queries = Arc::new(QueryClient::new(config.query_stale_time()));

        let cache_aside = Arc::new(CacheAside::new(
            Arc::clone(&user),
            Arc::clone(&clubs),
            Arc::clone(&chat),
            fetcher,
            monitor.clone(),
        ));
        let coordinator = CacheCoordinator::new(
            store.clone(),
            Arc::clone(&user),
            Arc::clone(&clubs),
            Arc::clone(&chat),
            Arc::clone(&queries),
            Arc::clone(&cache_aside),
            monitor.clone(),
        );

        let (shutdown_tx, _) = broadcast::channel(1);
        let sweeper = config
            .sweep_interval()
            .map(|period| spawn_sweeper(store.clone(), period, shutdown_tx.subscribe()));

        tracing::info!(
            prefix = %config.prefix,
            monitor = config.monitor_enabled,
            sweeper = sweeper.is_some(),
            "Cache context initialized"
        );

        Self {
            config,
            store,
            user,
            clubs,
            chat,
            monitor,
            queries,
            cache_aside,
            coordinator,
            shutdown_tx,
            sweeper,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &TtlStore {
        &self.store
    }

    pub fn user(&self) -> &UserCache {
        &self.user
    }

    pub fn clubs(&self) -> &ClubsCache {
        &self.clubs
    }

    pub fn chat(&self) -> &ChatCache {
        &self.chat
    }

    /// The activity monitor, if enabled.
    pub fn monitor(&self) -> Option<&CacheMonitor> {
        self.monitor.as_deref()
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn cache_aside(&self) -> &Arc<CacheAside> {
        &self.cache_aside
    }

    pub fn coordinator(&self) -> &CacheCoordinator {
        &self.coordinator
    }

    /// Ends the session: stops the sweeper and clears everything a logout
    /// clears.
    pub async fn teardown(mut self) -> Result<(), StorageError> {
        let _ = self.shutdown_tx.send(());
        if let Some(sweeper) = self.sweeper.take() {
            if let Err(err) = sweeper.await {
                tracing::warn!(error = %err, "Cache sweeper ended abnormally");
            }
        }

        let result = self.coordinator.handle(&CacheAction::Logout).await;
        if let Some(monitor) = &self.monitor {
            monitor.clear();
        }
        tracing::info!("Cache context torn down");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::storage::MemoryStorage;
    use fanclub_core::domain::User;
    use fanclub_core::fetch::Result as FetchResult;

    struct StaticFetcher;

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _resource_path: &str) -> FetchResult<Value> {
            Ok(json!([]))
        }
    }

    #[tokio::test]
    async fn test_init_wires_components_to_one_store() {
        let storage = MemoryStorage::new();
        let context = CacheContext::init(
            CacheConfig::default(),
            Arc::new(storage.clone()),
            Arc::new(StaticFetcher),
        );

        context.user().set_user(&User::new("u1", "ultra")).await.unwrap();

        assert!(storage
            .get_item("sportsfan_cache_user")
            .await
            .unwrap()
            .is_some());
        assert!(context.monitor().is_some());
        assert_eq!(context.store().prefix(), "sportsfan_cache_");
    }

    #[tokio::test]
    async fn test_disabled_monitor() {
        let config = CacheConfig {
            monitor_enabled: false,
            ..CacheConfig::default()
        };
        let context = CacheContext::init(config, Arc::new(MemoryStorage::new()), Arc::new(StaticFetcher));

        assert!(context.monitor().is_none());
    }

    #[tokio::test]
    async fn test_teardown_clears_cache_and_stops_sweeper() {
        let storage = MemoryStorage::new();
        storage.set_item("theme", "dark").await.unwrap();
        let config = CacheConfig {
            sweep_interval_seconds: Some(3600),
            ..CacheConfig::default()
        };
        let context = CacheContext::init(config, Arc::new(storage.clone()), Arc::new(StaticFetcher));
        context.user().set_user(&User::new("u1", "ultra")).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), context.teardown())
            .await
            .expect("teardown should not hang")
            .unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["theme".to_string()]);
    }
}
