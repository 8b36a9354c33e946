//! End-to-end behavior of the cache subsystem over an in-memory medium.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use fanclub_cache::storage::MemoryStorage;
use fanclub_cache::{CacheConfig, CacheContext, CacheMonitor, TtlStore};
use fanclub_core::cache::{HitRatio, KeyValueStorage, ResourceKey};
use fanclub_core::domain::{ChatMessage, Club, User};
use fanclub_core::fetch::{FetchError, Fetcher};

const PREFIX: &str = "sportsfan_cache_";

/// Mock network returning a fixed body per path.
struct MockNetwork {
    clubs: Value,
    calls: AtomicUsize,
}

impl MockNetwork {
    fn new(clubs: Value) -> Self {
        Self {
            clubs,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockNetwork {
    async fn fetch(&self, resource_path: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match resource_path {
            "/api/clubs" => Ok(self.clubs.clone()),
            "/api/users/me" => Ok(json!({"id": "u1", "username": "ultra"})),
            other => Err(FetchError::NotFound {
                resource: other.to_string(),
            }),
        }
    }
}

fn session(storage: &MemoryStorage, network: &Arc<MockNetwork>) -> CacheContext {
    CacheContext::init(
        CacheConfig::default(),
        Arc::new(storage.clone()),
        network.clone(),
    )
}

async fn keys_under_prefix(storage: &MemoryStorage) -> Vec<String> {
    storage
        .keys()
        .await
        .unwrap()
        .into_iter()
        .filter(|key| key.starts_with(PREFIX))
        .collect()
}

#[tokio::test]
async fn cold_read_through_then_hit() {
    let storage = MemoryStorage::new();
    let network = Arc::new(MockNetwork::new(json!([{"id": "9", "name": "Z"}])));
    let context = session(&storage, &network);
    let monitor = context.monitor().unwrap();

    let first = context
        .cache_aside()
        .query(context.queries(), &ResourceKey::ClubList)
        .await
        .unwrap();

    assert_eq!(first, json!([{"id": "9", "name": "Z", "sport": null, "description": null, "member_count": 0}]));
    assert_eq!(network.calls(), 1);
    assert_eq!(monitor.get_logs().len(), 1);
    assert!(monitor.get_logs()[0].is_fetch());
    assert_eq!(context.clubs().get_clubs().await, Some(vec![Club::new("9", "Z")]));

    context
        .cache_aside()
        .query(context.queries(), &ResourceKey::ClubList)
        .await
        .unwrap();

    assert_eq!(network.calls(), 1);
    let logs = monitor.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[1].is_hit());

    let stats = monitor.get_stats(chrono::Duration::seconds(60));
    assert_eq!(stats.hit_ratio, HitRatio::Ratio(0.5));
}

#[tokio::test]
async fn club_deleted_invalidates_everything_it_touches() {
    let storage = MemoryStorage::new();
    let network = Arc::new(MockNetwork::new(json!([{"id": "1", "name": "A"}])));
    let context = session(&storage, &network);

    context
        .cache_aside()
        .query(context.queries(), &ResourceKey::ClubList)
        .await
        .unwrap();
    context
        .chat()
        .add_message("1", &ChatMessage::new("1", "u1", "hello"))
        .await
        .unwrap();

    context
        .coordinator()
        .handle_named("club_deleted", json!({"clubId": "1"}))
        .await
        .unwrap();

    assert_eq!(context.clubs().get_clubs().await, Some(vec![]));
    assert_eq!(context.chat().get_chat_history("1").await, None);
    assert!(context.queries().state("club-list").unwrap().is_invalidated);
}

#[tokio::test]
async fn logout_sweeps_every_namespaced_entry() {
    let storage = MemoryStorage::new();
    storage.set_item("auth_token", "keep-me").await.unwrap();
    let network = Arc::new(MockNetwork::new(json!([])));
    let context = session(&storage, &network);

    context.user().set_user(&User::new("u1", "ultra")).await.unwrap();
    context.clubs().set_clubs(&[Club::new("1", "A")]).await.unwrap();
    context
        .chat()
        .add_message("1", &ChatMessage::new("1", "u1", "a"))
        .await
        .unwrap();
    context
        .chat()
        .add_message("2", &ChatMessage::new("2", "u1", "b"))
        .await
        .unwrap();
    context.queries().set_data("club-list", json!([]));

    context.coordinator().handle_named("logout", Value::Null).await.unwrap();

    assert_eq!(context.user().get_user().await, None);
    assert_eq!(context.clubs().get_clubs().await, None);
    assert_eq!(context.chat().get_chat_history("1").await, None);
    assert_eq!(context.chat().get_chat_history("2").await, None);
    assert!(keys_under_prefix(&storage).await.is_empty());
    assert!(context.queries().is_empty());
    assert_eq!(storage.get_item("auth_token").await.unwrap(), Some("keep-me".into()));
}

#[tokio::test]
async fn add_club_on_cold_cache_starts_list() {
    let storage = MemoryStorage::new();
    let network = Arc::new(MockNetwork::new(json!([])));
    let context = session(&storage, &network);
    let club = Club::new("c", "Cold Start FC");

    assert_eq!(context.clubs().get_clubs().await, None);
    context.clubs().add_club(&club).await.unwrap();

    assert_eq!(context.clubs().get_clubs().await, Some(vec![club]));
}

#[tokio::test]
async fn update_of_absent_club_leaves_list_unchanged() {
    let storage = MemoryStorage::new();
    let network = Arc::new(MockNetwork::new(json!([])));
    let context = session(&storage, &network);
    let clubs = vec![Club::new("1", "A"), Club::new("2", "B")];
    context.clubs().set_clubs(&clubs).await.unwrap();

    context
        .coordinator()
        .handle_named("club_updated", json!({"id": "x", "name": "Ghost"}))
        .await
        .unwrap();

    assert_eq!(context.clubs().get_clubs().await, Some(clubs));
}

#[tokio::test]
async fn expired_entry_is_a_miss_and_physically_removed() {
    let storage = MemoryStorage::new();
    let store = TtlStore::new(Arc::new(storage.clone()), PREFIX, Duration::from_secs(300));

    store
        .set("fixtures", &json!({"round": 1}), Some(Duration::from_millis(40)))
        .await
        .unwrap();
    assert_eq!(store.get::<Value>("fixtures").await, Some(json!({"round": 1})));

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.get::<Value>("fixtures").await, None);
    assert!(!store.has::<Value>("fixtures").await);
    assert!(storage.get_item("sportsfan_cache_fixtures").await.unwrap().is_none());
}

#[tokio::test]
async fn clear_never_touches_foreign_keys() {
    let storage = MemoryStorage::new();
    storage.set_item("theme", "dark").await.unwrap();
    storage.set_item("sportsfan_other_app", "x").await.unwrap();
    let store = TtlStore::new(Arc::new(storage.clone()), PREFIX, Duration::from_secs(300));

    store.set("user", &User::new("u1", "ultra"), None).await.unwrap();
    assert_eq!(storage.get_item("theme").await.unwrap(), Some("dark".into()));

    store.clear().await.unwrap();

    let mut remaining = storage.keys().await.unwrap();
    remaining.sort();
    assert_eq!(remaining, vec!["sportsfan_other_app", "theme"]);
}

#[tokio::test]
async fn monitor_keeps_last_hundred_events() {
    let monitor = CacheMonitor::default();

    for i in 0..150 {
        monitor.log(format!("cache_hit:event_{}", i), None);
    }

    let logs = monitor.get_logs();
    assert_eq!(logs.len(), 100);
    let actions: Vec<_> = logs.iter().map(|e| e.action.clone()).collect();
    let expected: Vec<_> = (50..150).map(|i| format!("cache_hit:event_{}", i)).collect();
    assert_eq!(actions, expected);
}

#[tokio::test]
async fn hit_ratio_without_reads_is_not_applicable() {
    let monitor = CacheMonitor::default();

    let stats = monitor.get_stats(chrono::Duration::seconds(60));

    assert_eq!(stats.total_events, 0);
    assert_eq!(stats.hit_ratio, HitRatio::NotApplicable);
    assert_eq!(stats.hit_ratio.to_string(), "n/a");
}

#[tokio::test]
async fn network_failure_surfaces_through_query_state() {
    let storage = MemoryStorage::new();
    let network = Arc::new(MockNetwork::new(json!([])));
    let context = session(&storage, &network);
    let missing = ResourceKey::chat_history("404");

    let result = context.cache_aside().query(context.queries(), &missing).await;

    assert!(matches!(result, Err(FetchError::NotFound { .. })));
    let state = context.queries().state("chat-history:404").unwrap();
    assert!(state.error.is_some());
    assert!(state.data.is_none());
    assert_eq!(context.chat().get_chat_history("404").await, None);
}
