//! Event-driven invalidation policy.
//!
//! Every domain action that changes cached data goes through
//! [`CacheCoordinator::handle`], which applies the domain cache writes and
//! query invalidations the action requires:
//!
//! | action          | domain caches                          | queries                        |
//! |-----------------|----------------------------------------|--------------------------------|
//! | `club_created`  | add club                               | invalidate clubs               |
//! | `club_updated`  | update club                            | invalidate clubs               |
//! | `club_deleted`  | remove club, clear the room's history  | invalidate clubs, room history |
//! | `message_sent`  | append message to the room's history   | invalidate room history        |
//! | `logout`        | clear every namespaced entry           | clear all                      |

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use fanclub_core::cache::{ActionError, CacheAction, ResourceKey, StorageError};
use fanclub_core::fetch::FetchError;

use crate::domain::{ChatCache, ClubsCache, UserCache};
use crate::fetch::CacheAside;
use crate::monitor::CacheMonitor;
use crate::query::QueryClient;
use crate::TtlStore;

/// Errors from [`CacheCoordinator::handle_named`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Diagnostic snapshot of what is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub user_cached: bool,
    pub clubs_cached: bool,
    /// Rooms whose chat history is live.
    pub chat_rooms_cached: Vec<String>,
    pub query_count: usize,
}

/// What [`CacheCoordinator::warm_cache`] managed to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    pub user: bool,
    pub clubs: bool,
}

/// Sequences domain cache writes and query invalidations per action.
///
/// Owns no state of its own.
#[derive(Clone)]
pub struct CacheCoordinator {
    store: TtlStore,
    user: Arc<UserCache>,
    clubs: Arc<ClubsCache>,
    chat: Arc<ChatCache>,
    queries: Arc<QueryClient>,
    cache_aside: Arc<CacheAside>,
    monitor: Option<Arc<CacheMonitor>>,
}

impl CacheCoordinator {
    pub fn new(
        store: TtlStore,
        user: Arc<UserCache>,
        clubs: Arc<ClubsCache>,
        chat: Arc<ChatCache>,
        queries: Arc<QueryClient>,
        cache_aside: Arc<CacheAside>,
        monitor: Option<Arc<CacheMonitor>>,
    ) -> Self {
        Self {
            store,
            user,
            clubs,
            chat,
            queries,
            cache_aside,
            monitor,
        }
    }

    /// Applies `action` to the caches.
    ///
    /// Query invalidations always happen. If a domain cache write fails, the
    /// affected entry is dropped so the next read goes to the network, and
    /// the write error is returned.
    pub async fn handle(&self, action: &CacheAction) -> Result<(), StorageError> {
        tracing::debug!(action = action.name(), "Handling cache action");
        let clubs_query = ResourceKey::ClubList.query_key();

        match action {
            CacheAction::ClubCreated(club) => {
                let result = self.clubs.add_club(club).await;
                self.queries.invalidate(&clubs_query);
                self.drop_clubs_on_error(result).await
            }
            CacheAction::ClubUpdated(club) => {
                let result = self.clubs.update_club(club).await;
                self.queries.invalidate(&clubs_query);
                self.drop_clubs_on_error(result).await
            }
            CacheAction::ClubDeleted { club_id } => {
                let removed = self.clubs.remove_club(club_id).await;
                let cleared = self.chat.clear_chat_history(club_id).await;
                self.queries.invalidate(&clubs_query);
                self.queries
                    .invalidate(&ResourceKey::chat_history(club_id.as_str()).query_key());
                self.drop_clubs_on_error(removed).await.and(cleared)
            }
            CacheAction::MessageSent { room_id, message } => {
                let result = self.chat.add_message(room_id, message).await;
                self.queries
                    .invalidate(&ResourceKey::chat_history(room_id.as_str()).query_key());
                if result.is_err() {
                    let _ = self.chat.clear_chat_history(room_id).await;
                }
                result
            }
            CacheAction::Logout => self.clear_all().await.map(|_| ()),
        }
    }

    /// Drops every namespaced entry and all query state.
    ///
    /// Returns the number of entries removed. Query state is cleared even
    /// when some entries could not be removed.
    pub async fn clear_all(&self) -> Result<usize, StorageError> {
        let result = self.store.clear().await;
        self.queries.clear();
        match &result {
            Ok(removed) => tracing::info!(removed, "Cache cleared"),
            Err(err) => tracing::warn!(error = %err, "Cache only partially cleared"),
        }
        result
    }

    /// Parses an action from its wire name and payload, then applies it.
    ///
    /// Unknown actions are logged and otherwise ignored. A payload that does
    /// not fit its action is an error.
    pub async fn handle_named(&self, name: &str, payload: Value) -> Result<(), CoordinatorError> {
        match CacheAction::parse(name, payload) {
            Ok(action) => Ok(self.handle(&action).await?),
            Err(ActionError::Unknown(name)) => {
                tracing::warn!(action = %name, "Unknown cache action, ignoring");
                if let Some(monitor) = &self.monitor {
                    monitor.log(format!("unknown_action:{}", name), None);
                }
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Re-fetches the user profile from the network regardless of TTL.
    pub async fn refresh_user_data(&self) -> Result<Value, FetchError> {
        if let Err(err) = self.user.clear_user().await {
            tracing::warn!(error = %err, "Failed to drop cached user before refresh");
        }
        self.refresh(ResourceKey::UserProfile).await
    }

    /// Re-fetches the club list from the network regardless of TTL.
    pub async fn refresh_clubs_data(&self) -> Result<Value, FetchError> {
        if let Err(err) = self.clubs.clear_clubs().await {
            tracing::warn!(error = %err, "Failed to drop cached clubs before refresh");
        }
        self.refresh(ResourceKey::ClubList).await
    }

    async fn refresh(&self, resource: ResourceKey) -> Result<Value, FetchError> {
        self.queries.invalidate(&resource.query_key());
        self.cache_aside.query(&self.queries, &resource).await
    }

    /// Reports what is currently cached. Evicts nothing.
    pub async fn get_cache_status(&self) -> CacheStatus {
        let rooms = self.chat.cached_rooms().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to list cached chat rooms");
            Vec::new()
        });

        let mut chat_rooms_cached = Vec::with_capacity(rooms.len());
        for room in rooms {
            if self.chat.is_cached(&room).await {
                chat_rooms_cached.push(room);
            }
        }

        CacheStatus {
            user_cached: self.user.is_cached().await,
            clubs_cached: self.clubs.is_cached().await,
            chat_rooms_cached,
            query_count: self.queries.len(),
        }
    }

    /// Loads the user profile and club list ahead of need.
    ///
    /// Failures are logged and reported as `false`, never returned.
    pub async fn warm_cache(&self) -> WarmReport {
        let (user, clubs) = tokio::join!(
            self.cache_aside.query(&self.queries, &ResourceKey::UserProfile),
            self.cache_aside.query(&self.queries, &ResourceKey::ClubList),
        );

        let report = WarmReport {
            user: warmed("user-profile", user),
            clubs: warmed("club-list", clubs),
        };
        tracing::info!(user = report.user, clubs = report.clubs, "Cache warmed");
        report
    }

    async fn drop_clubs_on_error(&self, result: Result<(), StorageError>) -> Result<(), StorageError> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Club list write failed, dropping cached list");
            let _ = self.clubs.clear_clubs().await;
        }
        result
    }
}

fn warmed(resource: &str, result: Result<Value, FetchError>) -> bool {
    match result {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(resource, error = %err, "Cache warm failed");
            false
        }
    }
}
