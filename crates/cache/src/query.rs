//! Reactive query layer.
//!
//! Tracks per-key loading/error/data state for resources, de-duplicates
//! concurrent fetches of the same key, and broadcasts state changes to
//! subscribers. The fetcher plugged into a query is usually the cache-aside
//! layer, so a query re-run is cheap while the domain cache is warm.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::sync::broadcast;

use fanclub_core::fetch::{FetchError, Result};

/// Channel capacity for query events.
const CHANNEL_CAPACITY: usize = 100;

type InFlight = Shared<BoxFuture<'static, Result<Value>>>;

/// Observable state of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub data: Option<Value>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    /// Set by an invalidation; cleared by the next successful fetch.
    pub is_invalidated: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueryState {
    fn is_fresh(&self, stale_time: Duration, now: DateTime<Utc>) -> bool {
        if self.is_invalidated || self.data.is_none() {
            return false;
        }
        let Some(updated_at) = self.updated_at else {
            return false;
        };
        let age = (now - updated_at).to_std().unwrap_or(Duration::ZERO);
        age < stale_time
    }
}

/// A change to query state, delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    Loading { key: String },
    Updated { key: String },
    Failed { key: String, error: FetchError },
    Invalidated { key: String },
    Cleared,
}

#[derive(Default)]
struct Queries {
    states: HashMap<String, QueryState>,
    /// Running fetch per key, tagged with the generation that started it.
    in_flight: HashMap<String, (u64, InFlight)>,
}

/// Per-key query state with in-flight de-duplication.
pub struct QueryClient {
    queries: Mutex<Queries>,
    events: broadcast::Sender<QueryEvent>,
    stale_time: Duration,
    generation: AtomicU64,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl QueryClient {
    /// Creates a client that serves query data without re-fetching for
    /// `stale_time` after it was updated. `Duration::ZERO` always re-fetches.
    pub fn new(stale_time: Duration) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            queries: Mutex::new(Queries::default()),
            events,
            stale_time,
            generation: AtomicU64::new(0),
        }
    }

    /// Resolves `key`, running `fetcher` unless fresh data or an identical
    /// in-flight request already exists.
    ///
    /// Callers that arrive while a fetch for `key` is running share its
    /// outcome instead of starting another one. Errors are recorded in the
    /// query state and returned; they never replace previously fetched data.
    pub async fn fetch_query<F, Fut>(&self, key: &str, fetcher: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let (generation, future) = {
            let mut queries = self.lock();

            if let Some(data) = queries
                .states
                .get(key)
                .filter(|state| state.is_fresh(self.stale_time, Utc::now()))
                .and_then(|state| state.data.clone())
            {
                tracing::trace!(key, "Query fresh, serving stored data");
                return Ok(data);
            }

            if let Some((generation, future)) = queries.in_flight.get(key) {
                tracing::trace!(key, "Joining in-flight query");
                (*generation, future.clone())
            } else {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst);
                let future = fetcher().boxed().shared();
                queries
                    .in_flight
                    .insert(key.to_string(), (generation, future.clone()));
                queries.states.entry(key.to_string()).or_default().is_loading = true;
                self.emit(QueryEvent::Loading {
                    key: key.to_string(),
                });
                (generation, future)
            }
        };

        let result = future.await;
        self.settle(key, generation, &result);
        result
    }

    /// Records the outcome of a fetch, unless it was superseded by an
    /// invalidation or a clear while it ran.
    fn settle(&self, key: &str, generation: u64, result: &Result<Value>) {
        let mut queries = self.lock();

        match queries.in_flight.get(key) {
            Some((current, _)) if *current == generation => {
                queries.in_flight.remove(key);
            }
            _ => return,
        }

        let state = queries.states.entry(key.to_string()).or_default();
        state.is_loading = false;

        let event = match result {
            Ok(data) => {
                state.data = Some(data.clone());
                state.error = None;
                state.is_invalidated = false;
                state.updated_at = Some(Utc::now());
                tracing::debug!(key, "Query updated");
                QueryEvent::Updated {
                    key: key.to_string(),
                }
            }
            Err(error) => {
                state.error = Some(error.clone());
                tracing::debug!(key, error = %error, "Query failed");
                QueryEvent::Failed {
                    key: key.to_string(),
                    error: error.clone(),
                }
            }
        };
        drop(queries);
        self.emit(event);
    }

    /// Marks `key` as stale so the next `fetch_query` re-runs its fetcher.
    ///
    /// A fetch already running for `key` is detached: callers waiting on it
    /// still get its result, but it no longer updates the query state.
    pub fn invalidate(&self, key: &str) {
        {
            let mut queries = self.lock();
            queries.in_flight.remove(key);
            if let Some(state) = queries.states.get_mut(key) {
                state.is_invalidated = true;
                state.is_loading = false;
            }
        }
        tracing::debug!(key, "Query invalidated");
        self.emit(QueryEvent::Invalidated {
            key: key.to_string(),
        });
    }

    /// Marks every known query as stale.
    pub fn invalidate_all(&self) {
        for key in self.keys() {
            self.invalidate(&key);
        }
    }

    /// Stores `data` for `key` as if it had just been fetched.
    pub fn set_data(&self, key: &str, data: Value) {
        {
            let mut queries = self.lock();
            queries.in_flight.remove(key);
            let state = queries.states.entry(key.to_string()).or_default();
            state.data = Some(data);
            state.error = None;
            state.is_loading = false;
            state.is_invalidated = false;
            state.updated_at = Some(Utc::now());
        }
        self.emit(QueryEvent::Updated {
            key: key.to_string(),
        });
    }

    pub fn state(&self, key: &str) -> Option<QueryState> {
        self.lock().states.get(key).cloned()
    }

    /// Returns the keys of every known query, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().states.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of queries with state.
    pub fn len(&self) -> usize {
        self.lock().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all query state and detaches running fetches.
    pub fn clear(&self) {
        {
            let mut queries = self.lock();
            queries.states.clear();
            queries.in_flight.clear();
        }
        tracing::debug!("Query state cleared");
        self.emit(QueryEvent::Cleared);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: QueryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Queries> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
