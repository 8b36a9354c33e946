//! fanclub_cache - the client-side cache subsystem.
//!
//! Reads flow consumer -> [`QueryClient`] -> [`CacheAside`] -> domain cache
//! -> [`TtlStore`], falling through to the network on a miss. Writes flow
//! domain action -> [`CacheCoordinator`] -> domain cache and query
//! invalidation. [`CacheContext`] wires one session's worth of these
//! together.

pub mod config;
pub mod context;
pub mod coordinator;
pub mod domain;
pub mod fetch;
pub mod monitor;
pub mod query;
pub mod storage;
pub mod store;
pub mod sweep;

pub use config::CacheConfig;
pub use context::CacheContext;
pub use coordinator::{CacheCoordinator, CacheStatus, CoordinatorError, WarmReport};
pub use domain::{ChatCache, ClubsCache, UserCache};
pub use fetch::CacheAside;
pub use monitor::CacheMonitor;
pub use query::{QueryClient, QueryEvent, QueryState};
pub use store::TtlStore;
pub use sweep::spawn_sweeper;
