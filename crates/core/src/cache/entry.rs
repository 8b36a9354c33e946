//! The envelope every cached value is persisted in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A cached value together with the metadata needed to judge its liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Schema version of `data` at write time.
    pub version: u32,
    /// Write time in milliseconds since the Unix epoch.
    pub written_at: i64,
    /// Time-to-live in milliseconds.
    pub ttl_ms: u64,
    pub data: T,
}

impl<T> CacheEntry<T> {
    /// Creates a new entry written at `now_ms`.
    pub fn new(data: T, version: u32, now_ms: i64, ttl: Duration) -> Self {
        Self {
            version,
            written_at: now_ms,
            ttl_ms: duration_to_ms(ttl),
            data,
        }
    }

    /// Returns true if the entry may still be served at `now_ms`.
    pub fn is_live(&self, now_ms: i64) -> bool {
        is_live(self.written_at, self.ttl_ms, now_ms)
    }

    /// Returns the TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// An entry is live iff `now - written_at <= ttl`.
///
/// A write time in the future (clock moved backwards) counts as age zero.
///
/// # Examples
///
/// ```
/// use fanclub_core::cache::is_live;
///
/// assert!(is_live(1_000, 500, 1_500));
/// assert!(!is_live(1_000, 500, 1_501));
/// ```
pub fn is_live(written_at: i64, ttl_ms: u64, now_ms: i64) -> bool {
    let age = now_ms.saturating_sub(written_at).max(0) as u64;
    age <= ttl_ms
}

fn duration_to_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
