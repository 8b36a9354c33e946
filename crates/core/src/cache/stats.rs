//! Monitor event types and pure statistics over them.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Marker contained in the action label of every cache hit event.
pub const HIT_MARKER: &str = "cache_hit";
/// Marker contained in the action label of every network fetch event.
pub const FETCH_MARKER: &str = "network_fetch";

/// One recorded cache activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorEvent {
    pub action: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MonitorEvent {
    pub fn new(action: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            action: action.into(),
            at: Utc::now(),
            data,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.action.contains(HIT_MARKER)
    }

    pub fn is_fetch(&self) -> bool {
        self.action.contains(FETCH_MARKER)
    }
}

/// Returns the action label recorded for a cache hit on `key`.
pub fn hit_action(key: &str) -> String {
    format!("{}:{}", HIT_MARKER, key)
}

/// Returns the action label recorded for a network fetch of `key`.
pub fn fetch_action(key: &str) -> String {
    format!("{}:{}", FETCH_MARKER, key)
}

/// Share of reads served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitRatio {
    Ratio(f64),
    /// No hit or fetch happened in the window.
    NotApplicable,
}

impl HitRatio {
    /// Computes `hits / (hits + misses)`.
    pub fn from_counts(hits: usize, misses: usize) -> Self {
        let total = hits + misses;
        if total == 0 {
            Self::NotApplicable
        } else {
            Self::Ratio(hits as f64 / total as f64)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Ratio(ratio) => Some(*ratio),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for HitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(ratio) => write!(f, "{:.1}%", ratio * 100.0),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Summary of cache activity within a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub window_ms: i64,
    /// Events of any kind inside the window.
    pub total_events: usize,
    pub hits: usize,
    /// Network fetches, i.e. cache misses.
    pub misses: usize,
    pub hit_ratio: HitRatio,
}

/// Computes statistics over the events recorded within `window` of `now`.
///
/// A window reaching past the earliest representable time covers every event.
pub fn compute_stats<'a, I>(events: I, now: DateTime<Utc>, window: Duration) -> CacheStats
where
    I: IntoIterator<Item = &'a MonitorEvent>,
{
    let cutoff = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut total_events = 0;
    let mut hits = 0;
    let mut misses = 0;

    for event in events.into_iter().filter(|e| e.at >= cutoff) {
        total_events += 1;
        if event.is_hit() {
            hits += 1;
        } else if event.is_fetch() {
            misses += 1;
        }
    }

    CacheStats {
        window_ms: window.num_milliseconds(),
        total_events,
        hits,
        misses,
        hit_ratio: HitRatio::from_counts(hits, misses),
    }
}
