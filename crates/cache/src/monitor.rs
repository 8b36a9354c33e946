//! Bounded log of cache activity with derived hit/miss statistics.
//!
//! The monitor only observes. Nothing in the cache reads it back, so it can
//! be disabled without changing cache behavior.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{Duration, Utc};

use fanclub_core::cache::{compute_stats, CacheStats, MonitorEvent};

/// Default number of events kept.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default statistics window.
pub fn default_stats_window() -> Duration {
    Duration::seconds(60)
}

/// Ring buffer of [`MonitorEvent`]s, oldest first.
#[derive(Debug)]
pub struct CacheMonitor {
    events: RwLock<VecDeque<MonitorEvent>>,
    capacity: usize,
}

impl Default for CacheMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl CacheMonitor {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an event, dropping the oldest ones beyond capacity.
    pub fn log(&self, action: impl Into<String>, data: Option<serde_json::Value>) {
        let event = MonitorEvent::new(action, data);
        tracing::trace!(action = %event.action, "Monitor event");

        if let Ok(mut events) = self.events.write() {
            events.push_back(event);

            while events.len() > self.capacity {
                events.pop_front();
            }
        }
    }

    /// Returns a copy of the recorded events, oldest first.
    pub fn get_logs(&self) -> Vec<MonitorEvent> {
        self.events
            .read()
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Summarizes the events recorded within `window` of now.
    pub fn get_stats(&self, window: Duration) -> CacheStats {
        let events = self.get_logs();
        compute_stats(&events, Utc::now(), window)
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
