use std::{env, time::Duration};

use fanclub_core::cache::DEFAULT_PREFIX;

/// Cache subsystem configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Namespace prefix for every stored key (default: "sportsfan_cache_")
    pub prefix: String,
    /// TTL used when a caller does not pass one, in seconds (default: 300)
    pub default_ttl_seconds: u64,
    /// User profile TTL in seconds (default: 900)
    pub user_ttl_seconds: u64,
    /// Club list TTL in seconds (default: 600)
    pub clubs_ttl_seconds: u64,
    /// Per-room chat history TTL in seconds (default: 1,800)
    pub chat_ttl_seconds: u64,
    /// Monitor ring buffer capacity (default: 100)
    pub monitor_capacity: usize,
    /// Whether cache activity is recorded at all (default: true)
    pub monitor_enabled: bool,
    /// Interval of the background sweep of dead entries (default: disabled)
    pub sweep_interval_seconds: Option<u64>,
    /// How long query data is served without re-running its fetcher (default: 0)
    pub query_stale_seconds: u64,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FANCLUB_CACHE_PREFIX` - Key namespace (default: "sportsfan_cache_", also used when blank)
    /// - `CACHE_DEFAULT_TTL_SECONDS` - Default TTL (default: 300)
    /// - `CACHE_USER_TTL_SECONDS` - User profile TTL (default: 900)
    /// - `CACHE_CLUBS_TTL_SECONDS` - Club list TTL (default: 600)
    /// - `CACHE_CHAT_TTL_SECONDS` - Chat history TTL (default: 1,800)
    /// - `CACHE_MONITOR_CAPACITY` - Monitor buffer size (default: 100)
    /// - `CACHE_MONITOR_ENABLED` - "false" or "0" disables the monitor
    /// - `CACHE_SWEEP_INTERVAL_SECONDS` - Sweep interval (default: unset)
    /// - `QUERY_STALE_SECONDS` - Query freshness window (default: 0)
    pub fn from_env() -> Self {
        Self {
            prefix: prefix_or_default(env::var("FANCLUB_CACHE_PREFIX").ok()),
            default_ttl_seconds: parse_env("CACHE_DEFAULT_TTL_SECONDS").unwrap_or(300),
            user_ttl_seconds: parse_env("CACHE_USER_TTL_SECONDS").unwrap_or(900),
            clubs_ttl_seconds: parse_env("CACHE_CLUBS_TTL_SECONDS").unwrap_or(600),
            chat_ttl_seconds: parse_env("CACHE_CHAT_TTL_SECONDS").unwrap_or(1_800),
            monitor_capacity: parse_env("CACHE_MONITOR_CAPACITY").unwrap_or(100),
            monitor_enabled: env::var("CACHE_MONITOR_ENABLED")
                .map(|v| !matches!(v.trim(), "0" | "false" | "FALSE" | "no"))
                .unwrap_or(true),
            sweep_interval_seconds: parse_env("CACHE_SWEEP_INTERVAL_SECONDS")
                .filter(|secs| *secs > 0),
            query_stale_seconds: parse_env("QUERY_STALE_SECONDS").unwrap_or(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    pub fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_seconds)
    }

    pub fn clubs_ttl(&self) -> Duration {
        Duration::from_secs(self.clubs_ttl_seconds)
    }

    pub fn chat_ttl(&self) -> Duration {
        Duration::from_secs(self.chat_ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_seconds.map(Duration::from_secs)
    }

    pub fn query_stale_time(&self) -> Duration {
        Duration::from_secs(self.query_stale_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            default_ttl_seconds: 300,
            user_ttl_seconds: 900,
            clubs_ttl_seconds: 600,
            chat_ttl_seconds: 1_800,
            monitor_capacity: 100,
            monitor_enabled: true,
            sweep_interval_seconds: None,
            query_stale_seconds: 0,
        }
    }
}

/// A blank prefix would put every key of the shared medium in the namespace.
fn prefix_or_default(prefix: Option<String>) -> String {
    prefix
        .filter(|prefix| !prefix.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_conversions() {
        let config = CacheConfig {
            user_ttl_seconds: 60,
            clubs_ttl_seconds: 30,
            chat_ttl_seconds: 10,
            sweep_interval_seconds: Some(5),
            ..CacheConfig::default()
        };

        assert_eq!(config.user_ttl(), Duration::from_secs(60));
        assert_eq!(config.clubs_ttl(), Duration::from_secs(30));
        assert_eq!(config.chat_ttl(), Duration::from_secs(10));
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_default_values() {
        let config = CacheConfig::default();

        assert_eq!(config.prefix, "sportsfan_cache_");
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.user_ttl(), Duration::from_secs(15 * 60));
        assert_eq!(config.clubs_ttl(), Duration::from_secs(10 * 60));
        assert_eq!(config.chat_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(config.monitor_capacity, 100);
        assert!(config.monitor_enabled);
        assert_eq!(config.sweep_interval(), None);
        assert_eq!(config.query_stale_time(), Duration::ZERO);
    }

    #[test]
    fn test_blank_prefix_falls_back_to_default() {
        assert_eq!(prefix_or_default(None), DEFAULT_PREFIX);
        assert_eq!(prefix_or_default(Some(String::new())), DEFAULT_PREFIX);
        assert_eq!(prefix_or_default(Some("  ".to_string())), DEFAULT_PREFIX);
        assert_eq!(prefix_or_default(Some("club_".to_string())), "club_");
    }
}
