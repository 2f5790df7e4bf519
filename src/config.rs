//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Expiry in seconds for writes that carry none, 0 = never expire
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default expiry in seconds, 0 disables it (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Expiry applied to writes without one, if configured.
    pub fn default_expiry(&self) -> Option<Duration> {
        (self.default_ttl > 0).then(|| Duration::from_secs(self.default_ttl))
    }

    /// Period of the background expiry sweep. Never shorter than one second.
    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 0,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, 0);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.default_expiry(), None);
    }

    #[test]
    fn test_default_expiry_from_ttl() {
        let config = Config {
            default_ttl: 30,
            ..Config::default()
        };
        assert_eq!(config.default_expiry(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_huge_default_ttl_does_not_break_writes() {
        let config = Config {
            default_ttl: u64::MAX,
            ..Config::default()
        };
        let mut store = CacheStore::new(config.max_entries, config.default_expiry());

        assert!(store.set("k".to_string(), "1".to_string(), None).unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_cleanup_period_floor() {
        let config = Config {
            cleanup_interval: 0,
            ..Config::default()
        };
        assert_eq!(config.cleanup_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("CACHE_CONTRACT_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("CACHE_CONTRACT_TEST_GARBAGE", 7u64), 7);
        env::remove_var("CACHE_CONTRACT_TEST_GARBAGE");
        assert_eq!(env_or("CACHE_CONTRACT_TEST_UNSET", 9u16), 9);
    }
}
