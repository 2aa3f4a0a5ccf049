//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::duration_ms;

// == Defaults ==
/// Default entry TTL: 30 minutes
pub const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;
/// Default byte budget: 100 MB
pub const DEFAULT_MAX_SIZE_BYTES: usize = 100 * 1024 * 1024;
/// Default entry-count bound
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
/// Default sweep interval: 5 minutes
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 5 * 60 * 1000;
/// Default compression threshold: 1 KB
pub const DEFAULT_COMPRESSION_THRESHOLD_BYTES: usize = 1024;
/// Default admin server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// == Cache Config ==
/// Constructor-time parameters of a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Default TTL in milliseconds for entries without explicit TTL
    pub ttl_ms: u64,
    /// Byte budget over all stored payloads
    pub max_size_bytes: usize,
    /// Maximum number of entries the cache can hold (at least 1)
    pub max_entries: usize,
    /// Background sweep interval in milliseconds, 0 disables the sweep
    pub cleanup_interval_ms: u64,
    /// Whether large payloads are gzip-compressed before storage
    pub compression_enabled: bool,
    /// Payloads strictly larger than this are compression candidates
    pub compression_threshold_bytes: usize,
}

impl CacheConfig {
    /// Loads cache parameters from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` (default: 1800000)
    /// - `CACHE_MAX_SIZE_BYTES` (default: 104857600)
    /// - `CACHE_MAX_ENTRIES` (default: 10000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` (default: 300000)
    /// - `CACHE_COMPRESSION_ENABLED` (default: true)
    /// - `CACHE_COMPRESSION_THRESHOLD_BYTES` (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            max_size_bytes: env_or("CACHE_MAX_SIZE_BYTES", defaults.max_size_bytes),
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries).max(1),
            cleanup_interval_ms: env_or("CACHE_CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            compression_enabled: env_or("CACHE_COMPRESSION_ENABLED", defaults.compression_enabled),
            compression_threshold_bytes: env_or(
                "CACHE_COMPRESSION_THRESHOLD_BYTES",
                defaults.compression_threshold_bytes,
            ),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = duration_ms(ttl);
        self
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_ms = duration_ms(interval);
        self
    }

    pub fn with_compression(mut self, enabled: bool, threshold_bytes: usize) -> Self {
        self.compression_enabled = enabled;
        self.compression_threshold_bytes = threshold_bytes;
        self
    }

    /// Sweep interval, or None when the sweep is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_ms > 0).then(|| Duration::from_millis(self.cleanup_interval_ms))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval_ms: DEFAULT_CLEANUP_INTERVAL_MS,
            compression_enabled: true,
            compression_threshold_bytes: DEFAULT_COMPRESSION_THRESHOLD_BYTES,
        }
    }
}

// == Server Config ==
/// Process configuration: the cache parameters plus the admin server port.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// `SERVER_PORT` defaults to 3000; cache variables are documented on
    /// [`CacheConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl_ms, 1_800_000);
        assert_eq!(config.max_size_bytes, 104_857_600);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.cleanup_interval_ms, 300_000);
        assert!(config.compression_enabled);
        assert_eq!(config.compression_threshold_bytes, 1024);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_TTL_MS",
            "CACHE_MAX_SIZE_BYTES",
            "CACHE_MAX_ENTRIES",
            "CACHE_CLEANUP_INTERVAL_MS",
            "CACHE_COMPRESSION_ENABLED",
            "CACHE_COMPRESSION_THRESHOLD_BYTES",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_default_matches_env_default_port() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_builder_saturates_huge_durations() {
        let huge = Duration::from_secs(18_446_744_073_709_552);
        let config = CacheConfig::default()
            .with_ttl(huge)
            .with_cleanup_interval(huge);

        assert_eq!(config.ttl_ms, u64::MAX);
        assert_eq!(config.cleanup_interval_ms, u64::MAX);

        let config = CacheConfig::default().with_ttl(Duration::from_millis(1500));
        assert_eq!(config.ttl_ms, 1500);
    }

    #[test]
    fn test_builder_clamps_max_entries() {
        let config = CacheConfig::default().with_max_entries(0);
        assert_eq!(config.max_entries, 1);
    }

    #[test]
    fn test_cleanup_interval_disabled_at_zero() {
        let config = CacheConfig::default().with_cleanup_interval(Duration::ZERO);
        assert!(config.cleanup_interval().is_none());

        let config = CacheConfig::default().with_cleanup_interval(Duration::from_secs(2));
        assert_eq!(config.cleanup_interval(), Some(Duration::from_secs(2)));
    }
}
