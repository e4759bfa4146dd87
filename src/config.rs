//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};
use crate::policy::PolicyKind;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Eviction strategy
    pub policy: PolicyKind,
    /// TTL applied when a caller does not pick one
    pub default_ttl: Duration,
    /// Interval between background expiry sweeps
    pub cleanup_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `EVICTION_POLICY` - `lru` or `lfu` (default: lru)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CLEANUP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    ///
    /// # Errors
    /// An unknown policy name or a value that does not parse is fatal.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let capacity = read_number("CACHE_CAPACITY")?.unwrap_or(defaults.capacity);
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            capacity,
            policy: env::var("EVICTION_POLICY")
                .ok()
                .map(|raw| raw.parse::<PolicyKind>())
                .transpose()?
                .unwrap_or(defaults.policy),
            default_ttl: read_number("DEFAULT_TTL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            cleanup_interval: read_number("CLEANUP_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.cleanup_interval),
        })
    }
}

/// Parses `name` if set. Unset is `Ok(None)`, set-but-invalid is an error.
fn read_number<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{name}={raw}"))),
        Err(_) => Ok(None),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: PolicyKind::Lru,
            default_ttl: Duration::from_secs(300),
            cleanup_interval: Duration::from_secs(1),
        }
    }
}
