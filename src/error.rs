//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Misses and capacity
//! evictions are not errors; only configuration problems surface here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Eviction policy name is neither LRU nor LFU
    #[error("Unknown eviction policy: {0}")]
    UnknownPolicy(String),

    /// Capacity must be a positive integer
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
