//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and policy-driven eviction.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::Cache;
