//! Distributed Cache - an embeddable in-memory key-value cache
//!
//! Bounded capacity, per-entry TTL with lazy expiry, and an eviction policy
//! (LRU or LFU) fixed at construction. Runs inside the host process only:
//! no network layer, no persistence.

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod tasks;

pub use cache::{Cache, CacheEntry, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
pub use policy::{EvictionPolicy, LfuPolicy, LruPolicy, PolicyKind};
pub use tasks::spawn_cleanup_task;
