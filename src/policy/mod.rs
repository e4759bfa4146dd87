//! Eviction Policy Module
//!
//! Defines the contract every eviction strategy satisfies and builds the
//! concrete strategy selected at cache construction.
//!
//! # Policies
//! - LRU: evicts the least recently touched entry
//! - LFU: evicts the entry with the lowest access count

mod lfu;
mod lru;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{CacheError, Result};

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;

// == Eviction Policy ==
/// Tracks entries and decides which one leaves when the cache is full.
///
/// Policies only touch their own structures. The owning cache keeps its map
/// and the policy's tracked key set identical, and calls every method while
/// holding its lock, so implementors need `Send` but not internal locking.
pub trait EvictionPolicy<K, V>: Send {
    /// Starts tracking `key`, or refreshes it (new value, promoted priority)
    /// when it is already tracked.
    fn add(&mut self, key: K, value: V);

    /// Records a read hit. Same effect as `add` on a tracked key; ignored
    /// for keys the policy does not track.
    fn record_access(&mut self, key: &K, value: V);

    /// Removes and returns the current victim, or `None` when empty.
    fn evict(&mut self) -> Option<(K, V)>;

    /// Stops tracking `key`, returning its value if it was tracked.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns true if `key` is tracked.
    fn contains(&self, key: &K) -> bool;

    /// Number of tracked entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every tracked entry.
    fn clear(&mut self);

    /// Which strategy this is.
    fn kind(&self) -> PolicyKind;
}

// == Policy Kind ==
/// The eviction strategies a cache can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
}

impl PolicyKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu => "lfu",
        }
    }

    /// Builds a fresh, empty policy of this kind.
    pub fn build<K, V>(self) -> Box<dyn EvictionPolicy<K, V>>
    where
        K: Hash + Eq + Clone + Send + 'static,
        V: Send + 'static,
    {
        match self {
            PolicyKind::Lru => Box::new(LruPolicy::new()),
            PolicyKind::Lfu => Box::new(LfuPolicy::new()),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
