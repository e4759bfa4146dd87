//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a pluggable eviction
//! policy and lazy TTL expiration, all behind one exclusive lock.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::policy::{EvictionPolicy, PolicyKind};

// == Cache Inner ==
/// Everything the lock protects: the map, the policy and the counters.
///
/// `data` and `policy` always track the same key set.
struct CacheInner<K, V> {
    data: HashMap<K, CacheEntry<V>>,
    policy: Box<dyn EvictionPolicy<K, V>>,
    stats: CacheStats,
}

impl<K: Hash + Eq, V> CacheInner<K, V> {
    fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let entry = self.data.remove(key)?;
        self.policy.remove(key);
        Some(entry)
    }

    fn evict_one(&mut self) -> bool {
        match self.policy.evict() {
            Some((key, _)) => {
                self.data.remove(&key);
                self.stats.record_eviction();
                true
            }
            None => false,
        }
    }

    fn sync_len(&mut self) {
        self.stats.set_total_entries(self.data.len());
    }
}

// == Cache ==
/// Thread-safe bounded cache with TTL expiration and LRU or LFU eviction.
///
/// Every operation, reads included, takes the same exclusive lock: a hit
/// reorders the policy and a read of an expired entry deletes it.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use distributed_cache::{Cache, PolicyKind};
///
/// let cache = Cache::new(2, Duration::from_secs(1), PolicyKind::Lru).unwrap();
/// cache.set("a", 1, Duration::from_secs(60));
/// assert_eq!(cache.get(&"a"), Some(1));
/// assert!(cache.delete(&"a"));
/// assert_eq!(cache.get(&"a"), None);
/// ```
pub struct Cache<K, V> {
    inner: Mutex<CacheInner<K, V>>,
    capacity: usize,
    cleanup_interval: Duration,
    kind: PolicyKind,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, evicting with
    /// the `kind` policy for its whole lifetime.
    ///
    /// `cleanup_interval` is only recorded here. Expiry stays lazy unless
    /// the cache is handed to [`spawn_cleanup_task`](crate::spawn_cleanup_task).
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize, cleanup_interval: Duration, kind: PolicyKind) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        info!(capacity, policy = %kind, ?cleanup_interval, "Cache created");

        Ok(Self {
            inner: Mutex::new(CacheInner {
                data: HashMap::new(),
                policy: kind.build(),
                stats: CacheStats::new(),
            }),
            capacity,
            cleanup_interval,
            kind,
        })
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.capacity, config.cleanup_interval, config.policy)
    }

    // == Set ==
    /// Stores a key-value pair that expires `ttl` from now.
    ///
    /// Overwriting an existing key replaces its value, restarts its TTL and
    /// refreshes its recency or frequency. Inserting a new key into a full
    /// cache first evicts exactly one victim chosen by the policy.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.data.contains_key(&key) && inner.data.len() >= self.capacity {
            let evicted = inner.evict_one();
            debug_assert!(evicted, "full cache with an empty policy");
            debug!(policy = %self.kind, "Evicted entry to stay within capacity");
        }

        inner
            .data
            .insert(key.clone(), CacheEntry::new(value.clone(), ttl));
        inner.policy.add(key, value);
        inner.sync_len();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None for absent keys and for expired ones; an expired entry
    /// is removed from both the map and the policy. A hit counts as an
    /// access for the policy but does not extend the TTL.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let live = match inner.data.get(key) {
            None => {
                inner.stats.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired_at(now) => None,
            Some(entry) => Some(entry.value.clone()),
        };

        let Some(value) = live else {
            inner.remove(key);
            inner.stats.record_expirations(1);
            inner.stats.record_miss();
            inner.sync_len();
            debug!("Dropped expired entry on read");
            return None;
        };

        inner.policy.record_access(key, value.clone());
        inner.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it was present.
    pub fn delete(&self, key: &K) -> bool {
        let mut inner = self.inner.lock();
        let existed = inner.remove(key).is_some();
        inner.sync_len();
        existed
    }

    // == Contains ==
    /// Returns true if `key` holds a live entry. Does not count as an
    /// access and leaves expired entries for the next read or sweep.
    pub fn contains(&self, key: &K) -> bool {
        let inner = self.inner.lock();
        inner
            .data
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Time To Live ==
    /// Returns how long `key` has left to live, None if absent or expired.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let inner = self.inner.lock();
        let entry = inner.data.get(key).filter(|e| !e.is_expired())?;
        Some(entry.ttl_remaining().unwrap_or(Duration::MAX))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let expired_keys: Vec<K> = inner
            .data
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.remove(key);
        }

        inner.stats.record_expirations(expired_keys.len());
        inner.sync_len();
        expired_keys.len()
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.data.clear();
        inner.policy.clear();
        inner.sync_len();
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.data.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are read or swept.
    pub fn len(&self) -> usize {
        self.inner.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.kind
    }

    /// The sweep interval this cache was configured with.
    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    /// Panics if the map and the policy have drifted apart.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.lock();
        assert!(inner.data.len() <= self.capacity, "over capacity");
        assert_eq!(inner.data.len(), inner.policy.len(), "map/policy size mismatch");
        for key in inner.data.keys() {
            assert!(inner.policy.contains(key), "key missing from policy");
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("policy", &self.kind)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("len", &self.inner.lock().data.len())
            .finish()
    }
}
