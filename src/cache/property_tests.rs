//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against small reference models.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::Cache;
use crate::policy::PolicyKind;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Keys drawn from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

fn kind_strategy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![Just(PolicyKind::Lru), Just(PolicyKind::Lfu)]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn new_cache(capacity: usize, kind: PolicyKind) -> Cache<String, u32> {
    Cache::new(capacity, Duration::from_secs(1), kind).unwrap()
}

// == Reference Models ==
/// Recency list, front = least recently used.
#[derive(Default)]
struct LruModel {
    order: Vec<(String, u32)>,
}

impl LruModel {
    fn set(&mut self, capacity: usize, key: String, value: u32) {
        if let Some(pos) = self.order.iter().position(|(k, _)| *k == key) {
            self.order.remove(pos);
        } else if self.order.len() >= capacity {
            self.order.remove(0);
        }
        self.order.push((key, value));
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        let entry = self.order.remove(pos);
        let value = entry.1;
        self.order.push(entry);
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.order.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Frequency table; victim is the lowest (frequency, insertion seq).
#[derive(Default)]
struct LfuModel {
    entries: HashMap<String, (u32, u64, u64)>,
    next_seq: u64,
}

impl LfuModel {
    fn set(&mut self, capacity: usize, key: String, value: u32) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.0 = value;
            entry.1 += 1;
            return;
        }
        if self.entries.len() >= capacity {
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, (_, freq, seq))| (*freq, *seq))
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(key, (value, 1, self.next_seq));
        self.next_seq += 1;
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let entry = self.entries.get_mut(key)?;
        entry.1 += 1;
        Some(entry.0)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the cache never exceeds capacity and
    // the map and the policy track exactly the same keys.
    #[test]
    fn prop_capacity_and_key_set_invariant(
        kind in kind_strategy(),
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = new_cache(capacity, kind);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, TEST_TTL),
                CacheOp::Get { key } => { cache.get(&key); }
                CacheOp::Delete { key } => { cache.delete(&key); }
            }
            prop_assert!(cache.len() <= capacity);
            cache.assert_consistent();
        }
    }

    // LRU eviction picks the same victims as a plain recency list.
    #[test]
    fn prop_lru_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = new_cache(capacity, PolicyKind::Lru);
        let mut model = LruModel::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value, TEST_TTL);
                    model.set(capacity, key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key), "get {}", key);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(cache.delete(&key), model.delete(&key), "delete {}", key);
                }
            }
            prop_assert_eq!(cache.len(), model.order.len());
        }
    }

    // LFU eviction picks the same victims as a brute-force frequency scan.
    #[test]
    fn prop_lfu_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = new_cache(capacity, PolicyKind::Lfu);
        let mut model = LfuModel::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value, TEST_TTL);
                    model.set(capacity, key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key), "get {}", key);
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(cache.delete(&key), model.delete(&key), "delete {}", key);
                }
            }
            prop_assert_eq!(cache.len(), model.entries.len());
        }
    }

    // Storing V1 then V2 under one key leaves a single entry holding V2.
    #[test]
    fn prop_overwrite_semantics(
        kind in kind_strategy(),
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = new_cache(4, kind);

        cache.set(key.clone(), value1, TEST_TTL);
        cache.set(key.clone(), value2, TEST_TTL);

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
        cache.assert_consistent();
    }

    // After a delete, a get on the same key misses.
    #[test]
    fn prop_delete_removes_entry(
        kind in kind_strategy(),
        key in key_strategy(),
        value in value_strategy()
    ) {
        let cache = new_cache(4, kind);

        cache.set(key.clone(), value, TEST_TTL);
        prop_assert!(cache.delete(&key));
        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(!cache.delete(&key));
        cache.assert_consistent();
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry read after its TTL has elapsed misses and leaves both the
    // map and the policy.
    #[test]
    fn prop_ttl_expiration_behavior(
        kind in kind_strategy(),
        key in key_strategy(),
        value in value_strategy()
    ) {
        let cache = new_cache(4, kind);

        cache.set(key.clone(), value, Duration::from_millis(1));
        sleep(Duration::from_millis(2));

        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(cache.is_empty());
        cache.assert_consistent();
    }
}
