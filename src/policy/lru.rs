//! LRU Policy Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::HashMap;
use std::hash::Hash;

use super::{EvictionPolicy, PolicyKind};

/// Sentinel indices in the `nodes` arena.
const HEAD: usize = 0; // most recently used end
const TAIL: usize = 1; // least recently used end
const NULL: usize = usize::MAX;

struct LruNode<K, V> {
    /// `None` for the sentinels and for freed slots.
    entry: Option<(K, V)>,
    /// Index toward HEAD (more recently used).
    prev: usize,
    /// Index toward TAIL (less recently used).
    next: usize,
}

// == LRU Policy ==
/// Tracks access order for LRU eviction.
///
/// Nodes live in a `Vec` arena and link to each other by index, so moving a
/// node to the front is O(1) and handles stay valid when the arena grows:
/// - HEAD side = most recently used
/// - TAIL side = least recently used (next victim)
pub struct LruPolicy<K, V> {
    /// Index 0 = HEAD sentinel, 1 = TAIL sentinel, 2+ = real entries.
    nodes: Vec<LruNode<K, V>>,
    /// Maps a key to its slot in `nodes`.
    index: HashMap<K, usize>,
    /// Freed slots available for reuse.
    free_list: Vec<usize>,
}

impl<K: Hash + Eq + Clone, V> LruPolicy<K, V> {
    // == Constructor ==
    /// Creates a new empty LRU policy.
    pub fn new() -> Self {
        let nodes = vec![
            LruNode {
                entry: None,
                prev: NULL,
                next: TAIL,
            },
            LruNode {
                entry: None,
                prev: HEAD,
                next: NULL,
            },
        ];

        Self {
            nodes,
            index: HashMap::new(),
            free_list: Vec::new(),
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.key_at(self.nodes[TAIL].prev)
    }

    // == Peek Newest ==
    /// Returns the most recently used key.
    pub fn peek_newest(&self) -> Option<&K> {
        self.key_at(self.nodes[HEAD].next)
    }

    fn key_at(&self, idx: usize) -> Option<&K> {
        self.nodes[idx].entry.as_ref().map(|(k, _)| k)
    }

    /// Links `idx` right after HEAD.
    fn link_after_head(&mut self, idx: usize) {
        let old_first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = old_first;
        self.nodes[HEAD].next = idx;
        self.nodes[old_first].prev = idx;
    }

    /// Detaches `idx` from the list.
    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = NULL;
        self.nodes[idx].next = NULL;
    }

    fn alloc_node(&mut self, key: K, value: V) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].entry = Some((key, value));
            idx
        } else {
            self.nodes.push(LruNode {
                entry: Some((key, value)),
                prev: NULL,
                next: NULL,
            });
            self.nodes.len() - 1
        }
    }

    /// Unlinks `idx` and returns its slot to the free list.
    /// The caller has already dropped it from `index`.
    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.unlink(idx);
        let entry = self.nodes[idx].entry.take();
        self.free_list.push(idx);
        entry
    }

    fn touch(&mut self, idx: usize, value: V) {
        if let Some((_, v)) = self.nodes[idx].entry.as_mut() {
            *v = value;
        }
        self.unlink(idx);
        self.link_after_head(idx);
    }
}

impl<K: Hash + Eq + Clone, V> Default for LruPolicy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for LruPolicy<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    fn add(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.touch(idx, value);
            return;
        }

        let idx = self.alloc_node(key.clone(), value);
        self.index.insert(key, idx);
        self.link_after_head(idx);
    }

    fn record_access(&mut self, key: &K, value: V) {
        if let Some(&idx) = self.index.get(key) {
            self.touch(idx, value);
        }
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let idx = self.nodes[TAIL].prev;
        if idx == HEAD {
            return None;
        }
        let (key, value) = self.release(idx)?;
        self.index.remove(&key);
        Some((key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.release(idx).map(|(_, v)| v)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }
}
