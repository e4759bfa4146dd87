//! LFU Policy Module
//!
//! Implements Least Frequently Used tracking with an indexed binary min-heap.
//!
//! ```text
//!   heap (Vec, min at slot 0)            index (HashMap<K, slot>)
//!   ┌───────────────────────────┐        ┌──────┬──────┐
//!   │ 0: (freq 1, seq 4, "d")   │ <───── │ "d"  │  0   │
//!   │ 1: (freq 2, seq 1, "b")   │ <───── │ "b"  │  1   │
//!   │ 2: (freq 5, seq 0, "a")   │ <───── │ "a"  │  2   │
//!   └───────────────────────────┘        └──────┴──────┘
//! ```
//!
//! Every swap inside the heap rewrites the two affected index slots, so the
//! index always points at the live position of each key. Bumping a key's
//! frequency is a sift-down from that slot, O(log n). Removing an arbitrary
//! key swaps it with the last slot, pops it, and restores order around the
//! hole, also O(log n).
//!
//! Ties on frequency go to the entry that was inserted first.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use super::{EvictionPolicy, PolicyKind};

struct HeapEntry<K, V> {
    key: K,
    value: V,
    frequency: u64,
    /// Insertion order, used as the tie-break among equal frequencies.
    seq: u64,
}

impl<K, V> HeapEntry<K, V> {
    fn priority(&self) -> (u64, u64) {
        (self.frequency, self.seq)
    }
}

// == LFU Policy ==
/// Tracks access counts for LFU eviction.
///
/// Frequency starts at 1 on insertion and grows by 1 on every re-add or
/// recorded access. The victim is the entry with the lowest frequency.
pub struct LfuPolicy<K, V> {
    heap: Vec<HeapEntry<K, V>>,
    index: HashMap<K, usize>,
    next_seq: u64,
}

impl<K: Hash + Eq + Clone, V> LfuPolicy<K, V> {
    // == Constructor ==
    /// Creates a new empty LFU policy.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    // == Frequency ==
    /// Returns the access count of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|&pos| self.heap[pos].frequency)
    }

    // == Peek LFU ==
    /// Returns the key that `evict` would remove next.
    pub fn peek_lfu(&self) -> Option<&K> {
        self.heap.first().map(|e| &e.key)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].priority().cmp(&self.heap[b].priority()) == Ordering::Less
    }

    /// Swaps two heap slots and repoints both keys in the index.
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.heap[a].key) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.heap[b].key) {
            *slot = b;
        }
    }

    /// Moves the entry at `pos` toward the root. Returns its final slot.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    /// Moves the entry at `pos` toward the leaves. Returns its final slot.
    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == pos {
                return pos;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    /// Takes the entry at `pos` out of the heap and the index.
    fn remove_at(&mut self, pos: usize) -> HeapEntry<K, V> {
        let last = self.heap.len() - 1;
        self.swap(pos, last);
        let entry = self.heap.swap_remove(last);
        self.index.remove(&entry.key);

        if pos < self.heap.len() && self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
        entry
    }

    fn bump(&mut self, pos: usize, value: V) {
        let entry = &mut self.heap[pos];
        entry.value = value;
        entry.frequency = entry.frequency.saturating_add(1);
        self.sift_down(pos);
    }
}

impl<K: Hash + Eq + Clone, V> Default for LfuPolicy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for LfuPolicy<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    fn add(&mut self, key: K, value: V) {
        if let Some(&pos) = self.index.get(&key) {
            self.bump(pos, value);
            return;
        }

        let pos = self.heap.len();
        self.index.insert(key.clone(), pos);
        self.heap.push(HeapEntry {
            key,
            value,
            frequency: 1,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.sift_up(pos);
    }

    fn record_access(&mut self, key: &K, value: V) {
        if let Some(&pos) = self.index.get(key) {
            self.bump(pos, value);
        }
    }

    fn evict(&mut self) -> Option<(K, V)> {
        if self.heap.is_empty() {
            return None;
        }
        let entry = self.remove_at(0);
        Some((entry.key, entry.value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let pos = *self.index.get(key)?;
        Some(self.remove_at(pos).value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }
}
