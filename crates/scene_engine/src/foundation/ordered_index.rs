//! Integer-keyed ordered index
//!
//! Groups members into buckets keyed by a mutable integer (draw layer or
//! update order). Buckets iterate from the highest key to the lowest and
//! keep insertion order inside a bucket. A member's key is only re-read when
//! the owner calls [`OrderedIndex::refresh`], so key changes made in the
//! middle of an iteration take effect on the next pass.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Members bucketed by an integer key, iterated highest key first
#[derive(Debug, Clone)]
pub struct OrderedIndex<T> {
    buckets: BTreeMap<i32, Vec<T>>,
    keys: HashMap<T, i32>,
}

impl<T: Copy + Eq + Hash + Debug> OrderedIndex<T> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            keys: HashMap::new(),
        }
    }

    /// Append `item` to the end of the bucket for `key`
    ///
    /// An item already in the index is moved instead.
    pub fn insert(&mut self, item: T, key: i32) {
        if self.keys.contains_key(&item) {
            self.reindex(item, key);
            return;
        }
        self.buckets.entry(key).or_default().push(item);
        self.keys.insert(item, key);
    }

    /// Remove `item`, returning the key it was filed under
    pub fn remove(&mut self, item: T) -> Option<i32> {
        let key = self.keys.remove(&item)?;
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.retain(|member| *member != item);
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
        Some(key)
    }

    /// Key of the bucket `item` currently occupies
    pub fn key_of(&self, item: T) -> Option<i32> {
        self.keys.get(&item).copied()
    }

    /// Check if `item` is indexed
    pub fn contains(&self, item: T) -> bool {
        self.keys.contains_key(&item)
    }

    /// Members filed under `key`, in bucket order
    pub fn bucket(&self, key: i32) -> &[T] {
        self.buckets.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Move `item` to the end of the bucket for `new_key`
    ///
    /// Returns `false` if the item is not indexed or already filed under
    /// `new_key` (in which case its position is left alone).
    pub fn reindex(&mut self, item: T, new_key: i32) -> bool {
        match self.key_of(item) {
            Some(old_key) if old_key != new_key => {
                self.remove(item);
                self.insert(item, new_key);
                log::trace!("Re-bucketed {:?} from {} to {}", item, old_key, new_key);
                true
            }
            _ => false,
        }
    }

    /// Compare every member's current key with the bucket it occupies and
    /// re-bucket the ones that changed
    ///
    /// Members are visited in iteration order; moved members land at the
    /// end of their new bucket in that order. Returns the number moved.
    pub fn refresh(&mut self, mut current_key: impl FnMut(T) -> Option<i32>) -> usize {
        let stale: Vec<(T, i32)> = self
            .iter()
            .filter_map(|item| {
                let key = current_key(item)?;
                (Some(key) != self.key_of(item)).then_some((item, key))
            })
            .collect();

        for &(item, key) in &stale {
            self.reindex(item, key);
        }
        stale.len()
    }

    /// All members, buckets from highest key to lowest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.buckets.values().rev().flat_map(|bucket| bucket.iter().copied())
    }

    /// Snapshot of all members in iteration order
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Number of indexed members
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Move `item` to the end of its bucket
    pub fn to_front(&mut self, item: T) -> bool {
        self.move_within_bucket(item, |_, len| len - 1)
    }

    /// Move `item` to the start of its bucket
    pub fn to_back(&mut self, item: T) -> bool {
        self.move_within_bucket(item, |_, _| 0)
    }

    /// Swap `item` one place toward the end of its bucket
    pub fn forward(&mut self, item: T) -> bool {
        self.move_within_bucket(item, |index, len| (index + 1).min(len - 1))
    }

    /// Swap `item` one place toward the start of its bucket
    pub fn backward(&mut self, item: T) -> bool {
        self.move_within_bucket(item, |index, _| index.saturating_sub(1))
    }

    fn move_within_bucket(&mut self, item: T, target: impl FnOnce(usize, usize) -> usize) -> bool {
        let Some(key) = self.key_of(item) else {
            return false;
        };
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return false;
        };
        let Some(index) = bucket.iter().position(|member| *member == item) else {
            return false;
        };
        let destination = target(index, bucket.len());
        let moved = bucket.remove(index);
        bucket.insert(destination, moved);
        destination != index
    }
}

impl<T: Copy + Eq + Hash + Debug> Default for OrderedIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
