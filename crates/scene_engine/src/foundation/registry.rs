//! Deferred-mutation registry
//!
//! A [`Registry`] is an ordered collection whose additions and removals are
//! queued and only take effect when the owner calls [`Registry::drain`] at a
//! sync point. Iteration always covers the committed members as of the last
//! drain, so code running inside an iteration may freely add or remove
//! members without disturbing it.
//!
//! Entities use a registry for their components and scenes use one for their
//! entities. The registry itself stores only ids. Owners that fire lifecycle
//! hooks drain in two steps, [`Registry::drain_removals`] then
//! [`Registry::drain_additions`], running removal hooks in between.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Registry membership errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The item is already committed or already queued for addition
    #[error("item is already a member or already pending addition")]
    DuplicateMembership,

    /// The item is neither committed nor queued for addition
    #[error("item is not a member")]
    NotMember,
}

/// A committed membership change reported by [`Registry::drain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<T> {
    /// The item was unlinked from the committed set
    Removed(T),
    /// The item was appended to the committed set
    Added(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp<T> {
    Add(T),
    Remove(T),
}

/// Ordered collection with add/remove deferred to the next drain
#[derive(Debug, Clone)]
pub struct Registry<T> {
    committed: Vec<T>,
    members: HashSet<T>,
    pending: Vec<PendingOp<T>>,
    staged: Vec<T>,
}

impl<T: Copy + Eq + Hash + Debug> Registry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            committed: Vec::new(),
            members: HashSet::new(),
            pending: Vec::new(),
            staged: Vec::new(),
        }
    }

    /// Queue `item` for addition at the next drain
    ///
    /// Re-adding a member that is pending removal queues the addition behind
    /// the removal, so the drain reports both changes in that order.
    pub fn add(&mut self, item: T) -> Result<(), RegistryError> {
        if self.is_pending_add(item) {
            return Err(RegistryError::DuplicateMembership);
        }
        if self.members.contains(&item) && !self.is_pending_remove(item) {
            return Err(RegistryError::DuplicateMembership);
        }
        self.pending.push(PendingOp::Add(item));
        Ok(())
    }

    /// Queue `item` for removal at the next drain
    ///
    /// Removing an item that is only pending addition cancels the addition;
    /// no change is ever reported for it.
    pub fn remove(&mut self, item: T) -> Result<(), RegistryError> {
        if let Some(index) = self.pending.iter().position(|op| *op == PendingOp::Add(item)) {
            self.pending.remove(index);
            return Ok(());
        }
        if let Some(index) = self.staged.iter().position(|staged| *staged == item) {
            self.staged.remove(index);
            return Ok(());
        }
        if !self.members.contains(&item) {
            return Err(RegistryError::NotMember);
        }
        if !self.is_pending_remove(item) {
            self.pending.push(PendingOp::Remove(item));
        }
        Ok(())
    }

    /// Commit every queued removal
    ///
    /// Queued additions are staged, not committed: they stay pending until
    /// [`Registry::drain_additions`], so hooks the owner runs for the
    /// returned removals still see the committed set without them.
    pub fn drain_removals(&mut self) -> Vec<T> {
        let mut removed = Vec::new();
        for op in std::mem::take(&mut self.pending) {
            match op {
                PendingOp::Remove(item) => {
                    self.committed.retain(|member| *member != item);
                    self.members.remove(&item);
                    removed.push(item);
                }
                PendingOp::Add(item) => self.staged.push(item),
            }
        }
        removed
    }

    /// Commit the additions staged by the last [`Registry::drain_removals`]
    ///
    /// Operations queued since then wait for the next drain.
    pub fn drain_additions(&mut self) -> Vec<T> {
        let added = std::mem::take(&mut self.staged);
        for &item in &added {
            self.committed.push(item);
            self.members.insert(item);
        }
        added
    }

    /// Commit every queued operation in one step
    ///
    /// Removals are applied first, then additions, each group in queue order.
    /// The returned changes follow the same order. Owners that fire hooks
    /// between the two groups use the split drains instead.
    pub fn drain(&mut self) -> Vec<Change<T>> {
        let mut changes: Vec<_> = self.drain_removals().into_iter().map(Change::Removed).collect();
        changes.extend(self.drain_additions().into_iter().map(Change::Added));
        if !changes.is_empty() {
            log::trace!("Registry drained {} change(s)", changes.len());
        }
        changes
    }

    /// Check if `item` is committed
    pub fn contains(&self, item: T) -> bool {
        self.members.contains(&item)
    }

    /// Check if `item` is queued for addition
    pub fn is_pending_add(&self, item: T) -> bool {
        self.staged.contains(&item) || self.pending.contains(&PendingOp::Add(item))
    }

    /// Check if `item` is queued for removal
    pub fn is_pending_remove(&self, item: T) -> bool {
        self.pending.contains(&PendingOp::Remove(item))
    }

    /// Items queued for addition, in queue order
    pub fn pending_additions(&self) -> impl Iterator<Item = T> + '_ {
        self.staged.iter().copied().chain(self.pending.iter().filter_map(|op| match *op {
            PendingOp::Add(item) => Some(item),
            PendingOp::Remove(_) => None,
        }))
    }

    /// Committed members in commit order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.committed.iter().copied()
    }

    /// Committed members as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.committed
    }

    /// Number of committed members
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Check if there are no committed members
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Number of queued operations
    pub fn pending_len(&self) -> usize {
        self.pending.len() + self.staged.len()
    }
}

impl<T: Copy + Eq + Hash + Debug> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_deferred_until_drain() {
        let mut registry = Registry::new();
        registry.add(1).unwrap();
        assert!(!registry.contains(1));
        assert!(registry.is_empty());

        assert_eq!(registry.drain(), vec![Change::Added(1)]);
        assert!(registry.contains(1));
        assert_eq!(registry.as_slice(), &[1]);
    }

    #[test]
    fn test_add_then_remove_cancels_out() {
        let mut registry = Registry::new();
        registry.add(7).unwrap();
        registry.remove(7).unwrap();

        assert!(registry.drain().is_empty());
        assert!(!registry.contains(7));
    }

    #[test]
    fn test_remove_then_readd_reports_both_changes() {
        let mut registry = Registry::new();
        registry.add(3).unwrap();
        registry.drain();

        registry.remove(3).unwrap();
        registry.add(3).unwrap();

        assert_eq!(registry.drain(), vec![Change::Removed(3), Change::Added(3)]);
        assert!(registry.contains(3));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_removals_apply_before_additions() {
        let mut registry = Registry::new();
        registry.add(1).unwrap();
        registry.add(2).unwrap();
        registry.drain();

        registry.add(3).unwrap();
        registry.remove(1).unwrap();

        assert_eq!(registry.drain(), vec![Change::Removed(1), Change::Added(3)]);
        assert_eq!(registry.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_split_drain_stages_additions() {
        let mut registry = Registry::new();
        registry.add(1).unwrap();
        registry.drain();

        registry.add(2).unwrap();
        registry.remove(1).unwrap();

        assert_eq!(registry.drain_removals(), vec![1]);
        assert!(!registry.contains(1));
        assert!(!registry.contains(2));
        assert!(registry.is_pending_add(2));
        assert_eq!(registry.add(2), Err(RegistryError::DuplicateMembership));

        // Queued while removal hooks run: waits for the next drain
        registry.add(3).unwrap();
        assert_eq!(registry.drain_additions(), vec![2]);
        assert_eq!(registry.as_slice(), &[2]);
        assert_eq!(registry.pending_additions().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_staged_addition_can_be_cancelled() {
        let mut registry = Registry::new();
        registry.add(5).unwrap();
        assert!(registry.drain_removals().is_empty());

        registry.remove(5).unwrap();
        assert!(registry.drain_additions().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_membership() {
        let mut registry = Registry::new();
        registry.add(1).unwrap();
        assert_eq!(registry.add(1), Err(RegistryError::DuplicateMembership));

        registry.drain();
        assert_eq!(registry.add(1), Err(RegistryError::DuplicateMembership));
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut registry: Registry<u32> = Registry::new();
        assert_eq!(registry.remove(9), Err(RegistryError::NotMember));
    }

    #[test]
    fn test_double_remove_is_single_change() {
        let mut registry = Registry::new();
        registry.add(4).unwrap();
        registry.drain();

        registry.remove(4).unwrap();
        registry.remove(4).unwrap();
        assert_eq!(registry.pending_len(), 1);
        assert_eq!(registry.drain(), vec![Change::Removed(4)]);
    }

    #[test]
    fn test_iteration_sees_committed_snapshot_only() {
        let mut registry = Registry::new();
        registry.add(1).unwrap();
        registry.add(2).unwrap();
        registry.drain();

        let snapshot: Vec<_> = registry.iter().collect();
        for item in snapshot {
            registry.remove(item).unwrap();
            registry.add(item + 10).unwrap();
        }

        assert_eq!(registry.as_slice(), &[1, 2]);
        registry.drain();
        assert_eq!(registry.as_slice(), &[11, 12]);
    }
}
