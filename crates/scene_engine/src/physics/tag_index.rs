//! Broad-phase tag index
//!
//! Maps each tag to the colliders currently filed under it. The scene keeps
//! this in step with collider membership; entries exist only for colliders
//! committed to an entity that is itself committed to the scene.

use std::collections::HashMap;

use crate::scene::EntityId;
use super::collider::{ColliderRef, Tag};

/// Tag to collider multimap, insertion ordered per tag
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: HashMap<Tag, Vec<ColliderRef>>,
}

impl TagIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// File `collider` under `tag`; returns `false` if it already was
    pub fn insert(&mut self, tag: Tag, collider: ColliderRef) -> bool {
        let colliders = self.entries.entry(tag).or_default();
        if colliders.contains(&collider) {
            return false;
        }
        colliders.push(collider);
        true
    }

    /// Unfile `collider` from `tag`; returns `false` if it was not filed
    pub fn remove(&mut self, tag: Tag, collider: ColliderRef) -> bool {
        let Some(colliders) = self.entries.get_mut(&tag) else {
            return false;
        };
        let before = colliders.len();
        colliders.retain(|existing| *existing != collider);
        let removed = colliders.len() != before;
        if colliders.is_empty() {
            self.entries.remove(&tag);
        }
        removed
    }

    /// Unfile `collider` from every tag
    pub fn remove_all(&mut self, collider: ColliderRef) {
        self.entries.retain(|_, colliders| {
            colliders.retain(|existing| *existing != collider);
            !colliders.is_empty()
        });
    }

    /// Unfile every collider owned by `entity`
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.entries.retain(|_, colliders| {
            colliders.retain(|existing| existing.entity != entity);
            !colliders.is_empty()
        });
    }

    /// Colliders filed under `tag`, in filing order
    pub fn get(&self, tag: Tag) -> &[ColliderRef] {
        self.entries.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Check if `collider` is filed under `tag`
    pub fn contains(&self, tag: Tag, collider: ColliderRef) -> bool {
        self.get(tag).contains(&collider)
    }

    /// Every `(tag, collider)` entry, tags in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = (Tag, ColliderRef)> + '_ {
        self.entries
            .iter()
            .flat_map(|(tag, colliders)| colliders.iter().map(move |collider| (*tag, *collider)))
    }

    /// Number of `(tag, collider)` entries
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Check if nothing is filed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ComponentId;
    use slotmap::SlotMap;

    const WALL: Tag = Tag::new("wall");
    const HAZARD: Tag = Tag::new("hazard");

    fn refs(count: usize) -> Vec<ColliderRef> {
        let mut entities: SlotMap<EntityId, ()> = SlotMap::with_key();
        let mut components: SlotMap<ComponentId, ()> = SlotMap::with_key();
        let entity = entities.insert(());
        let other = entities.insert(());
        (0..count)
            .map(|i| ColliderRef::new(if i % 2 == 0 { entity } else { other }, components.insert(())))
            .collect()
    }

    #[test]
    fn test_insert_keeps_filing_order() {
        let colliders = refs(3);
        let mut index = TagIndex::new();
        for collider in &colliders {
            assert!(index.insert(WALL, *collider));
        }
        assert!(!index.insert(WALL, colliders[0]));
        assert_eq!(index.get(WALL), colliders.as_slice());
        assert!(index.get(HAZARD).is_empty());
    }

    #[test]
    fn test_remove_all_and_remove_entity() {
        let colliders = refs(4);
        let mut index = TagIndex::new();
        for collider in &colliders {
            index.insert(WALL, *collider);
            index.insert(HAZARD, *collider);
        }
        assert_eq!(index.len(), 8);

        index.remove_all(colliders[1]);
        assert!(!index.contains(WALL, colliders[1]));
        assert!(!index.contains(HAZARD, colliders[1]));
        assert_eq!(index.len(), 6);

        index.remove_entity(colliders[0].entity);
        assert_eq!(index.get(WALL), &[colliders[3]]);

        assert!(index.remove(WALL, colliders[3]));
        assert!(!index.remove(WALL, colliders[3]));
        assert_eq!(index.entries().count(), 1);
    }
}
