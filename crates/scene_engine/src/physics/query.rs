//! Collision queries against a scene
//!
//! A query tests one live collider against a set of candidates and reduces
//! the pairwise results: `first` stops at the first hit, `all` collects hits
//! in candidate order. The `_at` variants move the querying collider's
//! entity to a hypothetical position for the duration of the query and put
//! it back afterwards, including when a handler panics.

use std::ops::Deref;

use thiserror::Error;

use crate::foundation::math::Point2;
use crate::scene::{ComponentId, EntityId, Scene};
use super::collider::{ColliderRef, Tag};
use super::collision::{overlap, WorldShape};

/// A query was issued for an object that cannot take part in it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// No entity with this id is stored in the scene
    #[error("Entity {0:?} is not stored in the scene")]
    UnknownEntity(EntityId),

    /// The component is not committed to an entity committed to the scene
    #[error("Component {component:?} is not attached to entity {entity:?} in the scene")]
    NotAttached {
        /// Entity the component was expected on
        entity: EntityId,
        /// The component
        component: ComponentId,
    },

    /// The component exists but is not a collider
    #[error("Component {component:?} on entity {entity:?} is not a collider")]
    NotACollider {
        /// Owning entity
        entity: EntityId,
        /// The component
        component: ComponentId,
    },
}

/// Collision query errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// The query's inputs are invalid
    #[error("Collision precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
}

/// What a query tests against
#[derive(Debug, Clone, Copy)]
pub enum Candidates<'a> {
    /// Every live collider carrying a tag
    Tag(Tag),
    /// Every live collider of one entity
    Entity(EntityId),
    /// Every live collider of several entities
    Entities(&'a [EntityId]),
    /// An explicit list of colliders
    Colliders(&'a [ColliderRef]),
}

impl From<Tag> for Candidates<'_> {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<EntityId> for Candidates<'_> {
    fn from(entity: EntityId) -> Self {
        Self::Entity(entity)
    }
}

impl<'a> From<&'a [EntityId]> for Candidates<'a> {
    fn from(entities: &'a [EntityId]) -> Self {
        Self::Entities(entities)
    }
}

impl<'a> From<&'a [ColliderRef]> for Candidates<'a> {
    fn from(colliders: &'a [ColliderRef]) -> Self {
        Self::Colliders(colliders)
    }
}

impl<'a> From<&'a Vec<EntityId>> for Candidates<'a> {
    fn from(entities: &'a Vec<EntityId>) -> Self {
        Self::Entities(entities)
    }
}

impl<'a> From<&'a Vec<ColliderRef>> for Candidates<'a> {
    fn from(colliders: &'a Vec<ColliderRef>) -> Self {
        Self::Colliders(colliders)
    }
}

/// Moves an entity for as long as the guard lives
///
/// The entity's previous position is restored when the guard is dropped.
/// The guard derefs to the scene so queries can run while it is held.
pub struct PositionOverride<'a> {
    scene: &'a mut Scene,
    entity: EntityId,
    saved: Point2,
}

impl<'a> PositionOverride<'a> {
    /// Move `entity` to `position`
    pub fn new(scene: &'a mut Scene, entity: EntityId, position: Point2) -> Result<Self, PreconditionError> {
        let target = scene
            .entity_mut(entity)
            .ok_or(PreconditionError::UnknownEntity(entity))?;
        let saved = std::mem::replace(&mut target.position, position);
        Ok(Self { scene, entity, saved })
    }
}

impl Deref for PositionOverride<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl Drop for PositionOverride<'_> {
    fn drop(&mut self) {
        if let Some(entity) = self.scene.entity_mut(self.entity) {
            entity.position = self.saved;
        }
    }
}

impl Scene {
    /// Place a live collider in world space
    pub fn world_shape(&self, collider: ColliderRef) -> Result<WorldShape<'_>, PreconditionError> {
        let ColliderRef { entity, component } = collider;
        let owner = self.entity(entity).ok_or(PreconditionError::UnknownEntity(entity))?;
        if !self.is_live(collider) {
            return Err(PreconditionError::NotAttached { entity, component });
        }
        owner
            .component(component)
            .and_then(|slot| slot.as_collider())
            .map(|shape| shape.resolve(owner.position))
            .ok_or(PreconditionError::NotACollider { entity, component })
    }

    /// Test two live colliders; a collider never overlaps itself
    pub fn overlap(&self, a: ColliderRef, b: ColliderRef) -> Result<bool, CollisionError> {
        let shape_a = self.world_shape(a)?;
        let shape_b = self.world_shape(b)?;
        Ok(a != b && overlap(&shape_a, &shape_b))
    }

    /// First candidate overlapping `collider` at its current position
    pub fn query_first<'c>(
        &self,
        collider: ColliderRef,
        against: impl Into<Candidates<'c>>,
    ) -> Result<Option<ColliderRef>, CollisionError> {
        let shape = self.world_shape(collider)?;
        let hit = self.hits(collider, &shape, against.into()).next();
        Ok(hit)
    }

    /// Every candidate overlapping `collider` at its current position
    pub fn query_all<'c>(
        &self,
        collider: ColliderRef,
        against: impl Into<Candidates<'c>>,
    ) -> Result<Vec<ColliderRef>, CollisionError> {
        let shape = self.world_shape(collider)?;
        let hits = self.hits(collider, &shape, against.into()).collect();
        Ok(hits)
    }

    /// Check if any candidate overlaps `collider` at its current position
    pub fn overlaps<'c>(&self, collider: ColliderRef, against: impl Into<Candidates<'c>>) -> Result<bool, CollisionError> {
        Ok(self.query_first(collider, against)?.is_some())
    }

    /// First candidate overlapping `collider` if its entity were at `(x, y)`
    pub fn collide_at<'c>(
        &mut self,
        collider: ColliderRef,
        x: f32,
        y: f32,
        against: impl Into<Candidates<'c>>,
    ) -> Result<Option<ColliderRef>, CollisionError> {
        let moved = PositionOverride::new(self, collider.entity, Point2::new(x, y))?;
        moved.query_first(collider, against)
    }

    /// Every candidate overlapping `collider` if its entity were at `(x, y)`
    pub fn collide_all_at<'c>(
        &mut self,
        collider: ColliderRef,
        x: f32,
        y: f32,
        against: impl Into<Candidates<'c>>,
    ) -> Result<Vec<ColliderRef>, CollisionError> {
        let moved = PositionOverride::new(self, collider.entity, Point2::new(x, y))?;
        moved.query_all(collider, against)
    }

    /// Check if any candidate would overlap `collider` with its entity at `(x, y)`
    pub fn overlaps_at<'c>(
        &mut self,
        collider: ColliderRef,
        x: f32,
        y: f32,
        against: impl Into<Candidates<'c>>,
    ) -> Result<bool, CollisionError> {
        Ok(self.collide_at(collider, x, y, against)?.is_some())
    }

    fn candidates(&self, against: Candidates<'_>) -> Vec<ColliderRef> {
        let entity_colliders = |entity: EntityId| {
            self.entity(entity)
                .filter(|_| self.contains(entity))
                .into_iter()
                .flat_map(move |owner| owner.colliders().map(move |(component, _)| ColliderRef::new(entity, component)))
        };

        match against {
            Candidates::Tag(tag) => self.tag_index().get(tag).to_vec(),
            Candidates::Entity(entity) => entity_colliders(entity).collect(),
            Candidates::Entities(entities) => entities.iter().flat_map(|entity| entity_colliders(*entity)).collect(),
            Candidates::Colliders(colliders) => colliders.to_vec(),
        }
    }

    fn hits<'s>(
        &'s self,
        collider: ColliderRef,
        shape: &'s WorldShape<'s>,
        against: Candidates<'_>,
    ) -> impl Iterator<Item = ColliderRef> + 's {
        self.candidates(against).into_iter().filter(move |candidate| {
            *candidate != collider
                && self
                    .world_shape(*candidate)
                    .is_ok_and(|other| overlap(shape, &other))
        })
    }
}
