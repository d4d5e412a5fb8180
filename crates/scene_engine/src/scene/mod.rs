//! Scene graph: scenes own entities, entities own components
//!
//! ## Ownership
//!
//! ```text
//! Scene ── SlotMap<EntityId, Entity>
//!            └── Entity ── SlotMap<ComponentId, Component>
//! ```
//!
//! Membership changes go through a [`Registry`](crate::foundation::registry::Registry)
//! at each level and become visible only at the next sync point. Storage
//! and membership are separate: a removed entity or component stays in
//! storage, detached, until it is taken back or purged.
//!
//! Hooks receive explicit context objects ([`ComponentContext`],
//! [`EntityContext`], [`RenderContext`]) that carry the scene and the
//! per-frame state, so a hook can reach any other object through ids.

mod component;
mod context;
mod entity;
#[allow(clippy::module_inception)]
mod scene;

#[cfg(test)]
mod tests;

use bitflags::bitflags;
use thiserror::Error;

use crate::foundation::registry::RegistryError;

pub use component::{Component, ComponentKind, Script};
pub use context::{ComponentContext, EntityContext, FrameContext, RenderContext};
pub use entity::{Entity, EntityScript};
pub use scene::{Scene, SceneScript};

slotmap::new_key_type! {
    /// Handle of an entity inside its scene's storage
    pub struct EntityId;

    /// Handle of a component inside its entity's storage
    pub struct ComponentId;
}

bitflags! {
    /// Per-object state toggles shared by entities and components
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// Receives update hooks and advances its timer
        const ENABLED = 1 << 0;
        /// Receives render hooks
        const VISIBLE = 1 << 1;
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        Self::ENABLED | Self::VISIBLE
    }
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Membership change rejected by a registry
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// No entity with this id is stored in the scene
    #[error("Unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// No component with this id is stored on the entity
    #[error("Unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// The object is still committed or pending addition
    #[error("Object is still attached; remove it and sync first")]
    StillAttached,
}
