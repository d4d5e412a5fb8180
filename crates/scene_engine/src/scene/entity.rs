//! Entities: positioned containers of components

use std::fmt;

use slotmap::SlotMap;

use crate::animation::Animator;
use crate::foundation::math::Point2;
use crate::foundation::registry::{Change, Registry};
use crate::physics::collider::Collider;
use crate::render::Graphic;
use super::context::{EntityContext, RenderContext};
use super::{Component, ComponentId, EntityId, SceneError, StateFlags};

/// User behaviour attached to an entity
///
/// Every hook is optional. Update hooks only run while the entity is
/// enabled, and `render` only while it is visible.
pub trait EntityScript {
    /// The entity was committed to a scene
    fn added(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// The entity was removed from a scene
    fn removed(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// First phase, before the scene's first hook
    fn update_first(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// Main phase, before the entity's components update
    fn update(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// Last phase, after every entity's main phase
    fn update_last(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// Draw after the entity's components
    fn render(&self, _ctx: &mut RenderContext<'_>) {}
}

/// A positioned object in a scene
///
/// Components are stored on the entity and their membership is deferred:
/// [`Entity::add_component`] and [`Entity::remove_component`] queue the
/// change, and the owning scene commits it at the entity's next sync point.
pub struct Entity {
    /// World position
    pub position: Point2,
    /// Render layer; higher layers draw first
    pub layer: i32,
    /// Update order; higher orders update first
    pub order: i32,
    flags: StateFlags,
    timer: f32,
    components: SlotMap<ComponentId, Component>,
    registry: Registry<ComponentId>,
    id: Option<EntityId>,
    script: Option<Box<dyn EntityScript>>,
    animator: Option<Box<dyn Animator>>,
}

impl Entity {
    /// Create an entity at the origin
    pub fn new() -> Self {
        Self::at(0.0, 0.0)
    }

    /// Create an entity at a position
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point2::new(x, y),
            layer: 0,
            order: 0,
            flags: StateFlags::default(),
            timer: 0.0,
            components: SlotMap::with_key(),
            registry: Registry::new(),
            id: None,
            script: None,
            animator: None,
        }
    }

    /// Set the render layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Set the update order
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Attach an entity script
    pub fn with_script(mut self, script: impl EntityScript + 'static) -> Self {
        self.script = Some(Box::new(script));
        self
    }

    /// Replace the entity script
    pub fn set_script(&mut self, script: Option<Box<dyn EntityScript>>) {
        self.script = script;
    }

    /// Attach an animator, advanced at the start of the entity's main phase
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Replace the entity's animator
    pub fn set_animator(&mut self, animator: Option<Box<dyn Animator>>) {
        self.animator = animator;
    }

    /// Store a component and queue it for attachment
    pub fn add_component(&mut self, component: impl Into<Component>) -> Result<ComponentId, SceneError> {
        let id = self.components.insert(component.into());
        self.registry.add(id)?;
        Ok(id)
    }

    /// Queue a stored, detached component for attachment again
    pub fn reattach_component(&mut self, id: ComponentId) -> Result<(), SceneError> {
        if !self.components.contains_key(id) {
            return Err(SceneError::UnknownComponent(id));
        }
        self.registry.add(id)?;
        Ok(())
    }

    /// Queue a component for detachment
    ///
    /// Removing a component that is only pending attachment cancels it; the
    /// component stays in storage either way.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(), SceneError> {
        if !self.components.contains_key(id) {
            return Err(SceneError::UnknownComponent(id));
        }
        self.registry.remove(id)?;
        Ok(())
    }

    /// Take a detached component out of storage
    pub fn take_component(&mut self, id: ComponentId) -> Result<Component, SceneError> {
        if !self.components.contains_key(id) {
            return Err(SceneError::UnknownComponent(id));
        }
        if self.registry.contains(id) || self.registry.is_pending_add(id) {
            return Err(SceneError::StillAttached);
        }
        self.components.remove(id).ok_or(SceneError::UnknownComponent(id))
    }

    /// Drop every detached component, returning how many were dropped
    pub fn purge_detached_components(&mut self) -> usize {
        let registry = &self.registry;
        let before = self.components.len();
        self.components
            .retain(|id, _| registry.contains(id) || registry.is_pending_add(id));
        before - self.components.len()
    }

    /// Get a stored component
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Get a stored component mutably
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    /// Check if a component is committed
    pub fn has_component(&self, id: ComponentId) -> bool {
        self.registry.contains(id)
    }

    /// Committed component ids in attachment order
    pub fn component_ids(&self) -> &[ComponentId] {
        self.registry.as_slice()
    }

    /// Committed components in attachment order
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> + '_ {
        self.registry
            .iter()
            .filter_map(|id| self.components.get(id).map(|component| (id, component)))
    }

    /// Committed colliders in attachment order
    pub fn colliders(&self) -> impl Iterator<Item = (ComponentId, &Collider)> + '_ {
        self.components()
            .filter_map(|(id, component)| component.as_collider().map(|collider| (id, collider)))
    }

    /// Committed graphics in attachment order
    pub fn graphics(&self) -> impl Iterator<Item = (ComponentId, &Graphic)> + '_ {
        self.components()
            .filter_map(|(id, component)| component.as_graphic().map(|graphic| (id, graphic)))
    }

    /// First committed collider, or else the first one pending attachment
    pub fn first_collider(&self) -> Option<ComponentId> {
        self.colliders().map(|(id, _)| id).next().or_else(|| {
            self.registry
                .pending_additions()
                .find(|id| self.components.get(*id).is_some_and(Component::is_collider))
        })
    }

    /// Queue every committed collider for detachment
    pub fn clear_colliders(&mut self) -> usize {
        let ids: Vec<_> = self.colliders().map(|(id, _)| id).collect();
        self.remove_all(&ids)
    }

    /// Queue every committed graphic for detachment
    pub fn clear_graphics(&mut self) -> usize {
        let ids: Vec<_> = self.graphics().map(|(id, _)| id).collect();
        self.remove_all(&ids)
    }

    fn remove_all(&mut self, ids: &[ComponentId]) -> usize {
        ids.iter().filter(|id| self.registry.remove(**id).is_ok()).count()
    }

    /// Number of queued component changes
    pub fn pending_component_changes(&self) -> usize {
        self.registry.pending_len()
    }

    /// Check if update hooks run
    pub const fn is_enabled(&self) -> bool {
        self.flags.contains(StateFlags::ENABLED)
    }

    /// Toggle update hooks
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(StateFlags::ENABLED, enabled);
    }

    /// Check if render hooks run
    pub const fn is_visible(&self) -> bool {
        self.flags.contains(StateFlags::VISIBLE)
    }

    /// Toggle render hooks
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(StateFlags::VISIBLE, visible);
    }

    /// Seconds spent enabled inside a running scene
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Id inside the scene while committed to one
    pub const fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Check if the entity is committed to a scene
    pub const fn is_in_scene(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    pub(crate) fn advance_timer(&mut self, delta_time: f32) {
        self.timer += delta_time;
    }

    pub(crate) fn advance_animator(&mut self, delta_time: f32) {
        if let Some(animator) = self.animator.as_mut() {
            animator.advance(delta_time);
        }
    }

    pub(crate) fn drain_components(&mut self) -> Vec<Change<ComponentId>> {
        self.registry.drain()
    }

    pub(crate) fn drain_component_removals(&mut self) -> Vec<ComponentId> {
        self.registry.drain_removals()
    }

    pub(crate) fn drain_component_additions(&mut self) -> Vec<ComponentId> {
        self.registry.drain_additions()
    }

    pub(crate) fn take_script(&mut self) -> Option<Box<dyn EntityScript>> {
        self.script.take()
    }

    pub(crate) fn restore_script(&mut self, script: Box<dyn EntityScript>) {
        // A hook may have installed a replacement
        if self.script.is_none() {
            self.script = Some(script);
        }
    }

    pub(crate) fn script_ref(&self) -> Option<&dyn EntityScript> {
        self.script.as_deref()
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("position", &self.position)
            .field("layer", &self.layer)
            .field("order", &self.order)
            .field("flags", &self.flags)
            .field("id", &self.id)
            .field("components", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::registry::RegistryError;

    #[test]
    fn test_components_commit_on_drain() {
        let mut entity = Entity::at(5.0, 5.0);
        let collider = entity.add_component(Collider::rectangle(2.0, 2.0)).unwrap();
        let graphic = entity.add_component(Graphic::new("box", 2.0, 2.0)).unwrap();

        assert!(!entity.has_component(collider));
        assert_eq!(entity.first_collider(), Some(collider));

        entity.drain_components();
        assert_eq!(entity.component_ids(), &[collider, graphic]);
        assert_eq!(entity.colliders().count(), 1);
        assert_eq!(entity.graphics().map(|(id, _)| id).collect::<Vec<_>>(), vec![graphic]);
    }

    #[test]
    fn test_take_requires_detached() {
        let mut entity = Entity::new();
        let id = entity.add_component(Graphic::new("dot", 1.0, 1.0)).unwrap();
        assert_eq!(entity.take_component(id).unwrap_err(), SceneError::StillAttached);

        entity.drain_components();
        entity.remove_component(id).unwrap();
        assert_eq!(entity.take_component(id).unwrap_err(), SceneError::StillAttached);

        entity.drain_components();
        assert!(entity.take_component(id).unwrap().is_graphic());
        assert_eq!(entity.remove_component(id), Err(SceneError::UnknownComponent(id)));
    }

    #[test]
    fn test_clear_colliders_and_purge() {
        let mut entity = Entity::new();
        entity.add_component(Collider::circle(1.0)).unwrap();
        entity.add_component(Collider::circle(2.0)).unwrap();
        let graphic = entity.add_component(Graphic::new("dot", 1.0, 1.0)).unwrap();
        entity.drain_components();

        assert_eq!(entity.clear_colliders(), 2);
        assert_eq!(entity.pending_component_changes(), 2);
        entity.drain_components();

        assert_eq!(entity.first_collider(), None);
        assert_eq!(entity.purge_detached_components(), 2);
        assert_eq!(entity.component_ids(), &[graphic]);
    }

    #[test]
    fn test_reattach_detached_component() {
        let mut entity = Entity::new();
        let id = entity.add_component(Collider::circle(1.0)).unwrap();
        entity.drain_components();
        entity.remove_component(id).unwrap();
        entity.drain_components();

        entity.reattach_component(id).unwrap();
        assert_eq!(
            entity.reattach_component(id),
            Err(SceneError::Registry(RegistryError::DuplicateMembership))
        );
        entity.drain_components();
        assert!(entity.has_component(id));
    }
}
