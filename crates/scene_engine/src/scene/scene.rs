//! Scenes: the unit the frame scheduler updates and renders

use std::fmt;

use slotmap::SlotMap;

use crate::animation::Animator;
use crate::foundation::ordered_index::OrderedIndex;
use crate::foundation::registry::Registry;
use crate::physics::collider::{Collider, ColliderRef, Tag};
use crate::physics::query::{CollisionError, PreconditionError};
use crate::physics::tag_index::TagIndex;
use crate::render::DrawTarget;
use super::component::{ComponentKind, Script};
use super::context::{ComponentContext, EntityContext, FrameContext, RenderContext};
use super::entity::EntityScript;
use super::{ComponentId, Entity, EntityId, SceneError};

/// User behaviour attached to a scene
pub trait SceneScript {
    /// The scene became active, after its initial sync
    fn begin(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {}

    /// The scene is being switched out, before its final sync
    fn end(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {}

    /// After every entity's first phase
    fn update_first(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {}

    /// After every entity's main phase
    fn update(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {}

    /// After every entity's last phase and re-bucketing
    fn update_last(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {}

    /// Draw after every entity
    fn render(&self, _ctx: &mut RenderContext<'_>) {}
}

/// A set of entities updated and rendered together
///
/// Entities are stored in the scene and their membership is deferred:
/// [`Scene::add`] and [`Scene::remove`] queue the change and the next
/// [`Scene::sync`] commits it. Removed entities stay stored, detached,
/// until [`Scene::take`] or [`Scene::purge_detached`].
pub struct Scene {
    entities: SlotMap<EntityId, Entity>,
    registry: Registry<EntityId>,
    layers: OrderedIndex<EntityId>,
    orders: OrderedIndex<EntityId>,
    tags: TagIndex,
    script: Option<Box<dyn SceneScript>>,
    animator: Option<Box<dyn Animator>>,
    timer: f32,
    active: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            registry: Registry::new(),
            layers: OrderedIndex::new(),
            orders: OrderedIndex::new(),
            tags: TagIndex::new(),
            script: None,
            animator: None,
            timer: 0.0,
            active: false,
        }
    }

    /// Attach a scene script
    pub fn with_script(mut self, script: impl SceneScript + 'static) -> Self {
        self.script = Some(Box::new(script));
        self
    }

    /// Replace the scene script
    pub fn set_script(&mut self, script: Option<Box<dyn SceneScript>>) {
        self.script = script;
    }

    /// Attach a scene-level animator
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Replace the scene-level animator
    pub fn set_animator(&mut self, animator: Option<Box<dyn Animator>>) {
        self.animator = animator;
    }

    // ---- membership ----

    /// Store an entity and queue it for addition
    pub fn add(&mut self, entity: Entity) -> Result<EntityId, SceneError> {
        let id = self.entities.insert(entity);
        self.registry.add(id)?;
        Ok(id)
    }

    /// Queue a stored, detached entity for addition again
    pub fn add_existing(&mut self, id: EntityId) -> Result<(), SceneError> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::UnknownEntity(id));
        }
        self.registry.add(id)?;
        Ok(())
    }

    /// Queue an entity for removal
    ///
    /// Removing an entity that is only pending addition cancels the addition
    /// and no hooks fire for it.
    pub fn remove(&mut self, id: EntityId) -> Result<(), SceneError> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::UnknownEntity(id));
        }
        self.registry.remove(id)?;
        Ok(())
    }

    /// Take a detached entity out of storage
    pub fn take(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::UnknownEntity(id));
        }
        if self.registry.contains(id) || self.registry.is_pending_add(id) {
            return Err(SceneError::StillAttached);
        }
        self.entities.remove(id).ok_or(SceneError::UnknownEntity(id))
    }

    /// Drop every detached entity, returning how many were dropped
    pub fn purge_detached(&mut self) -> usize {
        let registry = &self.registry;
        let before = self.entities.len();
        self.entities
            .retain(|id, _| registry.contains(id) || registry.is_pending_add(id));
        before - self.entities.len()
    }

    /// Get a stored entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a stored entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Check if an entity is committed
    pub fn contains(&self, id: EntityId) -> bool {
        self.registry.contains(id)
    }

    /// Committed entity ids in commit order
    pub fn entities(&self) -> &[EntityId] {
        self.registry.as_slice()
    }

    /// Number of committed entities
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of queued entity changes
    pub fn pending_changes(&self) -> usize {
        self.registry.pending_len()
    }

    /// Committed entities in render order (highest layer first)
    pub fn render_order(&self) -> Vec<EntityId> {
        self.layers.to_vec()
    }

    /// Committed entities in update order (highest order first)
    pub fn update_order(&self) -> Vec<EntityId> {
        self.orders.to_vec()
    }

    /// Tag index of live colliders
    pub const fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    /// Check if a collider is committed to an entity committed to this scene
    pub fn is_live(&self, collider: ColliderRef) -> bool {
        self.registry.contains(collider.entity)
            && self
                .entities
                .get(collider.entity)
                .is_some_and(|entity| entity.has_component(collider.component))
    }

    /// Seconds this scene has been updated for
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Check if the scheduler is currently running this scene
    pub const fn is_active(&self) -> bool {
        self.active
    }

    // ---- draw order within a layer ----

    /// Draw an entity last within its layer
    pub fn bring_to_front(&mut self, id: EntityId) -> bool {
        self.layers.to_front(id)
    }

    /// Draw an entity first within its layer
    pub fn send_to_back(&mut self, id: EntityId) -> bool {
        self.layers.to_back(id)
    }

    /// Draw an entity one place later within its layer
    pub fn bring_forward(&mut self, id: EntityId) -> bool {
        self.layers.forward(id)
    }

    /// Draw an entity one place earlier within its layer
    pub fn send_backward(&mut self, id: EntityId) -> bool {
        self.layers.backward(id)
    }

    // ---- tags ----

    /// Add a tag to a stored collider, filing it immediately if live
    pub fn add_tag(&mut self, collider: ColliderRef, tag: Tag) -> Result<bool, CollisionError> {
        let live = self.is_live(collider);
        let shape = self.collider_mut(collider)?;
        let inserted = shape.insert_tag(tag);
        if live {
            self.tags.insert(tag, collider);
        }
        Ok(inserted)
    }

    /// Remove a tag from a stored collider, unfiling it immediately
    pub fn remove_tag(&mut self, collider: ColliderRef, tag: Tag) -> Result<bool, CollisionError> {
        let shape = self.collider_mut(collider)?;
        let removed = shape.remove_tag(tag);
        self.tags.remove(tag, collider);
        Ok(removed)
    }

    fn collider_mut(&mut self, collider: ColliderRef) -> Result<&mut Collider, PreconditionError> {
        let ColliderRef { entity, component } = collider;
        self.entities
            .get_mut(entity)
            .ok_or(PreconditionError::UnknownEntity(entity))?
            .component_mut(component)
            .ok_or(PreconditionError::NotAttached { entity, component })?
            .as_collider_mut()
            .ok_or(PreconditionError::NotACollider { entity, component })
    }

    // ---- lifecycle ----

    /// Initial sync and begin hook; called when the scene is switched in
    pub fn begin(&mut self, frame: &mut FrameContext) {
        self.active = true;
        self.sync(frame);
        self.run_scene_hook(frame, |script, scene, frame| script.begin(scene, frame));
    }

    /// End hook and final sync; called when the scene is switched out
    pub fn end(&mut self, frame: &mut FrameContext) {
        self.run_scene_hook(frame, |script, scene, frame| script.end(scene, frame));
        self.sync(frame);
        self.active = false;
    }

    /// Commit queued entity changes and fire their hooks
    ///
    /// Every removal, hooks included, completes before any addition is
    /// committed. A removed entity's components are detached (hooks fire,
    /// tags unfiled) before its `removed` hook; an added entity's `added`
    /// hook fires before its components attach.
    pub fn sync(&mut self, frame: &mut FrameContext) {
        for id in self.registry.drain_removals() {
            self.detach_entity(id, frame);
        }
        for id in self.registry.drain_additions() {
            self.attach_entity(id, frame);
        }
    }

    /// Run one update sequence
    pub fn update(&mut self, frame: &mut FrameContext) {
        let delta_time = frame.delta_time();
        self.sync(frame);

        for id in self.orders.to_vec() {
            if !self.is_enabled_member(id) {
                continue;
            }
            self.sync_components(id, frame);
            self.run_entity_hook(id, frame, |script, ctx| script.update_first(ctx));
        }
        self.run_scene_hook(frame, |script, scene, frame| script.update_first(scene, frame));

        if let Some(animator) = self.animator.as_mut() {
            animator.advance(delta_time);
        }

        for id in self.orders.to_vec() {
            if !self.is_enabled_member(id) {
                continue;
            }
            if let Some(entity) = self.entities.get_mut(id) {
                entity.advance_animator(delta_time);
            }
            self.sync_components(id, frame);
            self.run_entity_hook(id, frame, |script, ctx| script.update(ctx));
            self.update_components(id, frame);
            self.sync_components(id, frame);
        }
        self.run_scene_hook(frame, |script, scene, frame| script.update(scene, frame));

        for id in self.orders.to_vec() {
            if !self.is_enabled_member(id) {
                continue;
            }
            self.sync_components(id, frame);
            self.run_entity_hook(id, frame, |script, ctx| script.update_last(ctx));
            if let Some(entity) = self.entities.get_mut(id) {
                entity.advance_timer(delta_time);
            }
        }
        self.refresh_indices();
        self.run_scene_hook(frame, |script, scene, frame| script.update_last(scene, frame));

        self.timer += delta_time;
    }

    /// Draw visible entities, highest layer first, then the scene hook
    pub fn render(&self, frame: &FrameContext, draw: &mut dyn DrawTarget) {
        for id in self.layers.iter() {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if !entity.is_visible() {
                continue;
            }

            for (_, component) in entity.components() {
                if !component.is_visible() {
                    continue;
                }
                match component.kind() {
                    ComponentKind::Graphic(graphic) => draw.draw(&graphic.draw_call(entity.position)),
                    ComponentKind::Script(script) => script.render(&mut RenderContext {
                        scene: self,
                        frame,
                        draw: &mut *draw,
                        entity: Some(id),
                    }),
                    ComponentKind::Collider(_) => {}
                }
            }

            if let Some(script) = entity.script_ref() {
                script.render(&mut RenderContext {
                    scene: self,
                    frame,
                    draw: &mut *draw,
                    entity: Some(id),
                });
            }
        }

        if let Some(script) = self.script.as_deref() {
            script.render(&mut RenderContext {
                scene: self,
                frame,
                draw,
                entity: None,
            });
        }
    }

    // ---- internals ----

    fn is_enabled_member(&self, id: EntityId) -> bool {
        self.registry.contains(id) && self.entities.get(id).is_some_and(Entity::is_enabled)
    }

    fn attach_entity(&mut self, id: EntityId, frame: &mut FrameContext) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.set_id(Some(id));
        self.layers.insert(id, entity.layer);
        self.orders.insert(id, entity.order);
        log::debug!("Entity {:?} added to scene (layer {}, order {})", id, entity.layer, entity.order);

        self.run_entity_hook(id, frame, |script, ctx| script.added(ctx));

        // Changes queued while outside a scene never fired hooks
        if let Some(entity) = self.entities.get_mut(id) {
            entity.drain_components();
        }
        let components = self.component_ids(id);
        for component in components {
            self.attach_component(id, component, frame);
        }
    }

    fn detach_entity(&mut self, id: EntityId, frame: &mut FrameContext) {
        let components = self.component_ids(id);
        for component in components {
            self.detach_component(id, component, frame);
        }

        self.run_entity_hook(id, frame, |script, ctx| script.removed(ctx));

        self.layers.remove(id);
        self.orders.remove(id);
        self.tags.remove_entity(id);
        if let Some(entity) = self.entities.get_mut(id) {
            entity.set_id(None);
        }
        log::debug!("Entity {:?} removed from scene", id);
    }

    fn sync_components(&mut self, id: EntityId, frame: &mut FrameContext) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        if entity.pending_component_changes() == 0 {
            return;
        }
        let removed = entity.drain_component_removals();
        if self.registry.contains(id) {
            for component in removed {
                self.detach_component(id, component, frame);
            }
        }

        let added = self
            .entities
            .get_mut(id)
            .map(Entity::drain_component_additions)
            .unwrap_or_default();
        if self.registry.contains(id) {
            for component in added {
                self.attach_component(id, component, frame);
            }
        }
    }

    fn attach_component(&mut self, id: EntityId, component: ComponentId, frame: &mut FrameContext) {
        let Some(slot) = self.entities.get_mut(id).and_then(|entity| entity.component_mut(component)) else {
            return;
        };
        slot.set_entity(Some(id));
        if let Some(collider) = slot.as_collider() {
            for tag in collider.tags() {
                self.tags.insert(*tag, ColliderRef::new(id, component));
            }
        }
        self.run_component_hook(id, component, frame, |script, ctx| script.attached(ctx));
    }

    fn detach_component(&mut self, id: EntityId, component: ComponentId, frame: &mut FrameContext) {
        self.run_component_hook(id, component, frame, |script, ctx| script.detached(ctx));
        self.tags.remove_all(ColliderRef::new(id, component));
        if let Some(slot) = self.entities.get_mut(id).and_then(|entity| entity.component_mut(component)) {
            slot.set_entity(None);
        }
    }

    fn update_components(&mut self, id: EntityId, frame: &mut FrameContext) {
        let delta_time = frame.delta_time();
        for component in self.component_ids(id) {
            let Some(slot) = self.entities.get_mut(id).and_then(|entity| entity.component_mut(component)) else {
                continue;
            };
            if !slot.is_enabled() {
                continue;
            }
            slot.advance_timer(delta_time);
            self.run_component_hook(id, component, frame, |script, ctx| script.update(ctx));
        }
    }

    fn refresh_indices(&mut self) {
        let entities = &self.entities;
        let moved = self.layers.refresh(|id| entities.get(id).map(|entity| entity.layer))
            + self.orders.refresh(|id| entities.get(id).map(|entity| entity.order));
        if moved > 0 {
            log::trace!("Re-bucketed {} entity index entries", moved);
        }
    }

    fn component_ids(&self, id: EntityId) -> Vec<ComponentId> {
        self.entities
            .get(id)
            .map(|entity| entity.component_ids().to_vec())
            .unwrap_or_default()
    }

    fn run_component_hook(
        &mut self,
        entity: EntityId,
        component: ComponentId,
        frame: &mut FrameContext,
        hook: impl FnOnce(&mut dyn Script, &mut ComponentContext<'_>),
    ) {
        let Some(mut script) = self
            .entities
            .get_mut(entity)
            .and_then(|owner| owner.component_mut(component))
            .and_then(|slot| slot.take_script())
        else {
            return;
        };

        hook(
            script.as_mut(),
            &mut ComponentContext {
                scene: self,
                frame,
                entity,
                component,
            },
        );

        if let Some(slot) = self.entities.get_mut(entity).and_then(|owner| owner.component_mut(component)) {
            slot.restore_script(script);
        }
    }

    fn run_entity_hook(
        &mut self,
        entity: EntityId,
        frame: &mut FrameContext,
        hook: impl FnOnce(&mut dyn EntityScript, &mut EntityContext<'_>),
    ) {
        let Some(mut script) = self.entities.get_mut(entity).and_then(Entity::take_script) else {
            return;
        };

        hook(
            script.as_mut(),
            &mut EntityContext {
                scene: self,
                frame,
                entity,
            },
        );

        if let Some(owner) = self.entities.get_mut(entity) {
            owner.restore_script(script);
        }
    }

    fn run_scene_hook(
        &mut self,
        frame: &mut FrameContext,
        hook: impl FnOnce(&mut dyn SceneScript, &mut Scene, &mut FrameContext),
    ) {
        let Some(mut script) = self.script.take() else {
            return;
        };
        hook(script.as_mut(), self, frame);
        // A hook may have installed a replacement
        if self.script.is_none() {
            self.script = Some(script);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.registry.len())
            .field("stored", &self.entities.len())
            .field("pending", &self.registry.pending_len())
            .field("tags", &self.tags.len())
            .field("timer", &self.timer)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
