//! Context objects handed to hooks
//!
//! Hooks never reach global state. Everything a hook may read or change is
//! passed in: the scene (for lookups, queries and structural changes) and
//! the frame state (delta time, input, scene switch requests).

use std::fmt;

use crate::input::Input;
use crate::physics::collider::ColliderRef;
use crate::render::DrawTarget;
use super::{Component, ComponentId, Entity, EntityId, Scene};

/// Per-frame state owned by the scheduler
#[derive(Default)]
pub struct FrameContext {
    delta_time: f32,
    elapsed: f32,
    input: Input,
    pending_switch: Option<Scene>,
}

impl FrameContext {
    /// Create a context with zero delta time and no input bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a fixed delta time
    pub fn with_delta_time(delta_time: f32) -> Self {
        Self {
            delta_time,
            ..Self::default()
        }
    }

    /// Seconds covered by the current update sequence
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds of simulated time since the scheduler started
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Logical input state
    pub const fn input(&self) -> &Input {
        &self.input
    }

    /// Logical input state, for registering bindings
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Ask the scheduler to switch to `scene` at the next switch point
    ///
    /// A later request in the same sequence replaces an earlier one.
    pub fn request_switch(&mut self, scene: Scene) {
        if self.pending_switch.is_some() {
            log::debug!("Replacing pending scene switch request");
        }
        self.pending_switch = Some(scene);
    }

    /// Check if a switch is waiting
    pub const fn has_pending_switch(&self) -> bool {
        self.pending_switch.is_some()
    }

    pub(crate) fn take_switch(&mut self) -> Option<Scene> {
        self.pending_switch.take()
    }

    pub(crate) fn begin_sequence(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.elapsed += delta_time;
    }
}

impl fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("delta_time", &self.delta_time)
            .field("elapsed", &self.elapsed)
            .field("pending_switch", &self.pending_switch.is_some())
            .finish_non_exhaustive()
    }
}

/// Context for component script hooks
pub struct ComponentContext<'a> {
    /// Scene the component lives in
    pub scene: &'a mut Scene,
    /// Frame state
    pub frame: &'a mut FrameContext,
    /// Owning entity
    pub entity: EntityId,
    /// The component running the hook
    pub component: ComponentId,
}

impl ComponentContext<'_> {
    /// Seconds covered by the current update sequence
    pub fn delta_time(&self) -> f32 {
        self.frame.delta_time()
    }

    /// Owning entity
    pub fn entity(&self) -> Option<&Entity> {
        self.scene.entity(self.entity)
    }

    /// Owning entity, mutably
    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        self.scene.entity_mut(self.entity)
    }

    /// The component running the hook (its script slot is vacant meanwhile)
    pub fn component(&self) -> Option<&Component> {
        self.entity()?.component(self.component)
    }

    /// Address of a collider on the owning entity
    pub const fn collider(&self, component: ComponentId) -> ColliderRef {
        ColliderRef::new(self.entity, component)
    }
}

/// Context for entity script hooks
pub struct EntityContext<'a> {
    /// Scene the entity lives in
    pub scene: &'a mut Scene,
    /// Frame state
    pub frame: &'a mut FrameContext,
    /// The entity running the hook (its script slot is empty meanwhile)
    pub entity: EntityId,
}

impl EntityContext<'_> {
    /// Seconds covered by the current update sequence
    pub fn delta_time(&self) -> f32 {
        self.frame.delta_time()
    }

    /// The entity running the hook
    pub fn this(&self) -> Option<&Entity> {
        self.scene.entity(self.entity)
    }

    /// The entity running the hook, mutably
    pub fn this_mut(&mut self) -> Option<&mut Entity> {
        self.scene.entity_mut(self.entity)
    }
}

/// Context for render hooks
pub struct RenderContext<'a> {
    /// Scene being drawn
    pub scene: &'a Scene,
    /// Frame state
    pub frame: &'a FrameContext,
    /// Backend sink
    pub draw: &'a mut dyn DrawTarget,
    /// Entity being drawn; `None` for scene-level hooks
    pub entity: Option<EntityId>,
}

impl RenderContext<'_> {
    /// Entity being drawn
    pub fn this(&self) -> Option<&Entity> {
        self.scene.entity(self.entity?)
    }
}
