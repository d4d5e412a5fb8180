//! Components attached to entities

use std::fmt;

use crate::physics::collider::Collider;
use crate::render::Graphic;
use super::context::{ComponentContext, RenderContext};
use super::{EntityId, StateFlags};

/// User behaviour attached to an entity as a component
///
/// Every hook is optional. Hooks receive the scene and frame state through
/// the context and may queue any structural change; those changes take
/// effect at the next sync point.
pub trait Script {
    /// The component became part of an entity that is in a scene
    fn attached(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// The component stopped being part of an entity that is in a scene
    fn detached(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Main-phase update, only while the component and its entity are enabled
    fn update(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Draw, only while the component and its entity are visible
    fn render(&self, _ctx: &mut RenderContext<'_>) {}
}

/// Stand-in kept in a script slot while the real script runs a hook
pub(crate) struct VacantScript;

impl Script for VacantScript {}

/// What a component is
pub enum ComponentKind {
    /// Collision geometry, filed in the scene's tag index
    Collider(Collider),
    /// Drawable, resolved into draw calls
    Graphic(Graphic),
    /// User behaviour
    Script(Box<dyn Script>),
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collider(collider) => f.debug_tuple("Collider").field(collider).finish(),
            Self::Graphic(graphic) => f.debug_tuple("Graphic").field(graphic).finish(),
            Self::Script(_) => f.write_str("Script(..)"),
        }
    }
}

/// A unit of data or behaviour owned by one entity
#[derive(Debug)]
pub struct Component {
    kind: ComponentKind,
    flags: StateFlags,
    timer: f32,
    entity: Option<EntityId>,
}

impl Component {
    /// Wrap a component kind
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            flags: StateFlags::default(),
            timer: 0.0,
            entity: None,
        }
    }

    /// Script component
    pub fn script(script: impl Script + 'static) -> Self {
        Self::new(ComponentKind::Script(Box::new(script)))
    }

    /// What this component is
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Collider data, if this is a collider
    pub const fn as_collider(&self) -> Option<&Collider> {
        match &self.kind {
            ComponentKind::Collider(collider) => Some(collider),
            _ => None,
        }
    }

    /// Mutable collider data; tags are changed through the scene
    pub fn as_collider_mut(&mut self) -> Option<&mut Collider> {
        match &mut self.kind {
            ComponentKind::Collider(collider) => Some(collider),
            _ => None,
        }
    }

    /// Graphic data, if this is a graphic
    pub const fn as_graphic(&self) -> Option<&Graphic> {
        match &self.kind {
            ComponentKind::Graphic(graphic) => Some(graphic),
            _ => None,
        }
    }

    /// Mutable graphic data
    pub fn as_graphic_mut(&mut self) -> Option<&mut Graphic> {
        match &mut self.kind {
            ComponentKind::Graphic(graphic) => Some(graphic),
            _ => None,
        }
    }

    /// Check if this is a collider
    pub const fn is_collider(&self) -> bool {
        matches!(self.kind, ComponentKind::Collider(_))
    }

    /// Check if this is a graphic
    pub const fn is_graphic(&self) -> bool {
        matches!(self.kind, ComponentKind::Graphic(_))
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

    /// Owning entity while attached inside a scene
    pub const fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub(crate) fn set_entity(&mut self, entity: Option<EntityId>) {
        self.entity = entity;
    }

    pub(crate) fn advance_timer(&mut self, delta_time: f32) {
        self.timer += delta_time;
    }

    /// Swap the script out of its slot for the duration of a hook
    pub(crate) fn take_script(&mut self) -> Option<Box<dyn Script>> {
        match &mut self.kind {
            ComponentKind::Script(script) => Some(std::mem::replace(script, Box::new(VacantScript))),
            _ => None,
        }
    }

    pub(crate) fn restore_script(&mut self, script: Box<dyn Script>) {
        if let ComponentKind::Script(slot) = &mut self.kind {
            *slot = script;
        }
    }
}

impl From<Collider> for Component {
    fn from(collider: Collider) -> Self {
        Self::new(ComponentKind::Collider(collider))
    }
}

impl From<Graphic> for Component {
    fn from(graphic: Graphic) -> Self {
        Self::new(ComponentKind::Graphic(graphic))
    }
}

impl From<Box<dyn Script>> for Component {
    fn from(script: Box<dyn Script>) -> Self {
        Self::new(ComponentKind::Script(script))
    }
}
