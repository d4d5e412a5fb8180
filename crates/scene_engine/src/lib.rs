//! # Scene Engine
//!
//! The core of a 2D game engine: a scene graph with deferred membership,
//! tag-indexed collision queries and a phased frame scheduler.
//!
//! ## Features
//!
//! - **Mutation-safe membership**: entities and components added or removed
//!   mid-iteration take effect at the next sync point
//! - **Ordered draw/update lists**: entities bucketed by layer and order
//! - **Collision queries**: shape-pair dispatch, tag broad phase and
//!   "what if it were here" position queries
//! - **Frame scheduling**: fixed or variable timestep with catch-up clamping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut scene = Scene::new();
//!     let mut ball = Entity::at(10.0, 10.0);
//!     ball.add_component(Collider::circle(4.0).with_tag(Tag::new("ball")))?;
//!     scene.add(ball)?;
//!
//!     let mut scheduler = FrameScheduler::new(EngineConfig::default())?;
//!     scheduler.switch_scene(scene);
//!     scheduler.start();
//!
//!     let mut draw = DrawList::new();
//!     scheduler.run_frame(1.0 / 60.0, &mut (), &NoInput, &mut draw)?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

mod application;
mod engine;

pub use application::Application;
pub use engine::{EngineConfig, EngineError, FrameScheduler, SchedulerState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::Animator,
        config::Config,
        foundation::{
            math::{Point2, Rect, Vec2},
            registry::{Change, Registry, RegistryError},
            time::FrameTimer,
        },
        input::{Axis, Button, Input, InputSource, KeyCode, MouseButton, NoInput},
        physics::{
            Candidates, Collider, ColliderRef, CollisionError, GridShape, PixelMask, PositionOverride,
            PreconditionError, Shape, ShapeKind, Tag,
        },
        render::{Color, DrawCall, DrawList, DrawTarget, Graphic},
        scene::{
            Component, ComponentContext, ComponentId, Entity, EntityContext, EntityId, EntityScript,
            FrameContext, RenderContext, Scene, SceneError, SceneScript, Script,
        },
        Application, EngineConfig, EngineError, FrameScheduler, SchedulerState,
    };
}
