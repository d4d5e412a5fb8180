//! Frame scheduler
//!
//! The scheduler owns the active scene and the per-frame state and turns
//! real elapsed time into update sequences. Each sequence runs, in order:
//! scene switch check, input poll, application pre-update, game animator,
//! the scene's phased update, application post-update. Rendering is a
//! separate call so hosts can decouple it from stepping.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::Animator;
use crate::application::Application;
use crate::config::{Config, ConfigError};
use crate::foundation::time::FrameTimer;
use crate::input::InputSource;
use crate::physics::query::CollisionError;
use crate::render::DrawTarget;
use crate::scene::{FrameContext, Scene, SceneError};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not started, or shut down
    Idle,
    /// Stepping the active scene
    Running,
    /// Ending the outgoing scene and beginning the incoming one
    Switching,
}

/// Frame scheduler driving the active scene
pub struct FrameScheduler {
    config: EngineConfig,
    state: SchedulerState,
    scene: Option<Scene>,
    frame: FrameContext,
    timer: FrameTimer,
    accumulator: f32,
    animator: Option<Box<dyn Animator>>,
}

impl FrameScheduler {
    /// Create an idle scheduler
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SchedulerState::Idle,
            scene: None,
            frame: FrameContext::new(),
            timer: FrameTimer::new(),
            accumulator: 0.0,
            animator: None,
        })
    }

    /// Create an idle scheduler from a TOML or RON config file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Self::new(EngineConfig::load_from_file(path)?)
    }

    /// Start stepping
    pub fn start(&mut self) {
        if self.state != SchedulerState::Idle {
            return;
        }
        log::info!(
            "Starting frame scheduler ({} fps, {} step)",
            self.config.target_fps,
            if self.config.fixed_timestep { "fixed" } else { "variable" }
        );
        self.accumulator = 0.0;
        self.state = SchedulerState::Running;
    }

    /// Request a switch to `scene` at the next switch point
    pub fn switch_scene(&mut self, scene: Scene) {
        self.frame.request_switch(scene);
    }

    /// Set the game-level animator, advanced once per update sequence
    pub fn set_animator(&mut self, animator: Option<Box<dyn Animator>>) {
        self.animator = animator;
    }

    /// Feed real elapsed time and run the update sequences it pays for
    ///
    /// Returns the number of sequences run. With a fixed timestep, time
    /// beyond `max_catch_up_steps` steps is dropped; with a variable
    /// timestep exactly one sequence runs.
    pub fn advance<A: Application + ?Sized>(
        &mut self,
        real_delta: f32,
        app: &mut A,
        input: &dyn InputSource,
    ) -> Result<usize, EngineError> {
        if self.state == SchedulerState::Idle {
            return Err(EngineError::NotRunning);
        }
        self.timer.tick(real_delta);
        self.apply_switch();

        if !self.config.fixed_timestep {
            self.run_sequence(real_delta, app, input);
            return Ok(1);
        }

        let step = self.config.step();
        let limit = step * self.config.max_catch_up_steps as f32;
        self.accumulator += real_delta.max(0.0);
        if self.accumulator > limit {
            log::warn!("Dropping {:.4}s of simulation time to catch up", self.accumulator - limit);
            self.accumulator = limit;
        }

        let mut steps = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            self.run_sequence(step, app, input);
            steps += 1;
        }
        Ok(steps)
    }

    /// Render the application overlay and the active scene once
    pub fn render<A: Application + ?Sized>(&mut self, app: &mut A, draw: &mut dyn DrawTarget) {
        app.render(self.scene.as_ref(), &self.frame, draw);
        if let Some(scene) = &self.scene {
            scene.render(&self.frame, draw);
        }
        self.timer.frame_rendered();
    }

    /// [`advance`](Self::advance) followed by [`render`](Self::render)
    pub fn run_frame<A: Application + ?Sized>(
        &mut self,
        real_delta: f32,
        app: &mut A,
        input: &dyn InputSource,
        draw: &mut dyn DrawTarget,
    ) -> Result<usize, EngineError> {
        let steps = self.advance(real_delta, app, input)?;
        self.render(app, draw);
        Ok(steps)
    }

    /// End the active scene and stop stepping
    ///
    /// Returns the scene that was active. A switch still pending, including
    /// one requested by the `end` hook, is discarded.
    pub fn shutdown<A: Application + ?Sized>(&mut self, app: &mut A) -> Option<Scene> {
        let mut scene = self.scene.take();
        if let Some(scene) = scene.as_mut() {
            scene.end(&mut self.frame);
        }
        app.cleanup();
        if self.frame.take_switch().is_some() {
            log::debug!("Discarding pending scene switch on shutdown");
        }
        self.state = SchedulerState::Idle;
        log::info!("Frame scheduler shut down after {} frame(s)", self.timer.frame_count());
        scene
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Active scene
    pub const fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Active scene, mutably
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Frame state shared with hooks
    pub const fn frame(&self) -> &FrameContext {
        &self.frame
    }

    /// Frame state, for registering input bindings
    pub fn frame_mut(&mut self) -> &mut FrameContext {
        &mut self.frame
    }

    /// Real-time statistics
    pub const fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Unconsumed simulation time
    pub const fn accumulator(&self) -> f32 {
        self.accumulator
    }

    fn run_sequence<A: Application + ?Sized>(&mut self, delta_time: f32, app: &mut A, input: &dyn InputSource) {
        self.apply_switch();
        self.frame.begin_sequence(delta_time);
        self.frame.input_mut().poll(input);

        app.pre_update(self.scene.as_mut(), &mut self.frame);
        if let Some(animator) = self.animator.as_mut() {
            animator.advance(delta_time);
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.update(&mut self.frame);
        }
        app.post_update(self.scene.as_mut(), &mut self.frame);
    }

    fn apply_switch(&mut self) {
        let Some(mut incoming) = self.frame.take_switch() else {
            return;
        };
        let resume = self.state;
        self.state = SchedulerState::Switching;

        if let Some(mut outgoing) = self.scene.take() {
            outgoing.end(&mut self.frame);
            log::debug!("Scene ended with {} entities", outgoing.entity_count());
        }
        incoming.begin(&mut self.frame);
        log::debug!("Scene began with {} entities", incoming.entity_count());
        self.scene = Some(incoming);

        self.state = resume;
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Update sequences per second with a fixed timestep
    pub target_fps: u32,

    /// Step in `1 / target_fps` increments instead of once per advance
    pub fixed_timestep: bool,

    /// Most fixed steps a single advance may run
    pub max_catch_up_steps: u32,
}

impl EngineConfig {
    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_fps == 0 {
            return Err(EngineError::InvalidConfig("target_fps must be positive".to_string()));
        }
        if self.fixed_timestep && self.max_catch_up_steps == 0 {
            return Err(EngineError::InvalidConfig(
                "max_catch_up_steps must be positive with a fixed timestep".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            fixed_timestep: true,
            max_catch_up_steps: 2,
        }
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Collision query error
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// The scheduler was stepped before `start` or after `shutdown`
    #[error("Frame scheduler is not running")]
    NotRunning,
}
