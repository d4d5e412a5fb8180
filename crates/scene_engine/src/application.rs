//! Application trait and lifecycle management

use crate::render::DrawTarget;
use crate::scene::{FrameContext, Scene};

/// Application lifecycle trait
///
/// Implement this trait to hook game-wide logic around the active scene.
/// Every hook is optional; `()` is a valid application that does nothing.
pub trait Application {
    /// Called at the start of every update sequence, after input is polled
    ///
    /// # Arguments
    /// * `scene` - The active scene, if any
    /// * `frame` - Frame state; `frame.delta_time()` is the sequence length
    fn pre_update(&mut self, _scene: Option<&mut Scene>, _frame: &mut FrameContext) {}

    /// Called at the end of every update sequence, after the scene updated
    fn post_update(&mut self, _scene: Option<&mut Scene>, _frame: &mut FrameContext) {}

    /// Called once per rendered frame, before the scene draws
    fn render(&mut self, _scene: Option<&Scene>, _frame: &FrameContext, _draw: &mut dyn DrawTarget) {}

    /// Called when the scheduler shuts down, after the active scene ended
    fn cleanup(&mut self) {}
}

impl Application for () {}
