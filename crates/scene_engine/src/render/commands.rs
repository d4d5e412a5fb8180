//! Draw command pattern for the backend boundary
//!
//! The scene graph resolves everything a backend needs (source key, final
//! position, size, transform parameters, tint) into a [`DrawCall`] and hands
//! it to a [`DrawTarget`] in back-to-front order.
//!
//! # Design Philosophy
//!
//! The backend should be a passive sink that:
//! - Accepts resolved world positions (no entity lookup)
//! - Accepts opaque source keys (no asset management)
//! - Only draws (no lifecycle, input, or timing)

use crate::foundation::math::{Point2, Vec2};
use super::Color;

/// A single resolved draw request
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Backend-defined source key (texture name, glyph atlas, primitive)
    pub source: String,

    /// World-space position of the graphic's origin-adjusted top-left corner
    pub position: Point2,

    /// Unscaled size
    pub size: Vec2,

    /// Scale factors
    pub scale: Vec2,

    /// Rotation in degrees
    pub rotation: f32,

    /// Pivot for scale and rotation, relative to `position`
    pub origin: Vec2,

    /// Tint
    pub color: Color,
}

/// Receiver of draw calls
pub trait DrawTarget {
    /// Draw one call; calls arrive back to front
    fn draw(&mut self, call: &DrawCall);
}

/// Draw target that records calls, used by headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Recorded calls in submission order
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            calls: Vec::with_capacity(capacity),
        }
    }

    /// Drop all recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Source keys in submission order
    pub fn sources(&self) -> Vec<&str> {
        self.calls.iter().map(|call| call.source.as_str()).collect()
    }
}

impl DrawTarget for DrawList {
    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(call.clone());
    }
}
