//! Graphic component data

use crate::foundation::math::{Point2, Vec2};
use super::{Color, DrawCall};

/// Something drawable attached to an entity
///
/// The graphic does not own pixels; `source` is a key the backend resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    /// Backend source key
    pub source: String,
    /// Unscaled size
    pub size: Vec2,
    /// Offset from the entity position (or absolute position when not relative)
    pub local: Vec2,
    /// Point of the graphic placed at `local`
    pub origin: Vec2,
    /// Scale factors
    pub scale: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Tint
    pub color: Color,
    /// Follow the owning entity's position
    pub relative: bool,
}

impl Graphic {
    /// Create a graphic for a source key and size
    pub fn new(source: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            source: source.into(),
            size: Vec2::new(width, height),
            local: Vec2::zeros(),
            origin: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            color: Color::WHITE,
            relative: true,
        }
    }

    /// Set the local offset
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.local = Vec2::new(x, y);
        self
    }

    /// Set the tint
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set a uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder form of [`Graphic::center_origin`]
    pub fn centered(mut self) -> Self {
        self.center_origin();
        self
    }

    /// Make the graphic ignore the entity position
    pub fn absolute(mut self) -> Self {
        self.relative = false;
        self
    }

    /// Move the origin to the center of the graphic
    pub fn center_origin(&mut self) {
        self.origin = self.size * 0.5;
    }

    /// Position the backend should draw at
    pub fn render_position(&self, entity_position: Point2) -> Point2 {
        if self.relative {
            entity_position + self.local - self.origin
        } else {
            Point2::from(self.local - self.origin)
        }
    }

    /// Resolve into a draw call for an owner at `entity_position`
    pub fn draw_call(&self, entity_position: Point2) -> DrawCall {
        DrawCall {
            source: self.source.clone(),
            position: self.render_position(entity_position),
            size: self.size,
            scale: self.scale,
            rotation: self.rotation,
            origin: self.origin,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_render_position() {
        let graphic = Graphic::new("ship", 16.0, 8.0).with_offset(1.0, 1.0).centered();
        let call = graphic.draw_call(Point2::new(50.0, 50.0));
        assert_relative_eq!(call.position.x, 43.0);
        assert_relative_eq!(call.position.y, 47.0);
        assert_eq!(call.source, "ship");
    }

    #[test]
    fn test_absolute_render_position_still_uses_origin() {
        let graphic = Graphic::new("hud", 10.0, 10.0).with_offset(20.0, 30.0).centered().absolute();
        let position = graphic.render_position(Point2::new(500.0, 500.0));
        assert_relative_eq!(position.x, 15.0);
        assert_relative_eq!(position.y, 25.0);
    }
}
