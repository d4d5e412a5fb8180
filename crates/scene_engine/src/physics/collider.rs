//! Collider component data
//!
//! A collider is a shape plus the placement rules that turn an entity
//! position into a world-space top-left corner, and the tags that file it in
//! the scene's tag index.

use std::fmt;

use crate::foundation::math::{Point2, Rect, Vec2};
use crate::scene::{ComponentId, EntityId};
use super::collision::{GridShape, PixelMask, Shape, ShapeKind, WorldShape};

/// Collision group label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(&'static str);

impl Tag {
    /// Create a tag from a static name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The tag's name
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Address of a collider component inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderRef {
    /// Owning entity
    pub entity: EntityId,
    /// Collider component on that entity
    pub component: ComponentId,
}

impl ColliderRef {
    /// Create a new collider address
    pub const fn new(entity: EntityId, component: ComponentId) -> Self {
        Self { entity, component }
    }
}

/// Collision geometry attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    shape: Shape,
    tags: Vec<Tag>,
    /// Offset from the entity position (or absolute position when not relative)
    pub local: Vec2,
    /// Point of the shape placed at `local`; subtracted only when relative
    pub origin: Vec2,
    /// Follow the owning entity's position
    pub relative: bool,
}

impl Collider {
    /// Create a collider from any shape
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            tags: Vec::new(),
            local: Vec2::zeros(),
            origin: Vec2::zeros(),
            relative: true,
        }
    }

    /// Axis-aligned rectangle collider
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(Shape::Rectangle { width, height })
    }

    /// Circle collider; its bounding box starts at the collider position
    pub fn circle(radius: f32) -> Self {
        Self::new(Shape::Circle { radius })
    }

    /// Tile grid collider
    pub fn grid(grid: GridShape) -> Self {
        Self::new(Shape::Grid(grid))
    }

    /// Pixel mask collider
    pub fn pixel(mask: PixelMask) -> Self {
        Self::new(Shape::Pixel(mask))
    }

    /// Add a tag (builder form, before the collider joins a scene)
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.insert_tag(tag);
        self
    }

    /// Add several tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        for tag in tags {
            self.insert_tag(tag);
        }
        self
    }

    /// Set the local offset
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.local = Vec2::new(x, y);
        self
    }

    /// Set the origin
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vec2::new(x, y);
        self
    }

    /// Builder form of [`Collider::center_origin`]
    pub fn centered(mut self) -> Self {
        self.center_origin();
        self
    }

    /// Make the collider ignore the entity position
    pub fn absolute(mut self) -> Self {
        self.relative = false;
        self
    }

    /// Move the origin to the center of the shape's bounds
    pub fn center_origin(&mut self) {
        self.origin = self.shape.size() * 0.5;
    }

    /// Shape geometry
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable shape geometry (tile edits, mask edits)
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Shape kind used for dispatch
    pub const fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Width of the bounding box
    pub fn width(&self) -> f32 {
        self.shape.size().x
    }

    /// Height of the bounding box
    pub fn height(&self) -> f32 {
        self.shape.size().y
    }

    /// Tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Check if the collider carries `tag`
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// World-space top-left corner for an owner at `entity_position`
    pub fn world_position(&self, entity_position: Point2) -> Point2 {
        if self.relative {
            entity_position + self.local - self.origin
        } else {
            Point2::from(self.local)
        }
    }

    /// World-space bounding box for an owner at `entity_position`
    pub fn bounds(&self, entity_position: Point2) -> Rect {
        self.resolve(entity_position).bounds()
    }

    /// Place the shape in world space for a single test
    pub fn resolve(&self, entity_position: Point2) -> WorldShape<'_> {
        self.shape.at(self.world_position(entity_position))
    }

    /// Returns `true` if the tag was not present
    pub(crate) fn insert_tag(&mut self, tag: Tag) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Returns `true` if the tag was present
    pub(crate) fn remove_tag(&mut self, tag: Tag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| *existing != tag);
        self.tags.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SOLID: Tag = Tag::new("solid");
    const PLAYER: Tag = Tag::new("player");

    #[test]
    fn test_relative_position_subtracts_origin() {
        let collider = Collider::rectangle(10.0, 20.0).with_offset(2.0, 3.0).centered();
        let position = collider.world_position(Point2::new(100.0, 100.0));
        assert_relative_eq!(position.x, 97.0);
        assert_relative_eq!(position.y, 93.0);
    }

    #[test]
    fn test_absolute_position_ignores_entity() {
        let collider = Collider::circle(4.0).with_offset(5.0, 6.0).with_origin(1.0, 1.0).absolute();
        let bounds = collider.bounds(Point2::new(100.0, 100.0));
        assert_eq!(bounds, Rect::new(5.0, 6.0, 8.0, 8.0));
    }

    #[test]
    fn test_tags_are_a_set() {
        let mut collider = Collider::rectangle(1.0, 1.0).with_tags([SOLID, PLAYER, SOLID]);
        assert_eq!(collider.tags(), &[SOLID, PLAYER]);
        assert!(!collider.insert_tag(PLAYER));
        assert!(collider.remove_tag(SOLID));
        assert!(!collider.remove_tag(SOLID));
        assert!(!collider.has_tag(SOLID));
        assert_eq!(SOLID.to_string(), "solid");
    }
}
