//! Collision shape abstractions
//!
//! Shapes are stored in local space (size only, no position) on the
//! collider. A [`WorldShape`] pairs a shape with its resolved world-space
//! top-left corner for the duration of a single test.

use crate::foundation::math::{Point2, Rect, Vec2};
use super::grid::GridShape;
use super::pixel::PixelMask;

/// Closed set of shape kinds, used to index the collision handler table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    Rectangle,
    /// Circle
    Circle,
    /// Grid of solid/empty tiles
    Grid,
    /// Per-pixel alpha mask
    Pixel,
}

impl ShapeKind {
    /// Number of shape kinds
    pub const COUNT: usize = 4;

    /// Every shape kind, in ordinal order
    pub const ALL: [ShapeKind; Self::COUNT] = [Self::Rectangle, Self::Circle, Self::Grid, Self::Pixel];

    /// Index of this kind in the handler table
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

/// Collision shape geometry (local space)
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle
    Rectangle {
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Circle whose bounding box starts at the collider position
    Circle {
        /// Radius
        radius: f32,
    },
    /// Tile grid
    Grid(GridShape),
    /// Pixel mask
    Pixel(PixelMask),
}

impl Shape {
    /// Kind tag used for handler dispatch
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Grid(_) => ShapeKind::Grid,
            Self::Pixel(_) => ShapeKind::Pixel,
        }
    }

    /// Size of the shape's bounding box
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Rectangle { width, height } => Vec2::new(*width, *height),
            Self::Circle { radius } => Vec2::new(radius * 2.0, radius * 2.0),
            Self::Grid(grid) => Vec2::new(grid.width(), grid.height()),
            Self::Pixel(mask) => Vec2::new(mask.width() as f32, mask.height() as f32),
        }
    }

    /// Place this shape at a world-space top-left corner
    pub const fn at(&self, position: Point2) -> WorldShape<'_> {
        WorldShape { shape: self, position }
    }
}

/// A shape resolved to world space (temporary, for testing only)
#[derive(Debug, Clone, Copy)]
pub struct WorldShape<'a> {
    /// Shape geometry
    pub shape: &'a Shape,
    /// World-space top-left corner of the bounding box
    pub position: Point2,
}

impl WorldShape<'_> {
    /// Kind of the underlying shape
    pub const fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// World-space bounding box
    pub fn bounds(&self) -> Rect {
        let size = self.shape.size();
        Rect::new(self.position.x, self.position.y, size.x, size.y)
    }

    /// World-space center of the bounding box
    pub fn center(&self) -> Point2 {
        self.bounds().center()
    }
}
