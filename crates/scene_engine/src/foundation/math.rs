//! Math utilities and types
//!
//! Provides the 2D math types used by the scene graph and the narrow phase.
//! Vector arithmetic comes from nalgebra; this module only adds the small
//! geometric helpers the collision handlers need.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Axis-aligned rectangle with half-open extents.
///
/// A rectangle covers `[left, right)` horizontally and `[top, bottom)`
/// vertically, so two rectangles that merely share an edge do not overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x: f32,
    /// Top edge (inclusive)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Left edge (inclusive)
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (inclusive)
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center of the rectangle
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if two rectangles overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Check if a point lies inside the rectangle
    pub fn contains_point(&self, point: Point2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// Distance from a point to the closest point of the rectangle (0 inside)
    pub fn distance_to_point(&self, point: Point2) -> f32 {
        let dx = (self.left() - point.x).max(0.0).max(point.x - self.right());
        let dy = (self.top() - point.y).max(0.0).max(point.y - self.bottom());
        dx.hypot(dy)
    }

    /// The four edges of the rectangle, clockwise from the top edge
    pub fn edges(&self) -> [Segment; 4] {
        let top_left = Point2::new(self.left(), self.top());
        let top_right = Point2::new(self.right(), self.top());
        let bottom_right = Point2::new(self.right(), self.bottom());
        let bottom_left = Point2::new(self.left(), self.bottom());
        [
            Segment::new(top_left, top_right),
            Segment::new(top_right, bottom_right),
            Segment::new(bottom_right, bottom_left),
            Segment::new(bottom_left, top_left),
        ]
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub start: Point2,
    /// End point
    pub end: Point2,
}

impl Segment {
    /// Create a new segment
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Closest point on the segment to `point`
    pub fn closest_point(&self, point: Point2) -> Point2 {
        let direction: Vec2 = self.end - self.start;
        let length_squared = direction.magnitude_squared();
        if length_squared <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(&direction) / length_squared).clamp(0.0, 1.0);
        self.start + direction * t
    }

    /// Check if the segment touches or crosses a circle
    pub fn intersects_circle(&self, center: Point2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        nalgebra::distance_squared(&closest, &center) <= radius * radius
    }
}

/// Snap `value` down to the nearest multiple of `step`
pub fn snap_to_grid(value: f32, step: f32) -> f32 {
    (value / step).floor() * step
}
