//! Shape-pair dispatch table and narrow-phase handlers
//!
//! Every supported pair of [`ShapeKind`]s is listed once in [`HANDLERS`].
//! The table built from that list is indexed by kind ordinals; a lookup for
//! `(a, b)` falls back to the handler registered for `(b, a)` with the
//! arguments swapped. Pairs with no handler in either order never overlap.
//!
//! Unregistered pairs are a deliberate default, but they also hide a
//! forgotten registration, so the first test of each such pair logs a
//! warning.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use crate::foundation::math::{Point2, Rect};
use super::shape::{Shape, ShapeKind, WorldShape};

/// Narrow-phase overlap predicate
pub type OverlapHandler = fn(&WorldShape<'_>, &WorldShape<'_>) -> bool;

/// Statically declared handlers, first entry for a pair wins
pub const HANDLERS: &[(ShapeKind, ShapeKind, OverlapHandler)] = &[
    (ShapeKind::Rectangle, ShapeKind::Rectangle, rect_rect),
    (ShapeKind::Circle, ShapeKind::Circle, circle_circle),
    (ShapeKind::Rectangle, ShapeKind::Circle, rect_circle),
    (ShapeKind::Rectangle, ShapeKind::Grid, rect_grid),
    (ShapeKind::Circle, ShapeKind::Grid, circle_grid),
    (ShapeKind::Grid, ShapeKind::Grid, grid_grid),
    (ShapeKind::Rectangle, ShapeKind::Pixel, rect_pixel),
    (ShapeKind::Pixel, ShapeKind::Pixel, pixel_pixel),
];

/// Outcome of a handler lookup
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    /// Handler registered for `(a, b)`
    Direct(OverlapHandler),
    /// Handler registered for `(b, a)`; call it with swapped arguments
    Swapped(OverlapHandler),
    /// No handler in either order
    Unregistered,
}

/// Immutable 2-D handler table indexed by [`ShapeKind::ordinal`]
#[derive(Debug, Clone)]
pub struct CollisionTable {
    handlers: [[Option<OverlapHandler>; ShapeKind::COUNT]; ShapeKind::COUNT],
}

impl CollisionTable {
    /// Build a table from a registration list
    pub fn from_handlers(entries: &[(ShapeKind, ShapeKind, OverlapHandler)]) -> Self {
        let mut handlers = [[None; ShapeKind::COUNT]; ShapeKind::COUNT];
        for &(a, b, handler) in entries {
            let slot = &mut handlers[a.ordinal()][b.ordinal()];
            if slot.is_none() {
                *slot = Some(handler);
            }
        }
        Self { handlers }
    }

    /// The engine-wide table built from [`HANDLERS`]
    pub fn global() -> &'static Self {
        static TABLE: OnceLock<CollisionTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            log::debug!("Building collision table from {} handler(s)", HANDLERS.len());
            Self::from_handlers(HANDLERS)
        })
    }

    /// Look up the handler for an ordered pair
    pub fn resolve(&self, a: ShapeKind, b: ShapeKind) -> Resolution {
        if let Some(handler) = self.handlers[a.ordinal()][b.ordinal()] {
            Resolution::Direct(handler)
        } else if let Some(handler) = self.handlers[b.ordinal()][a.ordinal()] {
            Resolution::Swapped(handler)
        } else {
            Resolution::Unregistered
        }
    }

    /// Check if a pair has a handler in either order
    pub fn supports(&self, a: ShapeKind, b: ShapeKind) -> bool {
        !matches!(self.resolve(a, b), Resolution::Unregistered)
    }

    /// Test two world shapes for overlap
    pub fn overlap(&self, a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
        match self.resolve(a.kind(), b.kind()) {
            Resolution::Direct(handler) => handler(a, b),
            Resolution::Swapped(handler) => handler(b, a),
            Resolution::Unregistered => {
                warn_unregistered(a.kind(), b.kind());
                false
            }
        }
    }
}

/// Test two world shapes for overlap using the engine-wide table
pub fn overlap(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
    CollisionTable::global().overlap(a, b)
}

fn warn_unregistered(a: ShapeKind, b: ShapeKind) {
    static WARNED: AtomicU32 = AtomicU32::new(0);

    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let bit = 1u32 << (low.ordinal() * ShapeKind::COUNT + high.ordinal());
    if WARNED.fetch_or(bit, Ordering::Relaxed) & bit == 0 {
        log::warn!("No collision handler registered for {:?} x {:?}; treating as non-colliding", a, b);
    }
}

/// Rectangle vs circle on raw geometry, shared by the grid handlers
fn rect_overlaps_circle(rect: &Rect, center: Point2, radius: f32) -> bool {
    if rect.contains_point(center) {
        return true;
    }
    if rect.distance_to_point(center) < radius {
        return true;
    }
    rect.edges().iter().any(|edge| edge.intersects_circle(center, radius))
}

fn translate(rect: &Rect, origin: Point2) -> Rect {
    Rect::new(rect.x - origin.x, rect.y - origin.y, rect.width, rect.height)
}

fn rect_rect(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
    a.bounds().overlaps(&b.bounds())
}

fn circle_circle(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
    let (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) = (a.shape, b.shape) else {
        return false;
    };
    nalgebra::distance(&a.center(), &b.center()) <= ra + rb
}

fn rect_circle(rect: &WorldShape<'_>, circle: &WorldShape<'_>) -> bool {
    let Shape::Circle { radius } = circle.shape else {
        return false;
    };
    rect_overlaps_circle(&rect.bounds(), circle.center(), *radius)
}

fn rect_grid(rect: &WorldShape<'_>, grid: &WorldShape<'_>) -> bool {
    let Shape::Grid(tiles) = grid.shape else {
        return false;
    };
    let bounds = rect.bounds();
    if !bounds.overlaps(&grid.bounds()) {
        return false;
    }
    tiles.any_solid_in(&translate(&bounds, grid.position))
}

fn circle_grid(circle: &WorldShape<'_>, grid: &WorldShape<'_>) -> bool {
    let (Shape::Circle { radius }, Shape::Grid(tiles)) = (circle.shape, grid.shape) else {
        return false;
    };
    let bounds = circle.bounds();
    if !bounds.overlaps(&grid.bounds()) {
        return false;
    }
    let center = circle.center();
    tiles
        .solid_tiles_in(&translate(&bounds, grid.position))
        .any(|(x, y)| {
            let tile = tiles.tile_rect(x, y);
            let world_tile = Rect::new(tile.x + grid.position.x, tile.y + grid.position.y, tile.width, tile.height);
            rect_overlaps_circle(&world_tile, center, *radius)
        })
}

fn grid_grid(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
    let (Shape::Grid(tiles_a), Shape::Grid(tiles_b)) = (a.shape, b.shape) else {
        return false;
    };
    let bounds_b = b.bounds();
    if !a.bounds().overlaps(&bounds_b) {
        return false;
    }
    // Only tiles of A that fall inside B's bounds can touch B
    tiles_a
        .solid_tiles_in(&translate(&bounds_b, a.position))
        .any(|(x, y)| {
            let tile = tiles_a.tile_rect(x, y);
            let world_tile = Rect::new(tile.x + a.position.x, tile.y + a.position.y, tile.width, tile.height);
            tiles_b.any_solid_in(&translate(&world_tile, b.position))
        })
}

fn rect_pixel(rect: &WorldShape<'_>, pixels: &WorldShape<'_>) -> bool {
    let Shape::Pixel(mask) = pixels.shape else {
        return false;
    };
    let bounds = rect.bounds();
    if !bounds.overlaps(&pixels.bounds()) {
        return false;
    }
    mask.any_solid_in(&translate(&bounds, pixels.position))
}

fn pixel_pixel(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
    let (Shape::Pixel(mask_a), Shape::Pixel(mask_b)) = (a.shape, b.shape) else {
        return false;
    };
    let bounds_b = b.bounds();
    if !a.bounds().overlaps(&bounds_b) {
        return false;
    }
    mask_a
        .solid_pixels_in(&translate(&bounds_b, a.position))
        .any(|(x, y)| {
            let world_pixel = Rect::new(x as f32 + a.position.x, y as f32 + a.position.y, 1.0, 1.0);
            mask_b.any_solid_in(&translate(&world_pixel, b.position))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{GridShape, PixelMask};

    fn rect(width: f32, height: f32) -> Shape {
        Shape::Rectangle { width, height }
    }

    fn circle(radius: f32) -> Shape {
        Shape::Circle { radius }
    }

    fn at(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_symmetric(a: &WorldShape<'_>, b: &WorldShape<'_>) -> bool {
        let forward = overlap(a, b);
        assert_eq!(forward, overlap(b, a), "{:?} vs {:?}", a, b);
        forward
    }

    #[test]
    fn test_rect_boundary() {
        let a = rect(10.0, 6.0);
        let b = rect(10.0, 6.0);
        assert!(assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(9.0, 0.0))));
        assert!(!assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(10.0, 0.0))));
        assert!(!assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(11.0, 0.0))));
        assert!(!assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(0.0, 7.0))));
    }

    #[test]
    fn test_circle_touching() {
        let a = circle(5.0);
        let b = circle(5.0);
        // Bounding boxes start at center - radius
        assert!(assert_symmetric(&a.at(at(-5.0, -5.0)), &b.at(at(5.0, -5.0))));
        assert!(!assert_symmetric(&a.at(at(-5.0, -5.0)), &b.at(at(5.01, -5.0))));
    }

    #[test]
    fn test_rect_circle_cases() {
        let r = rect(10.0, 10.0);
        let c = circle(2.0);

        // Center inside
        assert!(assert_symmetric(&r.at(at(0.0, 0.0)), &c.at(at(3.0, 3.0))));
        // Circle reaching over an edge
        assert!(assert_symmetric(&r.at(at(0.0, 0.0)), &c.at(at(9.0, 3.0))));
        // Near a corner but outside the radius
        assert!(!assert_symmetric(&r.at(at(0.0, 0.0)), &c.at(at(11.0, 11.0))));
        // Rectangle inside a large circle
        let big = circle(50.0);
        assert!(assert_symmetric(&r.at(at(0.0, 0.0)), &big.at(at(-45.0, -45.0))));
    }

    #[test]
    fn test_rect_grid() {
        let grid = Shape::Grid(GridShape::new(4, 4, 8.0, 8.0).with_tile(3, 3));
        let r = rect(4.0, 4.0);
        assert!(assert_symmetric(&r.at(at(126.0, 126.0)), &grid.at(at(100.0, 100.0))));
        assert!(!assert_symmetric(&r.at(at(100.0, 100.0)), &grid.at(at(100.0, 100.0))));
        assert!(!assert_symmetric(&r.at(at(0.0, 0.0)), &grid.at(at(100.0, 100.0))));
    }

    #[test]
    fn test_circle_grid_uses_tile_geometry() {
        let grid = Shape::Grid(GridShape::new(2, 2, 10.0, 10.0).with_tile(1, 1));
        let c = circle(4.0);
        // Bounding box reaches tile (1, 1) but the circle itself does not
        assert!(!assert_symmetric(&c.at(at(3.0, 3.0)), &grid.at(at(0.0, 0.0))));
        assert!(assert_symmetric(&c.at(at(8.0, 8.0)), &grid.at(at(0.0, 0.0))));
    }

    #[test]
    fn test_grid_grid() {
        let a = Shape::Grid(GridShape::new(2, 2, 8.0, 8.0).with_tile(1, 0));
        let b = Shape::Grid(GridShape::new(2, 2, 8.0, 8.0).with_tile(0, 0));
        assert!(assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(8.0, 0.0))));
        assert!(!assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(0.0, 0.0))));
    }

    #[test]
    fn test_pixel_handlers() {
        let mut mask = PixelMask::empty(4, 4);
        mask.set_alpha(3, 0, 255);
        let pixels = Shape::Pixel(mask);
        let r = rect(2.0, 2.0);
        assert!(assert_symmetric(&r.at(at(3.0, 0.0)), &pixels.at(at(0.0, 0.0))));
        assert!(!assert_symmetric(&r.at(at(0.0, 0.0)), &pixels.at(at(0.0, 0.0))));

        let solid = Shape::Pixel(PixelMask::filled(1, 1));
        assert!(assert_symmetric(&pixels.at(at(0.0, 0.0)), &solid.at(at(3.0, 0.0))));
        assert!(!assert_symmetric(&pixels.at(at(0.0, 0.0)), &solid.at(at(2.0, 0.0))));
    }

    #[test]
    fn test_unregistered_pair_never_overlaps() {
        let table = CollisionTable::global();
        assert!(!table.supports(ShapeKind::Circle, ShapeKind::Pixel));
        let c = circle(10.0);
        let pixels = Shape::Pixel(PixelMask::filled(4, 4));
        assert!(!assert_symmetric(&c.at(at(0.0, 0.0)), &pixels.at(at(0.0, 0.0))));
    }

    #[test]
    fn test_swapped_lookup() {
        let table = CollisionTable::from_handlers(&[(ShapeKind::Rectangle, ShapeKind::Circle, rect_circle)]);
        assert!(matches!(table.resolve(ShapeKind::Rectangle, ShapeKind::Circle), Resolution::Direct(_)));
        assert!(matches!(table.resolve(ShapeKind::Circle, ShapeKind::Rectangle), Resolution::Swapped(_)));
        assert!(matches!(table.resolve(ShapeKind::Circle, ShapeKind::Circle), Resolution::Unregistered));
    }

    #[test]
    fn test_every_kind_pair_is_symmetric() {
        let shapes = [
            rect(6.0, 6.0),
            circle(3.0),
            Shape::Grid(GridShape::new(2, 2, 4.0, 4.0).with_tile(0, 1)),
            Shape::Pixel(PixelMask::filled(5, 5)),
        ];
        let offsets = [0.0, 2.5, 4.0, 7.0, 12.0];
        for a in &shapes {
            for b in &shapes {
                for &dx in &offsets {
                    for &dy in &offsets {
                        assert_symmetric(&a.at(at(0.0, 0.0)), &b.at(at(dx, dy)));
                    }
                }
            }
        }
    }
}
