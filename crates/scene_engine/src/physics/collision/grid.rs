//! Tile grid collision shape

use crate::foundation::math::{snap_to_grid, Rect};

/// Inclusive range of tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpan {
    /// First column
    pub x0: usize,
    /// First row
    pub y0: usize,
    /// Last column (inclusive)
    pub x1: usize,
    /// Last row (inclusive)
    pub y1: usize,
}

impl TileSpan {
    /// Iterate every `(column, row)` in the span, row-major
    pub fn tiles(self) -> impl Iterator<Item = (usize, usize)> {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

/// A grid of solid or empty tiles
#[derive(Debug, Clone, PartialEq)]
pub struct GridShape {
    columns: usize,
    rows: usize,
    tile_width: f32,
    tile_height: f32,
    tiles: Vec<bool>,
}

impl GridShape {
    /// Create an empty grid
    pub fn new(columns: usize, rows: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            columns,
            rows,
            tile_width,
            tile_height,
            tiles: vec![false; columns * rows],
        }
    }

    /// Number of columns
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Tile width
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Tile height
    pub const fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Total width of the grid
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_width
    }

    /// Total height of the grid
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_height
    }

    /// Number of tiles
    pub const fn tile_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Set a tile; writes outside the grid are ignored
    pub fn set_tile(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.columns && y < self.rows {
            self.tiles[y * self.columns + x] = solid;
        }
    }

    /// Builder form of [`GridShape::set_tile`] for solid tiles
    pub fn with_tile(mut self, x: usize, y: usize) -> Self {
        self.set_tile(x, y, true);
        self
    }

    /// Clear a tile
    pub fn clear_tile(&mut self, x: usize, y: usize) {
        self.set_tile(x, y, false);
    }

    /// Check a tile; tiles outside the grid are empty
    pub fn tile(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.columns || y as usize >= self.rows {
            return false;
        }
        self.tiles[y as usize * self.columns + x as usize]
    }

    /// Local-space rectangle covered by a tile
    pub fn tile_rect(&self, x: usize, y: usize) -> Rect {
        Rect::new(
            x as f32 * self.tile_width,
            y as f32 * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Tiles touched by a local-space rectangle, clamped to the grid
    ///
    /// Returns `None` when the rectangle lies entirely outside the grid.
    pub fn span(&self, local: &Rect) -> Option<TileSpan> {
        if self.columns == 0 || self.rows == 0 || local.width <= 0.0 || local.height <= 0.0 {
            return None;
        }

        let first_column = (snap_to_grid(local.left(), self.tile_width) / self.tile_width) as i64;
        let first_row = (snap_to_grid(local.top(), self.tile_height) / self.tile_height) as i64;
        // Right and bottom edges are exclusive
        let last_column = (local.right() / self.tile_width).ceil() as i64 - 1;
        let last_row = (local.bottom() / self.tile_height).ceil() as i64 - 1;

        let max_column = self.columns as i64 - 1;
        let max_row = self.rows as i64 - 1;
        if last_column < 0 || last_row < 0 || first_column > max_column || first_row > max_row {
            return None;
        }

        Some(TileSpan {
            x0: first_column.max(0) as usize,
            y0: first_row.max(0) as usize,
            x1: last_column.min(max_column) as usize,
            y1: last_row.min(max_row) as usize,
        })
    }

    /// Solid tiles touched by a local-space rectangle
    pub fn solid_tiles_in(&self, local: &Rect) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.span(local)
            .into_iter()
            .flat_map(TileSpan::tiles)
            .filter(|&(x, y)| self.tile(x as i64, y as i64))
    }

    /// Check if any solid tile is touched by a local-space rectangle
    pub fn any_solid_in(&self, local: &Rect) -> bool {
        self.solid_tiles_in(local).next().is_some()
    }
}
