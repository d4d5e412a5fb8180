//! Narrow-phase collision shapes and the shape-pair dispatch table
//!
//! # Architecture
//!
//! - **Local Space Storage**: Shapes keep only their size; colliders own the offset
//! - **On-Demand Placement**: [`WorldShape`] pairs a shape with a world position for one test
//! - **Static Registration**: Supported kind pairs are listed once in [`HANDLERS`]
//!
//! # Module Organization
//!
//! - [`shape`] - Shape kinds and world placement
//! - [`grid`] - Tile grids
//! - [`pixel`] - Alpha masks
//! - [`dispatch`] - Handler table and built-in handlers

pub mod dispatch;
pub mod grid;
pub mod pixel;
pub mod shape;

pub use dispatch::{overlap, CollisionTable, OverlapHandler, Resolution, HANDLERS};
pub use grid::{GridShape, TileSpan};
pub use pixel::{PixelMask, PixelMaskError};
pub use shape::{Shape, ShapeKind, WorldShape};
