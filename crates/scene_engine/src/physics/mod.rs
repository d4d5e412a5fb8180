//! Collision detection
//!
//! Boolean overlap tests only; there is no response or solver. The broad
//! phase is the scene's [`TagIndex`], the narrow phase is the shape-pair
//! dispatch table in [`collision`], and [`query`] ties both to a scene.

pub mod collider;
pub mod collision;
pub mod query;
pub mod tag_index;

pub use collider::{Collider, ColliderRef, Tag};
pub use collision::{GridShape, PixelMask, Shape, ShapeKind, WorldShape};
pub use query::{Candidates, CollisionError, PositionOverride, PreconditionError};
pub use tag_index::TagIndex;
