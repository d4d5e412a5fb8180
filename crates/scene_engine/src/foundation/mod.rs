//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and geometric helpers
//! - Deferred-mutation registry and ordered indices
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod registry;
pub mod ordered_index;
pub mod time;
pub mod logging;
