//! livechart core
//!
//! Shared building blocks for the livechart crates: hash collections and the
//! generational arena, logging and profiling setup, 2D geometry and colors.

pub mod alloc;
pub mod color;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
