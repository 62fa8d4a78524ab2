//! Drawing surface abstraction for livechart.
//!
//! A chart never talks to a graphics backend directly. Every frame the
//! motion canvas hands its paint tasks to a [`DrawingSurface`], which
//! can be a real renderer or the recording `MockDrawingSurface`.
//!
//! # Overview
//!
//! - [`DrawingSurface`] - Trait abstracting the primitive draw operations
//! - [`PaintStyle`] - Fill, stroke and z-order of a paint task
//! - `MockDrawingSurface` - Recording implementation (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use livechart_core::{Color, Point, Rect};
//! use livechart_test_utils::{DrawingSurface, MockDrawingSurface, PaintStyle};
//!
//! let surface = MockDrawingSurface::new();
//!
//! surface.begin_paint(&PaintStyle::fill(Color::BLUE), None);
//! surface.draw_rect(Rect::new(0.0, 0.0, 10.0, 20.0), Point::ZERO);
//! surface.end_paint();
//!
//! assert_eq!(surface.count_rects(), 1);
//! # }
//! ```
//!
//! # Design
//!
//! Surface methods take `&self`. The mock records calls behind a `Mutex`,
//! so a surface can be shared between the chart and the test that inspects
//! it, and the trait stays object-safe (`dyn DrawingSurface`).

#[cfg(feature = "mock")]
pub mod mock_surface;
pub mod paint;
pub mod surface;

#[cfg(feature = "mock")]
pub use mock_surface::*;
pub use paint::*;
pub use surface::*;
