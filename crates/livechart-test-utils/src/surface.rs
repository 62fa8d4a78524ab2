//! Trait abstracting the drawing backend.

use livechart_core::{Point, Rect, Size};

use crate::PaintStyle;

/// Primitive drawing operations a chart needs from its backend.
///
/// Draw calls between [`begin_paint`](Self::begin_paint) and
/// [`end_paint`](Self::end_paint) use that paint's style and clip.
///
/// # Example
///
/// ```rust,no_run
/// use livechart_core::{Color, Point, Rect};
/// use livechart_test_utils::{DrawingSurface, PaintStyle};
///
/// fn draw_bar(surface: &dyn DrawingSurface, bar: Rect) {
///     surface.begin_paint(&PaintStyle::fill(Color::RED), None);
///     surface.draw_rect(bar, Point::ZERO);
///     surface.end_paint();
/// }
/// ```
pub trait DrawingSurface: Send + Sync {
    /// Starts a paint task, optionally clipped to `clip`.
    fn begin_paint(&self, style: &PaintStyle, clip: Option<Rect>);

    /// Draws a rectangle with corner radii `radius.x` and `radius.y`.
    fn draw_rect(&self, rect: Rect, radius: Point);

    /// Draws `text` at `position`, rotated by `rotation` degrees.
    fn draw_text(&self, text: &str, position: Point, size: f32, rotation: f32);

    /// Size `text` would occupy at font size `size`.
    fn measure_text(&self, text: &str, size: f32) -> Size;

    fn end_paint(&self);
}
