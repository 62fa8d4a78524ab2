//! Recording implementation of DrawingSurface for tests.
//!
//! Nothing is rasterized; every call is stored so tests can assert on what
//! a frame would have drawn.

use livechart_core::{Point, Rect, Size};
use parking_lot::Mutex;

use crate::{DrawingSurface, PaintStyle};

/// Width of one character relative to the font size, used by
/// [`MockDrawingSurface::measure_text`].
pub const MOCK_GLYPH_ASPECT: f32 = 0.6;

/// Records a drawing call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    BeginPaint {
        style: PaintStyle,
        clip: Option<Rect>,
    },
    Rect {
        rect: Rect,
        radius: Point,
    },
    Text {
        text: String,
        position: Point,
        size: f32,
        rotation: f32,
    },
    EndPaint,
}

/// Recording drawing surface.
///
/// # Example
///
/// ```rust
/// use livechart_core::{Color, Point, Rect};
/// use livechart_test_utils::{DrawingSurface, MockDrawingSurface, PaintStyle};
///
/// let surface = MockDrawingSurface::new();
/// surface.begin_paint(&PaintStyle::fill(Color::RED), None);
/// surface.draw_text("42", Point::new(1.0, 2.0), 12.0, 0.0);
/// surface.end_paint();
///
/// assert_eq!(surface.texts(), vec!["42".to_string()]);
/// assert_eq!(surface.call_count(), 3);
/// ```
pub struct MockDrawingSurface {
    calls: Mutex<Vec<DrawCall>>,
}

impl MockDrawingSurface {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().clone()
    }

    /// Every rectangle drawn, in call order.
    pub fn rects(&self) -> Vec<Rect> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every text drawn, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Styles of the paint tasks begun, in call order.
    pub fn paints(&self) -> Vec<PaintStyle> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::BeginPaint { style, .. } => Some(style.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count_rects(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::Rect { .. }))
            .count()
    }

    pub fn count_texts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::Text { .. }))
            .count()
    }

    /// Clear recorded calls (useful between frames).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockDrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for MockDrawingSurface {
    fn begin_paint(&self, style: &PaintStyle, clip: Option<Rect>) {
        self.calls.lock().push(DrawCall::BeginPaint {
            style: style.clone(),
            clip,
        });
    }

    fn draw_rect(&self, rect: Rect, radius: Point) {
        self.calls.lock().push(DrawCall::Rect { rect, radius });
    }

    fn draw_text(&self, text: &str, position: Point, size: f32, rotation: f32) {
        self.calls.lock().push(DrawCall::Text {
            text: text.to_string(),
            position,
            size,
            rotation,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> Size {
        Size::new(text.chars().count() as f32 * size * MOCK_GLYPH_ASPECT, size)
    }

    fn end_paint(&self) {
        self.calls.lock().push(DrawCall::EndPaint);
    }
}
