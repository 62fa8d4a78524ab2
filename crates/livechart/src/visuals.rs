//! Drawable geometries whose properties animate.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use livechart_core::{Point, Rect, Size};
use livechart_motion::{Animatable, MotionResult};
use livechart_test_utils::DrawingSurface;
use tracing::warn;

pub const X: &str = "X";
pub const Y: &str = "Y";
pub const WIDTH: &str = "Width";
pub const HEIGHT: &str = "Height";
pub const RX: &str = "Rx";
pub const RY: &str = "Ry";
pub const TEXT_SIZE: &str = "TextSize";

/// Something the canvas can advance and paint.
pub trait Visual: Any + Send + Sync + fmt::Debug {
    fn motion(&self) -> &Animatable;
    fn motion_mut(&mut self) -> &mut Animatable;

    /// Paints the visual at its state at `now`.
    fn draw(&self, surface: &dyn DrawingSurface, now: Duration);
}

/// A visual with an animated rectangle, the shape of a bar.
pub trait SizedGeometry: Visual + Sized {
    /// Whether the geometry draws rounded corners.
    const IS_ROUNDED: bool = false;

    /// A settled geometry covering `rect`.
    fn from_rect(rect: Rect) -> Self;

    fn set_channel(&mut self, name: &'static str, value: f32, now: Duration) -> MotionResult<bool> {
        self.motion_mut().set(name, value, now)
    }

    fn set_rect(&mut self, rect: Rect, now: Duration) -> MotionResult<()> {
        let motion = self.motion_mut();
        motion.set(X, rect.x, now)?;
        motion.set(Y, rect.y, now)?;
        motion.set(WIDTH, rect.width, now)?;
        motion.set(HEIGHT, rect.height, now)?;
        Ok(())
    }

    fn rect_at(&self, now: Duration) -> MotionResult<Rect> {
        let motion = self.motion();
        Ok(Rect::new(
            motion.get(X, now)?,
            motion.get(Y, now)?,
            motion.get(WIDTH, now)?,
            motion.get(HEIGHT, now)?,
        ))
    }

    /// Sets the corner radii; a no-op for square geometries.
    fn set_corner_radius(&mut self, _rx: f32, _ry: f32, _now: Duration) -> MotionResult<()> {
        Ok(())
    }
}

fn rect_motion(rect: Rect) -> Animatable {
    Animatable::new()
        .with_channel(X, rect.x)
        .with_channel(Y, rect.y)
        .with_channel(WIDTH, rect.width)
        .with_channel(HEIGHT, rect.height)
}

#[derive(Debug)]
pub struct RectangleGeometry {
    motion: Animatable,
}

impl Visual for RectangleGeometry {
    fn motion(&self) -> &Animatable {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut Animatable {
        &mut self.motion
    }

    fn draw(&self, surface: &dyn DrawingSurface, now: Duration) {
        match self.rect_at(now) {
            Ok(rect) => surface.draw_rect(rect, Point::ZERO),
            Err(err) => warn!(%err, "skipping rectangle"),
        }
    }
}

impl SizedGeometry for RectangleGeometry {
    fn from_rect(rect: Rect) -> Self {
        Self {
            motion: rect_motion(rect),
        }
    }
}

/// A rectangle with animated corner radii.
#[derive(Debug)]
pub struct RoundedRectangleGeometry {
    motion: Animatable,
}

impl RoundedRectangleGeometry {
    pub fn corner_radius_at(&self, now: Duration) -> MotionResult<Point> {
        Ok(Point::new(self.motion.get(RX, now)?, self.motion.get(RY, now)?))
    }
}

impl Visual for RoundedRectangleGeometry {
    fn motion(&self) -> &Animatable {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut Animatable {
        &mut self.motion
    }

    fn draw(&self, surface: &dyn DrawingSurface, now: Duration) {
        match self.rect_at(now).and_then(|rect| Ok((rect, self.corner_radius_at(now)?))) {
            Ok((rect, radius)) => surface.draw_rect(rect, radius),
            Err(err) => warn!(%err, "skipping rounded rectangle"),
        }
    }
}

impl SizedGeometry for RoundedRectangleGeometry {
    const IS_ROUNDED: bool = true;

    fn from_rect(rect: Rect) -> Self {
        Self {
            motion: rect_motion(rect).with_channel(RX, 0.0f32).with_channel(RY, 0.0f32),
        }
    }

    fn set_corner_radius(&mut self, rx: f32, ry: f32, now: Duration) -> MotionResult<()> {
        self.motion.set(RX, rx, now)?;
        self.motion.set(RY, ry, now)?;
        Ok(())
    }
}

/// Space around a label's text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            left: horizontal,
            top: vertical,
            right: horizontal,
            bottom: vertical,
        }
    }

    pub const fn all(value: f32) -> Self {
        Self::new(value, value)
    }
}

/// Text anchored at its center.
#[derive(Debug)]
pub struct LabelGeometry {
    motion: Animatable,
    pub text: String,
    pub padding: Padding,
    /// Degrees.
    pub rotation: f32,
}

impl LabelGeometry {
    pub fn new(position: Point, text_size: f32) -> Self {
        Self {
            motion: Animatable::new()
                .with_channel(X, position.x)
                .with_channel(Y, position.y)
                .with_channel(TEXT_SIZE, text_size),
            text: String::new(),
            padding: Padding::default(),
            rotation: 0.0,
        }
    }

    pub fn set_position(&mut self, position: Point, now: Duration) -> MotionResult<()> {
        self.motion.set(X, position.x, now)?;
        self.motion.set(Y, position.y, now)?;
        Ok(())
    }

    pub fn set_text_size(&mut self, size: f32, now: Duration) -> MotionResult<bool> {
        self.motion.set(TEXT_SIZE, size, now)
    }

    pub fn position_at(&self, now: Duration) -> MotionResult<Point> {
        Ok(Point::new(self.motion.get(X, now)?, self.motion.get(Y, now)?))
    }

    pub fn text_size_at(&self, now: Duration) -> MotionResult<f32> {
        self.motion.get(TEXT_SIZE, now)
    }

    /// Size of the text at its target size, padding included.
    pub fn measure(&self, surface: &dyn DrawingSurface) -> MotionResult<Size> {
        let size = *self.motion.property::<f32>(TEXT_SIZE)?.target();
        let text = surface.measure_text(&self.text, size);
        Ok(Size::new(
            text.width + self.padding.left + self.padding.right,
            text.height + self.padding.top + self.padding.bottom,
        ))
    }
}

impl Visual for LabelGeometry {
    fn motion(&self) -> &Animatable {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut Animatable {
        &mut self.motion
    }

    fn draw(&self, surface: &dyn DrawingSurface, now: Duration) {
        let state = self
            .position_at(now)
            .and_then(|position| Ok((position, self.text_size_at(now)?)));
        match state {
            Ok((position, size)) => surface.draw_text(&self.text, position, size, self.rotation),
            Err(err) => warn!(%err, "skipping label"),
        }
    }
}
