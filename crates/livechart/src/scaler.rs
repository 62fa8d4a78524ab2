//! Axes and the data to pixel mapping.

use livechart_core::{Point, Size};
use tracing::debug;

use crate::Bounds;

/// Smallest data span an axis resolves to; a collapsed range is widened to
/// avoid dividing by zero.
const MIN_SPAN: f64 = 1e-12;

/// Approximate pixels between two ticks.
const TICK_SEPARATION_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisOrientation {
    X,
    Y,
}

impl AxisOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// User limits of an axis. `None` follows the data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisLimits {
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Whether `value` falls inside the limits; unset limits never exclude.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min.unwrap_or(f64::MIN) && value <= self.max.unwrap_or(f64::MAX)
    }
}

/// Step between two axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub magnitude: f64,
}

/// A cartesian axis: the data range it shows and the range it showed
/// during the previous measure.
#[derive(Debug, Clone)]
pub struct Axis {
    orientation: AxisOrientation,
    pub min_limit: Option<f64>,
    pub max_limit: Option<f64>,
    /// Data width of one category; bars are sized from it.
    pub unit_width: f64,
    data_bounds: Bounds,
    visible_data_bounds: Bounds,
    previous: Option<(f64, f64)>,
}

impl Axis {
    pub fn new(orientation: AxisOrientation) -> Self {
        Self {
            orientation,
            min_limit: None,
            max_limit: None,
            unit_width: 1.0,
            data_bounds: Bounds::new(),
            visible_data_bounds: Bounds::new(),
            previous: None,
        }
    }

    pub fn x() -> Self {
        Self::new(AxisOrientation::X)
    }

    pub fn y() -> Self {
        Self::new(AxisOrientation::Y)
    }

    pub fn with_limits(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_limit = min;
        self.max_limit = max;
        self
    }

    pub fn with_unit_width(mut self, unit_width: f64) -> Self {
        self.unit_width = unit_width;
        self
    }

    #[inline]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    pub fn limits(&self) -> AxisLimits {
        AxisLimits::new(self.min_limit, self.max_limit)
    }

    pub fn data_bounds(&self) -> &Bounds {
        &self.data_bounds
    }

    pub fn visible_data_bounds(&self) -> &Bounds {
        &self.visible_data_bounds
    }

    /// Starts a measure pass: the current range becomes the previous one and
    /// the data bounds are reset.
    pub fn initialize(&mut self) {
        if !self.data_bounds.is_empty() {
            self.previous = Some(self.range());
        }
        self.data_bounds = Bounds::new();
        self.visible_data_bounds = Bounds::new();
    }

    /// Widens the axis to the bounds of one series.
    pub fn append_bounds(&mut self, data: &Bounds, visible: &Bounds) {
        self.data_bounds.append_bounds(data);
        self.visible_data_bounds.append_bounds(visible);
    }

    /// The data range shown, limits applied.
    pub fn range(&self) -> (f64, f64) {
        let (data_min, data_max) = if self.data_bounds.is_empty() {
            (0.0, 1.0)
        } else {
            (self.data_bounds.min, self.data_bounds.max)
        };
        let min = self.min_limit.unwrap_or(data_min);
        let max = self.max_limit.unwrap_or(data_max);

        if (max - min).abs() < MIN_SPAN {
            debug!(axis = self.orientation.as_str(), min, "axis range collapsed, widening");
            return (min - 0.5, max + 0.5);
        }
        (min, max)
    }

    /// The range shown during the previous measure, if any.
    pub fn previous_range(&self) -> Option<(f64, f64)> {
        self.previous
    }

    #[inline]
    pub fn has_previous_state(&self) -> bool {
        self.previous.is_some()
    }

    /// Label step for `bounds` drawn over `control_size`.
    ///
    /// Picks roughly one tick per 50 px and rounds the step to 1, 2, 5 or
    /// 10 times a power of ten.
    pub fn tick(&self, control_size: Size, bounds: &Bounds) -> AxisTick {
        let length = match self.orientation {
            AxisOrientation::X => control_size.width,
            AxisOrientation::Y => control_size.height,
        } as f64;

        let mut range = bounds.delta();
        if !range.is_finite() || range <= 0.0 {
            range = if bounds.min.is_finite() && bounds.min != 0.0 {
                bounds.min.abs()
            } else {
                1.0
            };
        }

        let separations = (length / TICK_SEPARATION_PX).round().max(1.0);
        let rough_interval = range / separations;
        let magnitude = 10f64.powf(rough_interval.log10().floor());
        let normalized = rough_interval / magnitude;

        let value = if normalized < 1.5 {
            magnitude
        } else if normalized < 3.0 {
            2.0 * magnitude
        } else if normalized < 7.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        AxisTick { value, magnitude }
    }
}

/// Linear map from an axis' data range to a pixel span.
///
/// Y scalers are inverted: larger values map closer to the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    min: f64,
    max: f64,
    px_min: f64,
    px_max: f64,
    /// Pixels per data unit.
    m: f64,
    inverted: bool,
}

impl Scaler {
    /// Maps `axis` onto the draw margin at `location` with `size`.
    pub fn new(location: Point, size: Size, axis: &Axis) -> Self {
        Self::from_range(location, size, axis.orientation(), axis.range())
    }

    /// The scaler of the previous measure, used to start new visuals where
    /// the old scale would have placed them.
    pub fn previous(location: Point, size: Size, axis: &Axis) -> Option<Self> {
        axis.previous_range()
            .map(|range| Self::from_range(location, size, axis.orientation(), range))
    }

    fn from_range(
        location: Point,
        size: Size,
        orientation: AxisOrientation,
        (min, max): (f64, f64),
    ) -> Self {
        let (px_min, px_max, inverted) = match orientation {
            AxisOrientation::X => (location.x as f64, (location.x + size.width) as f64, false),
            AxisOrientation::Y => (location.y as f64, (location.y + size.height) as f64, true),
        };
        let span = (max - min).abs().max(MIN_SPAN);
        Self {
            min,
            max,
            px_min,
            px_max,
            m: (px_max - px_min) / span,
            inverted,
        }
    }

    /// Pixel position of a data value.
    #[inline]
    pub fn to_pixels(&self, value: f64) -> f32 {
        let offset = (value - self.min) * self.m;
        if self.inverted {
            (self.px_max - offset) as f32
        } else {
            (self.px_min + offset) as f32
        }
    }

    /// Data value at a pixel position.
    #[inline]
    pub fn to_chart_values(&self, pixels: f32) -> f64 {
        let offset = if self.inverted {
            self.px_max - pixels as f64
        } else {
            pixels as f64 - self.px_min
        };
        self.min + offset / self.m
    }

    /// Length in pixels of a data span.
    #[inline]
    pub fn measure_in_pixels(&self, value: f64) -> f32 {
        (value * self.m).abs() as f32
    }

    pub fn data_range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_x_scaler() {
        let axis = Axis::x().with_limits(Some(0.0), Some(10.0));
        let scaler = Scaler::new(Point::new(20.0, 0.0), Size::new(400.0, 300.0), &axis);

        assert!(close(scaler.to_pixels(0.0), 20.0));
        assert!(close(scaler.to_pixels(5.0), 220.0));
        assert!(close(scaler.measure_in_pixels(1.0), 40.0));
        assert!((scaler.to_chart_values(220.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_y_scaler_is_inverted() {
        let axis = Axis::y().with_limits(Some(0.0), Some(10.0));
        let scaler = Scaler::new(Point::ZERO, Size::new(100.0, 200.0), &axis);

        assert!(close(scaler.to_pixels(0.0), 200.0));
        assert!(close(scaler.to_pixels(10.0), 0.0));
        assert!((scaler.to_chart_values(50.0) - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_axis_range() {
        assert_eq!(Axis::x().range(), (0.0, 1.0));
    }

    #[test]
    fn test_collapsed_range_widens() {
        let mut axis = Axis::y();
        let point = Bounds::with_range(5.0, 5.0);
        axis.append_bounds(&point, &point);
        assert_eq!(axis.range(), (4.5, 5.5));
    }

    #[test]
    fn test_initialize_keeps_previous_range() {
        let mut axis = Axis::x();
        assert!(!axis.has_previous_state());
        axis.initialize();
        assert!(!axis.has_previous_state());

        let data = Bounds::with_range(0.0, 4.0);
        axis.append_bounds(&data, &data);
        axis.initialize();

        assert_eq!(axis.previous_range(), Some((0.0, 4.0)));
        assert!(axis.data_bounds().is_empty());
        let size = Size::new(100.0, 100.0);
        assert!(Scaler::previous(Point::ZERO, size, &axis).is_some());
    }

    #[test]
    fn test_nice_ticks() {
        let axis = Axis::x();
        let size = Size::new(500.0, 100.0);
        assert_eq!(axis.tick(size, &Bounds::with_range(0.0, 100.0)).value, 10.0);
        assert_eq!(axis.tick(size, &Bounds::with_range(0.0, 25.0)).value, 2.0);
        assert_eq!(axis.tick(size, &Bounds::with_range(0.0, 40.0)).value, 5.0);
    }

    #[test]
    fn test_limits_contains() {
        let limits = AxisLimits::new(Some(0.0), None);
        assert!(!limits.contains(-1.0));
        assert!(limits.contains(1e300));
        assert!(AxisLimits::default().contains(f64::MIN));
    }
}
