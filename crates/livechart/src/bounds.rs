//! Running min/max/min-delta accumulation per axis.

/// Accumulated range of one dimension.
///
/// A fresh `Bounds` is empty: `max` is `-inf` and `min` is `+inf`, so the
/// first appended value defines both. Within one accumulation pass
/// [`append_value`](Self::append_value) only widens the range and
/// [`track_delta`](Self::track_delta) only narrows `min_delta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub max: f64,
    pub min: f64,
    /// Smallest gap seen between consecutive values.
    pub min_delta: f64,
    /// Extra room the axis should add above `max`.
    pub padding_max: f64,
    /// Extra room the axis should add below `min`.
    pub padding_min: f64,
}

impl Bounds {
    pub const fn new() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            min_delta: f64::INFINITY,
            padding_max: 0.0,
            padding_min: 0.0,
        }
    }

    /// Bounds collapsed on zero, the seed used before any data was seen.
    pub const fn zeroed() -> Self {
        Self {
            max: 0.0,
            min: 0.0,
            ..Self::new()
        }
    }

    pub const fn with_range(min: f64, max: f64) -> Self {
        Self {
            max,
            min,
            ..Self::new()
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding_max = padding;
        self.padding_min = padding;
        self
    }

    /// `max - min`.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.max - self.min
    }

    /// True until a value has been appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Widens the range to include `value`. NaN is ignored.
    pub fn append_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        if self.max < value {
            self.max = value;
        }
        if self.min > value {
            self.min = value;
        }
    }

    /// Widens the range to include `other`, padding included.
    pub fn append_bounds(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.append_value(other.max + other.padding_max);
        self.append_value(other.min - other.padding_min);
        self.track_delta(other.min_delta);
    }

    /// Narrows `min_delta` to `delta` if smaller.
    #[inline]
    pub fn track_delta(&mut self, delta: f64) {
        if delta < self.min_delta {
            self.min_delta = delta;
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

/// The six bounds of one accumulation pass: primary, secondary and tertiary
/// values, each over all data and over the visible subset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimensionalBounds {
    pub primary: Bounds,
    pub secondary: Bounds,
    pub tertiary: Bounds,
    pub visible_primary: Bounds,
    pub visible_secondary: Bounds,
    pub visible_tertiary: Bounds,
}

impl DimensionalBounds {
    pub const fn empty() -> Self {
        Self {
            primary: Bounds::new(),
            secondary: Bounds::new(),
            tertiary: Bounds::new(),
            visible_primary: Bounds::new(),
            visible_secondary: Bounds::new(),
            visible_tertiary: Bounds::new(),
        }
    }

    /// Every bound collapsed on zero.
    pub const fn zeroed() -> Self {
        Self {
            primary: Bounds::zeroed(),
            secondary: Bounds::zeroed(),
            tertiary: Bounds::zeroed(),
            visible_primary: Bounds::zeroed(),
            visible_secondary: Bounds::zeroed(),
            visible_tertiary: Bounds::zeroed(),
        }
    }
}

/// Bounds reported by a series.
///
/// `is_previous` is set when the series produced no points and the bounds
/// are the last known ones, kept so the axes do not collapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    pub bounds: DimensionalBounds,
    pub is_previous: bool,
}

impl SeriesBounds {
    pub const fn new(bounds: DimensionalBounds, is_previous: bool) -> Self {
        Self {
            bounds,
            is_previous,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        !self.is_previous
    }
}
