//! Ready-made models.
//!
//! Used by value they are keyed by position; wrap them in an `Arc` to key
//! them by reference.

use crate::{ChartModel, Coordinate};

/// A single optional value plotted at its index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservableValue {
    pub value: Option<f64>,
}

impl ObservableValue {
    pub const fn new(value: f64) -> Self {
        Self { value: Some(value) }
    }

    pub const fn null() -> Self {
        Self { value: None }
    }
}

impl ChartModel for ObservableValue {
    fn coordinate(&self, index: usize) -> Coordinate {
        match self.value {
            Some(value) => Coordinate::xy(index as f64, value),
            None => Coordinate::null_at(index as f64),
        }
    }
}

/// An explicit x/y pair; either side missing makes a gap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservablePoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ObservablePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

impl ChartModel for ObservablePoint {
    fn coordinate(&self, index: usize) -> Coordinate {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Coordinate::xy(x, y),
            (x, _) => Coordinate::null_at(x.unwrap_or(index as f64)),
        }
    }
}

/// A point in polar space; the angle maps to the secondary value and the
/// radius to the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservablePolarPoint {
    pub angle: Option<f64>,
    pub radius: Option<f64>,
}

impl ObservablePolarPoint {
    pub const fn new(angle: f64, radius: f64) -> Self {
        Self {
            angle: Some(angle),
            radius: Some(radius),
        }
    }
}

impl ChartModel for ObservablePolarPoint {
    fn coordinate(&self, index: usize) -> Coordinate {
        match (self.angle, self.radius) {
            (Some(angle), Some(radius)) => Coordinate::xy(angle, radius),
            _ => Coordinate::null_at(index as f64),
        }
    }
}

/// An x/y pair with a weight, carried as the tertiary value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

impl WeightedPoint {
    pub const fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

impl ChartModel for WeightedPoint {
    fn coordinate(&self, _index: usize) -> Coordinate {
        Coordinate::xy(self.x, self.y).with_tertiary(self.weight)
    }
}

/// One candle of a financial series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinancialPoint {
    /// Position on the time axis.
    pub date: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
}

impl FinancialPoint {
    pub const fn new(date: f64, high: f64, open: f64, close: f64, low: f64) -> Self {
        Self {
            date,
            high,
            open,
            close,
            low,
        }
    }
}

impl ChartModel for FinancialPoint {
    fn coordinate(&self, _index: usize) -> Coordinate {
        Coordinate::financial(self.date, self.high, self.open, self.close, self.low)
    }
}
