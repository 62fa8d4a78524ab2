//! State shared between the series of one chart during a measure pass.

use indexmap::IndexMap;
use livechart_core::alloc::HashMap;

use crate::{ChartPoint, ChartSeries, SeriesId, SeriesProperties};

/// Accumulates stacked values.
pub trait Stacker {
    /// Stacks `point` on top of the points stacked before it and returns
    /// where it ends.
    fn stack_point(&mut self, point: &ChartPoint) -> f64;
}

/// Where a stacked value starts and ends.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackedValue {
    pub start: f64,
    pub end: f64,
}

/// Running totals of one stack, keyed by secondary value.
///
/// Positive and negative values grow away from zero independently.
#[derive(Debug, Default)]
pub struct StackGroup {
    positive: HashMap<u64, f64>,
    negative: HashMap<u64, f64>,
}

impl StackGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stacks `primary` at `secondary`.
    pub fn stack_value(&mut self, secondary: f64, primary: f64) -> StackedValue {
        let totals = if primary >= 0.0 {
            &mut self.positive
        } else {
            &mut self.negative
        };
        let total = totals.entry(secondary.to_bits()).or_insert(0.0);
        let start = *total;
        *total += primary;
        StackedValue { start, end: *total }
    }

    /// Sum of the positive values stacked at `secondary`.
    pub fn positive_total(&self, secondary: f64) -> f64 {
        self.positive.get(&secondary.to_bits()).copied().unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        self.positive.clear();
        self.negative.clear();
    }
}

impl Stacker for StackGroup {
    fn stack_point(&mut self, point: &ChartPoint) -> f64 {
        self.stack_value(point.secondary(), point.primary()).end
    }
}

/// Positions of the bar series that share the category space.
#[derive(Debug, Default)]
pub struct SeriesContext {
    columns: IndexMap<SeriesId, usize>,
    rows: IndexMap<SeriesId, usize>,
}

impl SeriesContext {
    /// Builds the context for `series`, in drawing order.
    ///
    /// Hidden series and series that ignore the bar position take no slot.
    pub fn new(series: &[Box<dyn ChartSeries>]) -> Self {
        let mut context = Self::default();
        for series in series {
            let properties = series.properties();
            if !series.is_visible()
                || !properties.contains(SeriesProperties::BAR)
                || series.ignores_bar_position()
            {
                continue;
            }
            let group = if properties.contains(SeriesProperties::PRIMARY_AXIS_HORIZONTAL_ORIENTATION) {
                &mut context.rows
            } else {
                &mut context.columns
            };
            let position = group.len();
            group.insert(series.id(), position);
        }
        context
    }

    pub fn column_position(&self, series: SeriesId) -> usize {
        self.columns.get(&series).copied().unwrap_or(0)
    }

    pub fn column_series_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_position(&self, series: SeriesId) -> usize {
        self.rows.get(&series).copied().unwrap_or(0)
    }

    pub fn row_series_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_signs_grow_apart() {
        let mut group = StackGroup::new();
        assert_eq!(group.stack_value(0.0, 2.0), StackedValue { start: 0.0, end: 2.0 });
        assert_eq!(group.stack_value(0.0, 3.0), StackedValue { start: 2.0, end: 5.0 });
        assert_eq!(group.stack_value(0.0, -1.0), StackedValue { start: 0.0, end: -1.0 });
        assert_eq!(group.stack_value(1.0, 4.0).start, 0.0);
        assert_eq!(group.positive_total(0.0), 5.0);

        group.clear();
        assert_eq!(group.positive_total(0.0), 0.0);
    }
}
