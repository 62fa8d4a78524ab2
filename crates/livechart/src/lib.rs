//! Animated chart core.
//!
//! livechart turns user data into animated chart visuals. The pipeline for
//! one frame is:
//!
//! 1. [`CartesianChart::measure`] asks every series for its
//!    [`SeriesBounds`] and sizes the axes from them.
//! 2. Each series fetches its points through its [`DataFactory`], which
//!    keeps exactly one [`ChartPoint`] per identity key and canvas.
//! 3. The series computes pixel geometry and sets it as motion targets on
//!    the point visuals living in the [`MotionCanvas`].
//! 4. [`MotionCanvas::draw`] advances the frame clock, paints every visual
//!    at its interpolated state and collects soft-deleted visuals whose
//!    transitions finished.
//!
//! # Example
//!
//! ```rust
//! use livechart::prelude::*;
//! use livechart_test_utils::MockDrawingSurface;
//!
//! let mut chart = CartesianChart::new(ChartSettings::default());
//! chart.resize(Size::new(400.0, 300.0));
//! chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::BLUE));
//!
//! let surface = MockDrawingSurface::new();
//! chart.update(&surface).unwrap();
//! assert_eq!(surface.count_rects(), 3);
//! ```

pub mod bounds;
pub mod canvas;
pub mod chart;
pub mod data_factory;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod model;
pub mod point;
pub mod scaler;
pub mod series;
pub mod series_context;
pub mod settings;
pub mod visuals;

pub use bounds::{Bounds, DimensionalBounds, SeriesBounds};
pub use canvas::{FrameStats, MotionCanvas, PaintRole, PaintTask, PaintTaskKey, Scene, VisualHandle};
pub use chart::CartesianChart;
pub use data_factory::{DataFactory, Fetch};
pub use error::{ChartError, Result};
pub use identity::{CanvasId, IdentityMap, IdentityRegistry, KeyHandle, PointIdentityStrategy, SeriesId};
pub use model::{ChartModel, Coordinate, Mapping};
pub use point::{ChartPoint, HoverArea, PointContext, SharedPoint, TooltipFindingStrategy};
pub use scaler::{Axis, AxisLimits, AxisOrientation, AxisTick, Scaler};
pub use series::{
    BarDirection, BarLayout, BarOrientation, BarSeries, ChartSeries, Column, ColumnSeries,
    DataLabelsPosition, LabelFormatter, MeasureContext, MiniatureShape, Row, RowSeries,
    SeriesDirtyFlags, SeriesMiniature, SeriesProperties, LEGEND_SHAPE_SIZE, MAX_SERIES_STROKE,
};
pub use series_context::{SeriesContext, StackGroup, StackedValue, Stacker};
pub use settings::{ChartSettings, Margin};
pub use visuals::{
    LabelGeometry, Padding, RectangleGeometry, RoundedRectangleGeometry, SizedGeometry, Visual,
};

pub use livechart_motion::{EasingFunction, FrameClock, Transition};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Axis, BarSeries, CartesianChart, ChartModel, ChartSeries, ChartSettings, ColumnSeries,
        Coordinate, DataLabelsPosition, EasingFunction, FrameClock, MotionCanvas, RowSeries,
        SeriesId, Transition,
    };
    pub use livechart_core::{Color, Point, Rect, Size};
    pub use livechart_test_utils::{DrawingSurface, PaintStyle};
}

static_assertions::assert_impl_all!(CartesianChart: Send);
static_assertions::assert_impl_all!(MotionCanvas: Send, Sync);
static_assertions::assert_impl_all!(ChartPoint: Send);
