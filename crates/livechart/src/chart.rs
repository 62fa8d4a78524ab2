//! The cartesian chart: owner of a canvas, its axes and its series.

use std::any::Any;
use std::fmt;

use livechart_core::profiling::{profile_function, profile_scope};
use livechart_core::{Point, Rect, Size};
use livechart_test_utils::DrawingSurface;
use tracing::{debug, info};

use crate::series::MeasureContext;
use crate::{
    Axis, AxisOrientation, ChartError, ChartSeries, ChartSettings, FrameStats, MotionCanvas,
    Result, SeriesContext, SeriesId, SharedPoint,
};

/// Runs the bounds, measure and draw phases of a set of series on one
/// canvas.
///
/// # Example
///
/// ```
/// use livechart::prelude::*;
/// use livechart_test_utils::MockDrawingSurface;
///
/// let mut chart = CartesianChart::with_canvas(
///     ChartSettings::default().without_animations(),
///     MotionCanvas::with_clock(FrameClock::manual()),
/// );
/// chart.resize(Size::new(300.0, 200.0));
/// let id = chart.add_series(RowSeries::new(vec![4.0, 2.0]).with_fill(Color::RED));
///
/// let surface = MockDrawingSurface::new();
/// chart.update(&surface).unwrap();
/// assert_eq!(surface.count_rects(), 2);
///
/// chart.series_mut::<RowSeries<f64>>(id).unwrap().set_values(vec![4.0]);
/// chart.update(&surface).unwrap();
/// ```
pub struct CartesianChart {
    canvas: MotionCanvas,
    series: Vec<Box<dyn ChartSeries>>,
    x_axes: Vec<Axis>,
    y_axes: Vec<Axis>,
    settings: ChartSettings,
    control_size: Size,
    is_zooming_or_panning: bool,
}

impl CartesianChart {
    /// A chart on a wall-clock canvas with one X and one Y axis.
    pub fn new(settings: ChartSettings) -> Self {
        Self::with_canvas(settings, MotionCanvas::new())
    }

    pub fn with_canvas(settings: ChartSettings, canvas: MotionCanvas) -> Self {
        Self {
            canvas,
            series: Vec::new(),
            x_axes: vec![Axis::x()],
            y_axes: vec![Axis::y()],
            settings,
            control_size: Size::ZERO,
            is_zooming_or_panning: false,
        }
    }

    pub fn canvas(&self) -> &MotionCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut MotionCanvas {
        &mut self.canvas
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ChartSettings {
        &mut self.settings
    }

    /// Adds a series and returns its id.
    pub fn add_series<S: ChartSeries>(&mut self, series: S) -> SeriesId {
        let id = series.id();
        self.series.push(Box::new(series));
        id
    }

    /// Removes a series together with its points, visuals and paint tasks.
    pub fn remove_series(&mut self, id: SeriesId) -> bool {
        let Some(index) = self.series.iter().position(|series| series.id() == id) else {
            return false;
        };
        let mut series = self.series.remove(index);
        series.dispose(&mut self.canvas);
        debug!(series = %id, "removed series");
        true
    }

    pub fn series(&self) -> &[Box<dyn ChartSeries>] {
        &self.series
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// The series `id` as its concrete type.
    pub fn series_mut<S: ChartSeries>(&mut self, id: SeriesId) -> Option<&mut S> {
        let series = self.series.iter_mut().find(|series| series.id() == id)?;
        let any: &mut dyn Any = &mut **series;
        any.downcast_mut()
    }

    pub fn x_axes(&self) -> &[Axis] {
        &self.x_axes
    }

    pub fn y_axes(&self) -> &[Axis] {
        &self.y_axes
    }

    pub fn set_x_axes(&mut self, axes: Vec<Axis>) {
        self.x_axes = axes;
    }

    pub fn set_y_axes(&mut self, axes: Vec<Axis>) {
        self.y_axes = axes;
    }

    pub fn resize(&mut self, size: Size) {
        self.control_size = size;
    }

    pub fn control_size(&self) -> Size {
        self.control_size
    }

    /// The area series draw in.
    pub fn draw_margin(&self) -> Rect {
        self.settings.draw_margin.apply(self.control_size)
    }

    /// While set, removed points vanish without animating.
    pub fn set_zooming_or_panning(&mut self, active: bool) {
        self.is_zooming_or_panning = active;
    }

    pub fn is_zooming_or_panning(&self) -> bool {
        self.is_zooming_or_panning
    }

    /// Sizes the axes from the series bounds and measures every visible
    /// series. Hidden series shrink their visuals out.
    pub fn measure(&mut self, surface: &dyn DrawingSurface) -> Result<()> {
        profile_function!();
        for axis in self.x_axes.iter_mut().chain(self.y_axes.iter_mut()) {
            axis.initialize();
        }

        {
            profile_scope!("bounds");
            for series in self.series.iter_mut().filter(|series| series.is_visible()) {
                let (x_index, y_index) = (series.scales_x_at(), series.scales_y_at());
                let id = series.id();
                let x_axis = self
                    .x_axes
                    .get(x_index)
                    .ok_or_else(|| unknown_axis(id, AxisOrientation::X, x_index))?;
                let y_axis = self
                    .y_axes
                    .get(y_index)
                    .ok_or_else(|| unknown_axis(id, AxisOrientation::Y, y_index))?;

                let bounds = series
                    .bounds(&mut self.canvas, x_axis, y_axis, self.control_size)?
                    .bounds;
                self.x_axes[x_index].append_bounds(&bounds.secondary, &bounds.visible_secondary);
                self.y_axes[y_index].append_bounds(&bounds.primary, &bounds.visible_primary);
            }
        }

        let series_context = SeriesContext::new(&self.series);
        let mut context = MeasureContext {
            canvas: &mut self.canvas,
            x_axes: &self.x_axes,
            y_axes: &self.y_axes,
            draw_margin: self.settings.draw_margin.apply(self.control_size),
            series_context: &series_context,
            settings: &self.settings,
            is_zooming_or_panning: self.is_zooming_or_panning,
            surface,
        };

        for series in self.series.iter_mut() {
            if series.is_visible() {
                series.measure(&mut context)?;
            } else {
                series.soft_delete_points(&mut context)?;
            }
        }
        Ok(())
    }

    /// Whether a series changed since the last measure.
    pub fn needs_measure(&self) -> bool {
        self.series
            .iter()
            .any(|series| series.dirty_flags().needs_measure())
    }

    /// Paints the current frame.
    pub fn draw(&mut self, surface: &dyn DrawingSurface) -> FrameStats {
        self.canvas.draw(surface)
    }

    /// Measures, then draws.
    pub fn update(&mut self, surface: &dyn DrawingSurface) -> Result<FrameStats> {
        self.measure(surface)?;
        Ok(self.draw(surface))
    }

    /// Points under `pointer`, using the chart's tooltip finding strategy.
    pub fn find_hit_points(&self, pointer: Point) -> Vec<SharedPoint> {
        let strategy = self.settings.tooltip_finding_strategy;
        self.series
            .iter()
            .filter(|series| series.is_visible())
            .flat_map(|series| series.find_hit_points(&self.canvas, pointer, strategy))
            .collect()
    }

    /// Disposes every series and clears the canvas.
    pub fn dispose(&mut self) {
        for series in &mut self.series {
            series.dispose(&mut self.canvas);
        }
        self.series.clear();
        self.canvas.clear();
        info!(canvas = self.canvas.id().raw(), "chart disposed");
    }
}

impl fmt::Debug for CartesianChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartesianChart")
            .field("canvas", &self.canvas.id())
            .field("series", &self.series.len())
            .field("x_axes", &self.x_axes.len())
            .field("y_axes", &self.y_axes.len())
            .field("control_size", &self.control_size)
            .finish_non_exhaustive()
    }
}

fn unknown_axis(series: SeriesId, orientation: AxisOrientation, index: usize) -> ChartError {
    ChartError::UnknownAxis {
        series,
        orientation: orientation.as_str(),
        index,
    }
}
