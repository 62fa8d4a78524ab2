//! Series: the link between user data and the visuals of a chart.

mod bar;

pub use bar::*;

use std::any::Any;

use livechart_core::{Point, Rect, Size};
use livechart_test_utils::{DrawingSurface, PaintStyle};

use crate::{
    Axis, ChartSettings, MotionCanvas, Result, SeriesBounds, SeriesContext, SeriesId,
    SharedPoint, TooltipFindingStrategy,
};

/// Side of a legend miniature shape, in pixels.
pub const LEGEND_SHAPE_SIZE: f32 = 15.0;

/// Thickest stroke drawn in a legend miniature.
pub const MAX_SERIES_STROKE: f32 = 3.0;

bitflags::bitflags! {
    /// What kind of series this is and how it prefers to be hit tested.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeriesProperties: u32 {
        const BAR = 0b0000_0001;
        /// Values run along the X axis (rows).
        const PRIMARY_AXIS_HORIZONTAL_ORIENTATION = 0b0000_0010;
        /// Values run along the Y axis (columns).
        const PRIMARY_AXIS_VERTICAL_ORIENTATION = 0b0000_0100;
        const SOLID = 0b0000_1000;
        const PREFERS_X_STRATEGY_TOOLTIPS = 0b0001_0000;
        const PREFERS_Y_STRATEGY_TOOLTIPS = 0b0010_0000;
    }
}

impl SeriesProperties {
    /// Resolves [`TooltipFindingStrategy::Automatic`] for this series.
    pub fn tooltip_strategy(&self, requested: TooltipFindingStrategy) -> TooltipFindingStrategy {
        if requested != TooltipFindingStrategy::Automatic {
            return requested;
        }
        if self.contains(Self::PREFERS_X_STRATEGY_TOOLTIPS) {
            TooltipFindingStrategy::CompareOnlyX
        } else if self.contains(Self::PREFERS_Y_STRATEGY_TOOLTIPS) {
            TooltipFindingStrategy::CompareOnlyY
        } else {
            TooltipFindingStrategy::CompareAll
        }
    }
}

bitflags::bitflags! {
    /// What changed on a series since its last measure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeriesDirtyFlags: u8 {
        /// The legend miniature must be rebuilt.
        const MINIATURE = 0b0000_0001;
        /// The values were replaced or edited.
        const VALUES = 0b0000_0010;
        /// Paints or geometry settings changed.
        const STYLE = 0b0000_0100;
    }
}

impl SeriesDirtyFlags {
    /// Check if the chart must measure again.
    pub fn needs_measure(&self) -> bool {
        self.intersects(Self::VALUES | Self::STYLE)
    }
}

/// One shape of a legend miniature.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniatureShape {
    pub style: PaintStyle,
    pub rect: Rect,
}

/// The small drawing that stands for a series in a legend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesMiniature {
    pub shapes: Vec<MiniatureShape>,
    pub size: Size,
}

impl SeriesMiniature {
    /// Paints the miniature with its top-left corner at `origin`.
    pub fn draw(&self, surface: &dyn DrawingSurface, origin: Point) {
        for shape in &self.shapes {
            let rect = Rect::new(
                origin.x + shape.rect.x,
                origin.y + shape.rect.y,
                shape.rect.width,
                shape.rect.height,
            );
            surface.begin_paint(&shape.style, None);
            surface.draw_rect(rect, Point::ZERO);
            surface.end_paint();
        }
    }
}

/// Where a data label sits relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataLabelsPosition {
    Top,
    Bottom,
    Left,
    Right,
    Middle,
    /// At the base of the bar, outside.
    Start,
    /// Past the tip of the bar.
    #[default]
    End,
}

/// Everything a series needs to measure itself on a chart.
pub struct MeasureContext<'a> {
    pub canvas: &'a mut MotionCanvas,
    pub x_axes: &'a [Axis],
    pub y_axes: &'a [Axis],
    pub draw_margin: Rect,
    pub series_context: &'a SeriesContext,
    pub settings: &'a ChartSettings,
    /// Removed points skip their exit animation while set.
    pub is_zooming_or_panning: bool,
    pub surface: &'a dyn DrawingSurface,
}

/// A series a [`CartesianChart`](crate::CartesianChart) can drive.
pub trait ChartSeries: Any + Send {
    fn id(&self) -> SeriesId;

    fn properties(&self) -> SeriesProperties;

    /// Index of the X axis this series scales at.
    fn scales_x_at(&self) -> usize {
        0
    }

    fn scales_y_at(&self) -> usize {
        0
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Whether the series takes the whole category width instead of a slot
    /// among the other bar series.
    fn ignores_bar_position(&self) -> bool {
        false
    }

    /// Bounds of the series on `canvas`, in chart axis terms: `primary`
    /// feeds the Y axis and `secondary` the X axis.
    fn bounds(
        &mut self,
        canvas: &mut MotionCanvas,
        x_axis: &Axis,
        y_axis: &Axis,
        control_size: Size,
    ) -> Result<SeriesBounds>;

    /// Places the visuals of every point and sets their motion targets.
    fn measure(&mut self, context: &mut MeasureContext<'_>) -> Result<()>;

    /// Shrinks every visual of a hidden series and forgets its points, so
    /// showing it again starts from fresh points.
    fn soft_delete_points(&mut self, context: &mut MeasureContext<'_>) -> Result<()>;

    /// Fetches the points of the series on `canvas`.
    fn fetch<'a>(
        &'a self,
        canvas: &'a mut MotionCanvas,
    ) -> Box<dyn Iterator<Item = Result<SharedPoint>> + 'a>;

    /// The legend miniature, rebuilt first if it is dirty.
    fn miniature(&mut self) -> &SeriesMiniature;

    fn dirty_flags(&self) -> SeriesDirtyFlags;

    /// Points whose hover area is under `pointer` on `canvas`.
    fn find_hit_points(
        &self,
        canvas: &MotionCanvas,
        pointer: Point,
        strategy: TooltipFindingStrategy,
    ) -> Vec<SharedPoint>;

    /// Forgets the points of the series on `canvas` so the next measure
    /// recreates them; current visuals are dropped without animating.
    fn restart_visuals(&mut self, canvas: &mut MotionCanvas) -> Result<()>;

    /// Drops every point, visual and paint task of the series on `canvas`.
    fn dispose(&mut self, canvas: &mut MotionCanvas);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_strategy_preference() {
        let rows = SeriesProperties::BAR | SeriesProperties::PREFERS_Y_STRATEGY_TOOLTIPS;
        assert_eq!(
            rows.tooltip_strategy(TooltipFindingStrategy::Automatic),
            TooltipFindingStrategy::CompareOnlyY
        );
        assert_eq!(
            rows.tooltip_strategy(TooltipFindingStrategy::CompareAll),
            TooltipFindingStrategy::CompareAll
        );
        assert_eq!(
            SeriesProperties::SOLID.tooltip_strategy(TooltipFindingStrategy::Automatic),
            TooltipFindingStrategy::CompareAll
        );
    }

    #[test]
    fn test_dirty_flags() {
        assert!(!SeriesDirtyFlags::MINIATURE.needs_measure());
        assert!((SeriesDirtyFlags::MINIATURE | SeriesDirtyFlags::VALUES).needs_measure());
    }
}
