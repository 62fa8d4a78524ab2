//! Row and column bar series.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use livechart_core::profiling::profile_function;
use livechart_core::{Color, Point, Rect, Size};
use livechart_motion::{EasingFunction, Transition};
use livechart_test_utils::PaintStyle;
use tracing::{debug, trace};

use super::{
    ChartSeries, DataLabelsPosition, LEGEND_SHAPE_SIZE, MAX_SERIES_STROKE, MeasureContext,
    MiniatureShape, SeriesDirtyFlags, SeriesMiniature, SeriesProperties,
};
use crate::visuals::{HEIGHT, Visual, WIDTH, X, Y};
use crate::{
    Axis, AxisOrientation, Bounds, CanvasId, ChartError, ChartModel, ChartPoint, DataFactory,
    DimensionalBounds, HoverArea, IdentityMap, KeyHandle, LabelGeometry, Mapping, MotionCanvas,
    PaintRole, PaintTaskKey, Padding, Result, RoundedRectangleGeometry, Scaler, Scene,
    SeriesBounds, SeriesContext, SeriesId, SharedPoint, SizedGeometry, TooltipFindingStrategy,
    VisualHandle,
};

/// Builds the text of a data label.
pub type LabelFormatter = Arc<dyn Fn(&ChartPoint) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarOrientation {
    /// Horizontal bars; categories on the Y axis.
    Row,
    /// Vertical bars; categories on the X axis.
    Column,
}

/// Type-level bar orientation of a [`BarSeries`].
pub trait BarDirection: Send + Sync + 'static {
    const ORIENTATION: BarOrientation;
}

/// Marker for horizontal bars.
#[derive(Debug, Clone, Copy)]
pub struct Row;

/// Marker for vertical bars.
#[derive(Debug, Clone, Copy)]
pub struct Column;

impl BarDirection for Row {
    const ORIENTATION: BarOrientation = BarOrientation::Row;
}

impl BarDirection for Column {
    const ORIENTATION: BarOrientation = BarOrientation::Column;
}

/// Horizontal bars with rounded corners.
pub type RowSeries<M> = BarSeries<M, Row, RoundedRectangleGeometry>;

/// Vertical bars with rounded corners.
pub type ColumnSeries<M> = BarSeries<M, Column, RoundedRectangleGeometry>;

/// Width, half width and group offset of the bars of one measure, in
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub width: f32,
    pub half_width: f32,
    pub offset: f32,
}

impl BarLayout {
    /// Sizes bars for a category `unit_width` pixels wide.
    ///
    /// `group_padding` is taken from the category first, but never leaves
    /// less than a pixel. The rest is shared between `count` grouped series
    /// and the bar at `position` is shifted to its slot.
    pub fn new(
        unit_width: f32,
        group_padding: f32,
        position: usize,
        count: usize,
        grouped: bool,
        max_bar_width: f32,
    ) -> Self {
        let padding = if unit_width - group_padding < 1.0 {
            (unit_width - 1.0).max(0.0)
        } else {
            group_padding
        };
        let mut width = unit_width - padding;
        let mut half_width = width * 0.5;

        let mut offset = 0.0;
        if grouped && count > 1 {
            width /= count as f32;
            half_width = width * 0.5;
            offset = (position as f32 - count as f32 / 2.0) * width + half_width;
        }

        if width > max_bar_width {
            width = max_bar_width;
            half_width = width * 0.5;
        }

        Self {
            width,
            half_width,
            offset,
        }
    }
}

/// A series drawing one bar per point.
///
/// `O` picks the orientation, `V` the bar geometry.
///
/// # Example
///
/// ```
/// use livechart::prelude::*;
///
/// let series = ColumnSeries::new(vec![3.0, 5.0, 2.0])
///     .with_fill(Color::BLUE)
///     .with_max_bar_width(30.0)
///     .with_data_labels(Color::BLACK);
/// assert_eq!(series.values().len(), 3);
/// ```
pub struct BarSeries<M: ChartModel, O: BarDirection, V: SizedGeometry> {
    id: SeriesId,
    values: Vec<M>,
    mapping: Option<Mapping<M>>,
    factory: DataFactory<M>,

    fill: Option<Color>,
    stroke: Option<(Color, f32)>,
    z_index: f64,
    is_visible: bool,
    scales_x_at: usize,
    scales_y_at: usize,

    group_padding: f64,
    max_bar_width: f64,
    ignores_bar_position: bool,
    rx: f32,
    ry: f32,
    pivot: f64,
    /// Fraction of a tick added around the data on each axis.
    data_padding: (f64, f64),
    animations_speed: Option<Duration>,
    easing_function: Option<EasingFunction>,

    data_labels: Option<Color>,
    data_labels_size: f32,
    data_labels_padding: Padding,
    data_labels_position: DataLabelsPosition,
    data_labels_rotation: f32,
    data_labels_formatter: LabelFormatter,

    /// Points measured on each canvas, null ones included, by canvas and key.
    ever_fetched: IndexMap<(CanvasId, KeyHandle), SharedPoint>,
    miniature: SeriesMiniature,
    dirty: SeriesDirtyFlags,
    _marker: PhantomData<fn() -> (O, V)>,
}

impl<M: ChartModel, O: BarDirection, V: SizedGeometry> BarSeries<M, O, V> {
    pub fn new(values: Vec<M>) -> Self {
        let id = SeriesId::next();
        Self {
            id,
            values,
            mapping: None,
            factory: DataFactory::new(id),
            fill: None,
            stroke: None,
            z_index: 0.0,
            is_visible: true,
            scales_x_at: 0,
            scales_y_at: 0,
            group_padding: 10.0,
            max_bar_width: 50.0,
            ignores_bar_position: false,
            rx: 0.0,
            ry: 0.0,
            pivot: 0.0,
            data_padding: (0.5, 0.5),
            animations_speed: None,
            easing_function: None,
            data_labels: None,
            data_labels_size: 16.0,
            data_labels_padding: Padding::new(6.0, 8.0),
            data_labels_position: DataLabelsPosition::End,
            data_labels_rotation: 0.0,
            data_labels_formatter: Arc::new(|point: &ChartPoint| format!("{}", point.primary())),
            ever_fetched: IndexMap::new(),
            miniature: SeriesMiniature::default(),
            dirty: SeriesDirtyFlags::all(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn orientation(&self) -> BarOrientation {
        O::ORIENTATION
    }

    pub fn values(&self) -> &[M] {
        &self.values
    }

    /// Replaces the values; the next measure animates towards them.
    pub fn set_values(&mut self, values: Vec<M>) {
        self.values = values;
        self.dirty |= SeriesDirtyFlags::VALUES;
    }

    /// Edits the values in place.
    pub fn values_mut(&mut self) -> &mut Vec<M> {
        self.dirty |= SeriesDirtyFlags::VALUES;
        &mut self.values
    }

    pub fn factory(&self) -> &DataFactory<M> {
        &self.factory
    }

    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    pub fn group_padding(&self) -> f64 {
        self.group_padding
    }

    pub fn max_bar_width(&self) -> f64 {
        self.max_bar_width
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
        self.dirty |= SeriesDirtyFlags::STYLE | SeriesDirtyFlags::MINIATURE;
    }

    pub fn set_stroke(&mut self, stroke: Option<(Color, f32)>) {
        self.stroke = stroke;
        self.dirty |= SeriesDirtyFlags::STYLE | SeriesDirtyFlags::MINIATURE;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
        self.dirty |= SeriesDirtyFlags::STYLE;
    }

    pub fn with_mapping(
        mut self,
        mapping: impl Fn(&M, usize) -> crate::Coordinate + Send + Sync + 'static,
    ) -> Self {
        self.mapping = Some(Arc::new(mapping));
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.set_fill(Some(color));
        self
    }

    pub fn with_stroke(mut self, color: Color, thickness: f32) -> Self {
        self.set_stroke(Some((color, thickness)));
        self
    }

    pub fn with_z_index(mut self, z_index: f64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_axes(mut self, x: usize, y: usize) -> Self {
        self.scales_x_at = x;
        self.scales_y_at = y;
        self
    }

    pub fn with_group_padding(mut self, padding: f64) -> Self {
        self.group_padding = padding;
        self
    }

    pub fn with_max_bar_width(mut self, width: f64) -> Self {
        self.max_bar_width = width;
        self
    }

    pub fn with_ignores_bar_position(mut self, ignores: bool) -> Self {
        self.ignores_bar_position = ignores;
        self
    }

    /// Corner radii; only drawn by rounded geometries.
    pub fn with_corner_radius(mut self, rx: f32, ry: f32) -> Self {
        self.rx = rx;
        self.ry = ry;
        self
    }

    /// Value the bars grow from.
    pub fn with_pivot(mut self, pivot: f64) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_data_padding(mut self, x: f64, y: f64) -> Self {
        self.data_padding = (x, y);
        self
    }

    /// Overrides the chart animation duration for this series.
    pub fn with_animations_speed(mut self, speed: Duration) -> Self {
        self.animations_speed = Some(speed);
        self
    }

    pub fn with_easing_function(mut self, easing: EasingFunction) -> Self {
        self.easing_function = Some(easing);
        self
    }

    /// Draws a label per bar in `color`.
    pub fn with_data_labels(mut self, color: Color) -> Self {
        self.data_labels = Some(color);
        self
    }

    pub fn with_data_labels_size(mut self, size: f32) -> Self {
        self.data_labels_size = size;
        self
    }

    pub fn with_data_labels_padding(mut self, padding: Padding) -> Self {
        self.data_labels_padding = padding;
        self
    }

    pub fn with_data_labels_position(mut self, position: DataLabelsPosition) -> Self {
        self.data_labels_position = position;
        self
    }

    /// Label rotation in degrees, applied when the label is created.
    pub fn with_data_labels_rotation(mut self, degrees: f32) -> Self {
        self.data_labels_rotation = degrees;
        self
    }

    pub fn with_data_labels_formatter(
        mut self,
        formatter: impl Fn(&ChartPoint) -> String + Send + Sync + 'static,
    ) -> Self {
        self.data_labels_formatter = Arc::new(formatter);
        self
    }

    /// Points measured on `canvas`; null points have no visual.
    pub fn ever_fetched(&self, canvas: CanvasId) -> impl Iterator<Item = &SharedPoint> {
        self.ever_fetched
            .iter()
            .filter(move |((owner, _), _)| *owner == canvas)
            .map(|(_, point)| point)
    }

    fn transition(&self, context: &MeasureContext<'_>) -> Transition {
        Transition::new(
            self.animations_speed
                .unwrap_or(context.settings.animations_speed),
            self.easing_function
                .unwrap_or(context.settings.easing_function),
        )
    }

    fn actual_z_index(&self) -> f64 {
        let z_index = if self.z_index == 0.0 {
            self.id.raw() as f64
        } else {
            self.z_index
        };
        z_index + 0.1
    }

    fn register_paint_tasks(&self, scene: &mut Scene, clip: Rect) {
        let z_index = self.actual_z_index();
        let styles = [
            (
                PaintRole::Fill,
                self.fill.map(PaintStyle::fill),
                Some(clip),
            ),
            (
                PaintRole::Stroke,
                self.stroke
                    .map(|(color, thickness)| PaintStyle::stroke(color, thickness)),
                Some(clip),
            ),
            (
                PaintRole::DataLabels,
                self.data_labels.map(PaintStyle::fill),
                None,
            ),
        ];

        for (role, style, clip) in styles {
            let key = self.paint_key(role);
            match style {
                Some(style) => scene.upsert_paint_task(key, style.with_z_index(z_index), clip),
                None => scene.remove_paint_task(key),
            }
        }
    }

    #[inline]
    fn paint_key(&self, role: PaintRole) -> PaintTaskKey {
        PaintTaskKey::new(self.id, role)
    }

    /// The value axis and the category axis, in that order.
    /// The value and category axes of the series in `context`.
    fn axes<'a>(&self, context: &MeasureContext<'a>) -> Result<(&'a Axis, &'a Axis)> {
        let x_axis = axis_at(context.x_axes, self.scales_x_at, AxisOrientation::X, self.id)?;
        let y_axis = axis_at(context.y_axes, self.scales_y_at, AxisOrientation::Y, self.id)?;
        Ok(self.split_axes(x_axis, y_axis))
    }

    fn split_axes<'a>(&self, x_axis: &'a Axis, y_axis: &'a Axis) -> (&'a Axis, &'a Axis) {
        match O::ORIENTATION {
            BarOrientation::Row => (x_axis, y_axis),
            BarOrientation::Column => (y_axis, x_axis),
        }
    }

    fn layout(&self, secondary_scale: &Scaler, category_axis: &Axis, context: &SeriesContext) -> BarLayout {
        let (position, count) = match O::ORIENTATION {
            BarOrientation::Row => (context.row_position(self.id), context.row_series_count()),
            BarOrientation::Column => (
                context.column_position(self.id),
                context.column_series_count(),
            ),
        };
        BarLayout::new(
            secondary_scale.measure_in_pixels(category_axis.unit_width),
            self.group_padding as f32,
            position,
            count,
            !self.ignores_bar_position,
            self.max_bar_width as f32,
        )
    }

    /// A bar of zero length at the pivot `p`, in the slot of the category
    /// at pixel `secondary`.
    fn collapsed_rect(&self, p: f32, secondary: f32, layout: &BarLayout) -> Rect {
        let start = secondary - layout.half_width + layout.offset;
        match O::ORIENTATION {
            BarOrientation::Row => Rect::new(p, start, 0.0, layout.width),
            BarOrientation::Column => Rect::new(start, p, layout.width, 0.0),
        }
    }

    /// The bar of a value at pixel `primary`, growing from the pivot `p`.
    fn bar_rect(&self, primary: f32, secondary: f32, p: f32, is_greater: bool, layout: &BarLayout) -> Rect {
        let length = (primary - p).abs();
        let start = secondary - layout.half_width + layout.offset;
        match O::ORIENTATION {
            BarOrientation::Row => {
                let x = if is_greater { primary - length } else { primary };
                Rect::new(x, start, length, layout.width)
            }
            BarOrientation::Column => {
                let y = if is_greater { primary } else { primary - length };
                Rect::new(start, y, layout.width, length)
            }
        }
    }

    /// Center of a label of `size` placed around `bar`.
    pub fn label_position(&self, bar: Rect, size: Size, is_greater: bool) -> Point {
        let resolved = match self.data_labels_position {
            DataLabelsPosition::End => self.end_side(is_greater),
            DataLabelsPosition::Start => self.end_side(!is_greater),
            other => other,
        };

        let middle = bar.center();
        match resolved {
            DataLabelsPosition::Top => Point::new(middle.x, bar.y - size.height * 0.5),
            DataLabelsPosition::Bottom => {
                Point::new(middle.x, bar.bottom() + size.height * 0.5)
            }
            DataLabelsPosition::Left => Point::new(bar.x - size.width * 0.5, middle.y),
            DataLabelsPosition::Right => Point::new(bar.right() + size.width * 0.5, middle.y),
            _ => middle,
        }
    }

    fn end_side(&self, is_greater: bool) -> DataLabelsPosition {
        match (O::ORIENTATION, is_greater) {
            (BarOrientation::Row, true) => DataLabelsPosition::Right,
            (BarOrientation::Row, false) => DataLabelsPosition::Left,
            (BarOrientation::Column, true) => DataLabelsPosition::Top,
            (BarOrientation::Column, false) => DataLabelsPosition::Bottom,
        }
    }

    fn build_miniature(&self) -> SeriesMiniature {
        let rect = Rect::new(
            MAX_SERIES_STROKE,
            MAX_SERIES_STROKE,
            LEGEND_SHAPE_SIZE,
            LEGEND_SHAPE_SIZE,
        );
        let mut shapes = Vec::new();
        if let Some((color, thickness)) = self.stroke {
            shapes.push(MiniatureShape {
                style: PaintStyle::stroke(color, thickness.min(MAX_SERIES_STROKE)).with_z_index(1.0),
                rect,
            });
        }
        if let Some(color) = self.fill {
            shapes.push(MiniatureShape {
                style: PaintStyle::fill(color),
                rect,
            });
        }
        let side = LEGEND_SHAPE_SIZE + MAX_SERIES_STROKE * 2.0;
        SeriesMiniature {
            shapes,
            size: Size::new(side, side),
        }
    }

    /// Shrinks a point that left the data and stops tracking it.
    ///
    /// While zooming or panning the shrink is skipped and the visuals are
    /// collected on the next draw.
    #[allow(clippy::too_many_arguments)]
    fn soft_delete_or_dispose(
        &self,
        point: &SharedPoint,
        scene: &mut Scene,
        map: &mut IdentityMap,
        primary_scale: &Scaler,
        secondary_scale: &Scaler,
        is_zooming_or_panning: bool,
    ) -> Result<()> {
        let (visual, label, secondary_value) = {
            let point = point.lock();
            (point.context.visual, point.context.label, point.secondary())
        };
        let now = scene.now();

        if let Some(handle) = visual.filter(|handle| scene.contains(*handle)) {
            let bar = scene.get_mut::<V>(handle)?;
            if is_zooming_or_panning {
                bar.motion_mut().complete_transition(None)?;
            } else {
                let p = primary_scale.to_pixels(self.pivot);
                let secondary = secondary_scale.to_pixels(secondary_value);
                match O::ORIENTATION {
                    BarOrientation::Row => {
                        bar.set_channel(X, p, now)?;
                        bar.set_channel(Y, secondary, now)?;
                        bar.set_channel(WIDTH, 0.0, now)?;
                    }
                    BarOrientation::Column => {
                        bar.set_channel(X, secondary, now)?;
                        bar.set_channel(Y, p, now)?;
                        bar.set_channel(HEIGHT, 0.0, now)?;
                    }
                }
            }
            bar.motion_mut().set_remove_on_completed(true);
        }

        if let Some(handle) = label.filter(|handle| scene.contains(*handle)) {
            let label = scene.get_mut::<LabelGeometry>(handle)?;
            if is_zooming_or_panning {
                label.motion_mut().complete_transition(None)?;
            } else {
                label.set_text_size(1.0, now)?;
            }
            label.motion_mut().set_remove_on_completed(true);
        }

        self.factory.dispose_point(point, map);
        Ok(())
    }

    /// Creates the visual of a point seen for the first time, collapsed at
    /// the pivot and placed with the previous scale when there is one.
    fn create_visual(
        &self,
        scene: &mut Scene,
        start: Rect,
        transition: Transition,
    ) -> Result<VisualHandle> {
        let now = scene.now();
        let mut visual = V::from_rect(start);
        visual.set_corner_radius(self.rx, self.ry, now)?;
        let motion = visual.motion_mut();
        motion.set_transition(Some(&[X, WIDTH, Y, HEIGHT][..]), Some(transition))?;
        motion.complete_transition(None)?;
        Ok(scene.add_visual(visual))
    }

    fn create_label(
        &self,
        scene: &mut Scene,
        start: Point,
        transition: Transition,
    ) -> Result<VisualHandle> {
        let mut label = LabelGeometry::new(start, self.data_labels_size);
        label.rotation = self.data_labels_rotation;
        let motion = label.motion_mut();
        motion.set_transition(Some(&[X, Y][..]), Some(transition))?;
        motion.complete_transition(None)?;
        Ok(scene.add_visual(label))
    }
}

impl<M: ChartModel, O: BarDirection, V: SizedGeometry> ChartSeries for BarSeries<M, O, V> {
    fn id(&self) -> SeriesId {
        self.id
    }

    fn properties(&self) -> SeriesProperties {
        let orientation = match O::ORIENTATION {
            BarOrientation::Row => {
                SeriesProperties::PRIMARY_AXIS_HORIZONTAL_ORIENTATION
                    | SeriesProperties::PREFERS_Y_STRATEGY_TOOLTIPS
            }
            BarOrientation::Column => {
                SeriesProperties::PRIMARY_AXIS_VERTICAL_ORIENTATION
                    | SeriesProperties::PREFERS_X_STRATEGY_TOOLTIPS
            }
        };
        SeriesProperties::BAR | SeriesProperties::SOLID | orientation
    }

    fn scales_x_at(&self) -> usize {
        self.scales_x_at
    }

    fn scales_y_at(&self) -> usize {
        self.scales_y_at
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn ignores_bar_position(&self) -> bool {
        self.ignores_bar_position
    }

    fn bounds(
        &mut self,
        canvas: &mut MotionCanvas,
        x_axis: &Axis,
        y_axis: &Axis,
        control_size: Size,
    ) -> Result<SeriesBounds> {
        let (value_axis, category_axis) = self.split_axes(x_axis, y_axis);

        let canvas_id = canvas.id();
        let map = canvas.identity_mut().map_mut(self.id);
        let fetch = self
            .factory
            .fetch(&self.values, self.mapping.as_ref(), canvas_id, map);
        let base = self.factory.cartesian_bounds(
            fetch,
            None,
            category_axis.limits(),
            value_axis.limits(),
        )?;
        if base.is_previous {
            return Ok(base);
        }

        let b = base.bounds;
        let (padding_x, padding_y) = self.data_padding;
        let tick_primary = value_axis.tick(control_size, &b.visible_primary);
        let tick_secondary = category_axis.tick(control_size, &b.visible_secondary);
        let mut ts = tick_secondary.value * padding_x;
        let mut tp = tick_primary.value * padding_y;

        if b.visible_secondary.delta() == 0.0 {
            let ms = if b.visible_secondary.min == 0.0 { 1.0 } else { b.visible_secondary.min };
            ts = (0.1 * ms * padding_x).abs();
        }
        if b.visible_primary.delta() == 0.0 {
            let mp = if b.visible_primary.min == 0.0 { 1.0 } else { b.visible_primary.min };
            tp = (0.1 * mp * padding_y).abs();
        }

        let half = 0.5 * category_axis.unit_width;
        let categories = Bounds {
            max: b.secondary.max + half,
            min: b.secondary.min - half,
            min_delta: b.secondary.min_delta,
            padding_max: ts,
            padding_min: ts,
        };
        let values = Bounds {
            padding_max: tp,
            padding_min: tp,
            ..b.primary
        };
        let visible_categories = Bounds::with_range(
            b.visible_secondary.min - half,
            b.visible_secondary.max + half,
        );
        let visible_values = Bounds::with_range(b.visible_primary.min, b.visible_primary.max);

        let bounds = match O::ORIENTATION {
            BarOrientation::Row => DimensionalBounds {
                primary: categories,
                secondary: values,
                tertiary: b.tertiary,
                visible_primary: visible_categories,
                visible_secondary: visible_values,
                visible_tertiary: b.visible_tertiary,
            },
            BarOrientation::Column => DimensionalBounds {
                primary: values,
                secondary: categories,
                tertiary: b.tertiary,
                visible_primary: visible_values,
                visible_secondary: visible_categories,
                visible_tertiary: b.visible_tertiary,
            },
        };
        Ok(SeriesBounds::new(bounds, false))
    }

    fn measure(&mut self, context: &mut MeasureContext<'_>) -> Result<()> {
        profile_function!();
        if self.dirty.contains(SeriesDirtyFlags::MINIATURE) {
            self.miniature = self.build_miniature();
        }

        let (value_axis, category_axis) = self.axes(context)?;
        let location = context.draw_margin.location();
        let size = context.draw_margin.size();
        let primary_scale = Scaler::new(location, size, value_axis);
        let secondary_scale = Scaler::new(location, size, category_axis);
        let previous_secondary_scale = Scaler::previous(location, size, category_axis);

        let layout = self.layout(&secondary_scale, category_axis, context.series_context);
        let p = primary_scale.to_pixels(self.pivot);
        let transition = self.transition(context);
        let formatter = Arc::clone(&self.data_labels_formatter);
        let is_zooming_or_panning = context.is_zooming_or_panning;
        let surface = context.surface;

        let canvas_id = context.canvas.id();
        let (identity, scene) = context.canvas.split_mut();
        self.register_paint_tasks(scene, context.draw_margin);
        let now = scene.now();

        let mut to_delete: IndexMap<KeyHandle, SharedPoint> = self
            .ever_fetched
            .iter()
            .filter(|((owner, _), _)| *owner == canvas_id)
            .map(|((_, key), point)| (*key, Arc::clone(point)))
            .collect();

        let mut measured = 0usize;
        let map = identity.map_mut(self.id);
        let fetch = self
            .factory
            .fetch(&self.values, self.mapping.as_ref(), canvas_id, map);

        for shared in fetch {
            let shared = shared?;
            let mut point = shared.lock();
            let key = point.context.key;
            let primary = primary_scale.to_pixels(point.primary());
            let secondary = secondary_scale.to_pixels(point.secondary());

            if point.is_null() {
                if let Some(handle) = point.context.visual.take() {
                    let collapsed = self.collapsed_rect(p, secondary, &layout);
                    match scene.get_mut::<V>(handle) {
                        Ok(bar) => {
                            bar.set_rect(collapsed, now)?;
                            bar.motion_mut().set_remove_on_completed(true);
                        }
                        Err(ChartError::StaleVisual { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                if let Some(handle) = point.context.label.take() {
                    match scene.get_mut::<LabelGeometry>(handle) {
                        Ok(label) => label.motion_mut().set_remove_on_completed(true),
                        Err(ChartError::StaleVisual { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                point.context.hover_area = None;
                // Still tracked without a visual, so it is disposed once its
                // key leaves the values.
                to_delete.swap_remove(&key);
                self.ever_fetched
                    .entry((canvas_id, key))
                    .or_insert_with(|| Arc::clone(&shared));
                trace!(series = %self.id, ?key, "null point collapsed");
                continue;
            }

            let visual = match point.context.visual.filter(|handle| scene.contains(*handle)) {
                Some(handle) => handle,
                None => {
                    let start_secondary = previous_secondary_scale
                        .map_or(secondary, |scale| scale.to_pixels(point.secondary()));
                    let start = self.collapsed_rect(p, start_secondary, &layout);
                    let handle = self.create_visual(scene, start, transition)?;
                    point.context.visual = Some(handle);
                    self.ever_fetched
                        .entry((canvas_id, key))
                        .or_insert_with(|| Arc::clone(&shared));
                    handle
                }
            };

            if self.fill.is_some() {
                scene.add_geometry(self.paint_key(PaintRole::Fill), visual);
            }
            if self.stroke.is_some() {
                scene.add_geometry(self.paint_key(PaintRole::Stroke), visual);
            }

            let is_greater = point.primary() > self.pivot;
            let rect = self.bar_rect(primary, secondary, p, is_greater, &layout);
            let bar = scene.get_mut::<V>(visual)?;
            bar.set_rect(rect, now)?;
            bar.set_corner_radius(self.rx, self.ry, now)?;
            bar.motion_mut().set_remove_on_completed(false);

            point.context.hover_area = Some(HoverArea::new(rect));
            to_delete.swap_remove(&key);
            measured += 1;

            if self.data_labels.is_none() {
                continue;
            }

            let label = match point.context.label.filter(|handle| scene.contains(*handle)) {
                Some(handle) => handle,
                None => {
                    let start = self.collapsed_rect(p, secondary, &layout).location();
                    let handle = self.create_label(scene, start, transition)?;
                    point.context.label = Some(handle);
                    handle
                }
            };
            scene.add_geometry(self.paint_key(PaintRole::DataLabels), label);

            let text = formatter(&*point);
            let label = scene.get_mut::<LabelGeometry>(label)?;
            label.text = text;
            label.padding = self.data_labels_padding;
            label.set_text_size(self.data_labels_size, now)?;
            label.motion_mut().set_remove_on_completed(false);
            let label_size = label.measure(surface)?;
            label.set_position(self.label_position(rect, label_size, is_greater), now)?;
        }

        let map = identity.map_mut(self.id);
        let removed = to_delete.len();
        for (key, point) in to_delete {
            self.soft_delete_or_dispose(
                &point,
                scene,
                map,
                &primary_scale,
                &secondary_scale,
                is_zooming_or_panning,
            )?;
            self.ever_fetched.swap_remove(&(canvas_id, key));
        }

        self.dirty = SeriesDirtyFlags::empty();
        debug!(series = %self.id, measured, removed, "measured bar series");
        Ok(())
    }

    fn soft_delete_points(&mut self, context: &mut MeasureContext<'_>) -> Result<()> {
        self.dirty.remove(SeriesDirtyFlags::VALUES | SeriesDirtyFlags::STYLE);
        let canvas_id = context.canvas.id();
        let points: Vec<SharedPoint> = self.ever_fetched(canvas_id).cloned().collect();
        if points.is_empty() {
            return Ok(());
        }

        let (value_axis, category_axis) = self.axes(context)?;
        let location = context.draw_margin.location();
        let size = context.draw_margin.size();
        let primary_scale = Scaler::new(location, size, value_axis);
        let secondary_scale = Scaler::new(location, size, category_axis);
        let is_zooming_or_panning = context.is_zooming_or_panning;

        let (identity, scene) = context.canvas.split_mut();
        let map = identity.map_mut(self.id);
        for point in &points {
            self.soft_delete_or_dispose(
                point,
                scene,
                map,
                &primary_scale,
                &secondary_scale,
                is_zooming_or_panning,
            )?;
        }
        self.ever_fetched.retain(|(owner, _), _| *owner != canvas_id);
        debug!(series = %self.id, removed = points.len(), "hidden series soft-deleted");
        Ok(())
    }

    fn fetch<'a>(
        &'a self,
        canvas: &'a mut MotionCanvas,
    ) -> Box<dyn Iterator<Item = Result<SharedPoint>> + 'a> {
        let canvas_id = canvas.id();
        let map = canvas.identity_mut().map_mut(self.id);
        Box::new(
            self.factory
                .fetch(&self.values, self.mapping.as_ref(), canvas_id, map),
        )
    }

    fn miniature(&mut self) -> &SeriesMiniature {
        if self.dirty.contains(SeriesDirtyFlags::MINIATURE) {
            self.miniature = self.build_miniature();
            self.dirty.remove(SeriesDirtyFlags::MINIATURE);
        }
        &self.miniature
    }

    fn dirty_flags(&self) -> SeriesDirtyFlags {
        self.dirty
    }

    fn find_hit_points(
        &self,
        canvas: &MotionCanvas,
        pointer: Point,
        strategy: TooltipFindingStrategy,
    ) -> Vec<SharedPoint> {
        let strategy = self.properties().tooltip_strategy(strategy);
        self.ever_fetched(canvas.id())
            .filter(|point| {
                point
                    .lock()
                    .context
                    .hover_area
                    .is_some_and(|area| area.is_pointer_over(pointer, strategy))
            })
            .cloned()
            .collect()
    }

    fn restart_visuals(&mut self, canvas: &mut MotionCanvas) -> Result<()> {
        self.factory.restart_visuals(canvas)?;
        let canvas_id = canvas.id();
        self.ever_fetched.retain(|(owner, _), _| *owner != canvas_id);
        Ok(())
    }

    fn dispose(&mut self, canvas: &mut MotionCanvas) {
        let canvas_id = canvas.id();
        let scene = canvas.scene_mut();
        // Visuals of a series without paints belong to no paint task.
        self.ever_fetched.retain(|(owner, _), point| {
            if *owner != canvas_id {
                return true;
            }
            let mut point = point.lock();
            for handle in [point.context.visual.take(), point.context.label.take()]
                .into_iter()
                .flatten()
            {
                scene.remove_visual(handle);
            }
            false
        });
        scene.remove_series(self.id);
        self.factory.dispose(canvas);
    }
}

impl<M: ChartModel, O: BarDirection, V: SizedGeometry> fmt::Debug for BarSeries<M, O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarSeries")
            .field("id", &self.id)
            .field("orientation", &O::ORIENTATION)
            .field("values", &self.values.len())
            .field("ever_fetched", &self.ever_fetched.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

fn axis_at(
    axes: &[Axis],
    index: usize,
    orientation: AxisOrientation,
    series: SeriesId,
) -> Result<&Axis> {
    axes.get(index).ok_or(ChartError::UnknownAxis {
        series,
        orientation: orientation.as_str(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_single_series() {
        let layout = BarLayout::new(40.0, 10.0, 0, 1, true, 50.0);
        assert_eq!(layout.width, 30.0);
        assert_eq!(layout.half_width, 15.0);
        assert_eq!(layout.offset, 0.0);
    }

    #[test]
    fn test_layout_groups_series() {
        for position in 0..2 {
            let layout = BarLayout::new(40.0, 10.0, position, 2, true, 50.0);
            assert_eq!(layout.width, 15.0);
            assert_eq!(layout.offset, (position as f32 - 1.0) * 15.0 + 7.5);
        }
        let alone = BarLayout::new(40.0, 10.0, 1, 2, false, 50.0);
        assert_eq!(alone.width, 30.0);
        assert_eq!(alone.offset, 0.0);
    }

    #[test]
    fn test_layout_padding_keeps_a_pixel() {
        let layout = BarLayout::new(8.0, 10.0, 0, 1, true, 50.0);
        assert_eq!(layout.width, 1.0);
    }

    #[test]
    fn test_layout_caps_width() {
        let layout = BarLayout::new(200.0, 10.0, 0, 1, true, 50.0);
        assert_eq!(layout.width, 50.0);
        assert_eq!(layout.half_width, 25.0);
    }

    #[test]
    fn test_label_positions() {
        let bar = Rect::new(10.0, 20.0, 30.0, 40.0);
        let label = Size::new(10.0, 6.0);

        let column = ColumnSeries::new(vec![1.0]);
        assert_eq!(column.label_position(bar, label, true), Point::new(25.0, 17.0));
        assert_eq!(column.label_position(bar, label, false), Point::new(25.0, 63.0));

        let row = RowSeries::new(vec![1.0]).with_data_labels_position(DataLabelsPosition::Start);
        assert_eq!(row.label_position(bar, label, true), Point::new(5.0, 40.0));

        let middle = row.with_data_labels_position(DataLabelsPosition::Middle);
        assert_eq!(middle.label_position(bar, label, true), bar.center());
    }

    #[test]
    fn test_miniature() {
        let mut series = ColumnSeries::new(vec![1.0])
            .with_fill(Color::BLUE)
            .with_stroke(Color::RED, 8.0);
        let miniature = series.miniature().clone();

        assert_eq!(miniature.size, Size::new(21.0, 21.0));
        assert_eq!(miniature.shapes.len(), 2);
        assert_eq!(miniature.shapes[0].style.stroke_thickness, MAX_SERIES_STROKE);
        assert_eq!(miniature.shapes[1].rect, Rect::new(3.0, 3.0, 15.0, 15.0));
        assert!(!series.dirty_flags().contains(SeriesDirtyFlags::MINIATURE));

        series.set_fill(None);
        assert_eq!(series.miniature().shapes.len(), 1);
    }

    #[test]
    fn test_properties() {
        let row = RowSeries::new(vec![1.0]);
        assert!(row.properties().contains(SeriesProperties::PRIMARY_AXIS_HORIZONTAL_ORIENTATION));
        assert_eq!(row.orientation(), BarOrientation::Row);
        assert!(ColumnSeries::new(vec![1.0])
            .properties()
            .contains(SeriesProperties::BAR | SeriesProperties::PREFERS_X_STRATEGY_TOOLTIPS));
    }
}
