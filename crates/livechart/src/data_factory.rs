//! Maps user models to persistent chart points and accumulates their
//! bounds.

use std::iter::{Enumerate, FusedIterator};
use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use livechart_core::profiling::profile_function;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    AxisLimits, CanvasId, ChartError, ChartModel, ChartPoint, DimensionalBounds,
    IdentityMap, Mapping, MotionCanvas, PointIdentityStrategy, Result, SeriesBounds, SeriesId,
    SharedPoint, Stacker,
};

/// The point pipeline of one series.
///
/// Points themselves live in the [`IdentityMap`] of each canvas the series
/// is drawn on; the factory only carries the identity strategy and the last
/// bounds that had data.
#[derive(Debug)]
pub struct DataFactory<M: ChartModel> {
    series: SeriesId,
    strategy: PointIdentityStrategy,
    previous_known_bounds: DimensionalBounds,
    _model: PhantomData<fn() -> M>,
}

impl<M: ChartModel> DataFactory<M> {
    pub fn new(series: SeriesId) -> Self {
        Self {
            series,
            strategy: PointIdentityStrategy::of::<M>(),
            previous_known_bounds: DimensionalBounds::zeroed(),
            _model: PhantomData,
        }
    }

    #[inline]
    pub fn series(&self) -> SeriesId {
        self.series
    }

    #[inline]
    pub fn strategy(&self) -> PointIdentityStrategy {
        self.strategy
    }

    /// Bounds of the last pass that produced points.
    pub fn previous_known_bounds(&self) -> &DimensionalBounds {
        &self.previous_known_bounds
    }

    /// Lazily maps `values` to chart points tracked in `map`.
    ///
    /// Each item reuses the point already tracked for its key or creates
    /// one, then refreshes its index, data source and coordinate. The
    /// iterator is single pass and stops after the first error.
    pub fn fetch<'a>(
        &self,
        values: &'a [M],
        mapping: Option<&'a Mapping<M>>,
        canvas: CanvasId,
        map: &'a mut IdentityMap,
    ) -> Fetch<'a, M> {
        Fetch {
            values: values.iter().enumerate(),
            mapping,
            map,
            strategy: self.strategy,
            series: self.series,
            canvas,
            failed: false,
        }
    }

    /// Stops tracking `point`.
    ///
    /// Untracked points are ignored, as are reference-keyed points that lost
    /// their data source.
    pub fn dispose_point(&self, point: &SharedPoint, map: &mut IdentityMap) {
        let key = {
            let point = point.lock();
            if self.strategy == PointIdentityStrategy::ReferenceKey && !point.has_data_source() {
                return;
            }
            point.context.key
        };

        if map.get(&key).is_some_and(|tracked| Arc::ptr_eq(tracked, point)) {
            map.remove(&key);
        }
    }

    /// Drops every point of the series on `canvas`.
    pub fn dispose(&self, canvas: &mut MotionCanvas) {
        if let Some(map) = canvas.identity_mut().remove(self.series) {
            debug!(series = %self.series, points = map.len(), "disposed identity map");
        }
    }

    /// Accumulates the bounds of cartesian points.
    ///
    /// Null points are skipped. With a stacker, the stacked end replaces the
    /// primary value. Only points inside both limits count as visible.
    pub fn cartesian_bounds(
        &mut self,
        points: impl Iterator<Item = Result<SharedPoint>>,
        mut stacker: Option<&mut dyn Stacker>,
        secondary_limits: AxisLimits,
        primary_limits: AxisLimits,
    ) -> Result<SeriesBounds> {
        profile_function!();
        let mut bounds = DimensionalBounds::empty();
        let mut previous: Option<(f64, f64)> = None;

        for point in points {
            let point = point?;
            let point = point.lock();
            if point.is_null() {
                continue;
            }

            let primary = match stacker.as_deref_mut() {
                Some(stacker) => stacker.stack_point(&point),
                None => point.primary(),
            };
            let secondary = point.secondary();
            let tertiary = point.tertiary();

            bounds.primary.append_value(primary);
            bounds.secondary.append_value(secondary);
            bounds.tertiary.append_value(tertiary);

            if primary_limits.contains(primary) && secondary_limits.contains(secondary) {
                bounds.visible_primary.append_value(primary);
                bounds.visible_secondary.append_value(secondary);
                bounds.visible_tertiary.append_value(tertiary);
            }

            if let Some((previous_primary, previous_secondary)) = previous {
                bounds.secondary.track_delta((secondary - previous_secondary).abs());
                bounds.primary.track_delta((primary - previous_primary).abs());
            }
            previous = Some((primary, secondary));
        }

        Ok(self.finish_bounds(bounds))
    }

    /// Accumulates the bounds of financial points: the primary range spans
    /// from the low to the high of each point.
    pub fn financial_bounds(
        &mut self,
        points: impl Iterator<Item = Result<SharedPoint>>,
        secondary_limits: AxisLimits,
        primary_limits: AxisLimits,
    ) -> Result<SeriesBounds> {
        profile_function!();
        let mut bounds = DimensionalBounds::empty();
        let mut previous: Option<(f64, f64)> = None;

        for point in points {
            let point = point?;
            let point = point.lock();
            if point.is_null() {
                continue;
            }

            let high = point.primary();
            let low = point.quinary();
            let secondary = point.secondary();
            let tertiary = point.tertiary();

            bounds.primary.append_value(high);
            bounds.primary.append_value(low);
            bounds.secondary.append_value(secondary);
            bounds.tertiary.append_value(tertiary);

            let y_min = primary_limits.min.unwrap_or(f64::MIN);
            let y_max = primary_limits.max.unwrap_or(f64::MAX);
            if high >= y_min && low <= y_max && secondary_limits.contains(secondary) {
                bounds.visible_primary.append_value(high);
                bounds.visible_primary.append_value(low);
                bounds.visible_secondary.append_value(secondary);
                bounds.visible_tertiary.append_value(tertiary);
            }

            if let Some((previous_high, previous_secondary)) = previous {
                bounds.secondary.track_delta((secondary - previous_secondary).abs());
                bounds.primary.track_delta((high - previous_high).abs());
            }
            previous = Some((high, secondary));
        }

        Ok(self.finish_bounds(bounds))
    }

    /// Accumulates the bounds of pie slices. Every point goes through
    /// `stacker`; the tertiary dimension carries the largest pushout.
    pub fn pie_bounds(
        &mut self,
        points: impl Iterator<Item = Result<SharedPoint>>,
        stacker: Option<&mut dyn Stacker>,
        pushout: f64,
        hover_pushout: f64,
    ) -> Result<SeriesBounds> {
        profile_function!();
        let stacker = stacker.ok_or(ChartError::MissingStacker {
            series: self.series,
        })?;
        let mut bounds = DimensionalBounds::empty();
        let pushout = pushout.max(hover_pushout);

        for point in points {
            let point = point?;
            let point = point.lock();
            stacker.stack_point(&point);
            bounds.primary.append_value(point.primary());
            bounds.secondary.append_value(point.secondary());
            bounds.tertiary.append_value(pushout);
        }

        if bounds.primary.is_empty() {
            bounds.primary.append_value(0.0);
            bounds.secondary.append_value(0.0);
            bounds.tertiary.append_value(0.0);
        }

        Ok(SeriesBounds::new(bounds, false))
    }

    fn finish_bounds(&mut self, bounds: DimensionalBounds) -> SeriesBounds {
        if bounds.primary.is_empty() {
            debug!(series = %self.series, "no points, keeping previous bounds");
            return SeriesBounds::new(self.previous_known_bounds, true);
        }
        self.previous_known_bounds = bounds;
        SeriesBounds::new(bounds, false)
    }

    /// Detaches every transition from the visuals of the series on `canvas`
    /// and forgets its points.
    ///
    /// The detached visuals resolve at once and are collected by the next
    /// draw, so the next measure recreates every point from scratch.
    pub fn restart_visuals(&self, canvas: &mut MotionCanvas) -> Result<()> {
        let (identity, scene) = canvas.split_mut();
        let Some(map) = identity.get_mut(self.series) else {
            return Ok(());
        };

        for point in map.points() {
            let mut point = point.lock();
            let handles = [point.context.visual.take(), point.context.label.take()];
            for handle in handles.into_iter().flatten() {
                if let Some(visual) = scene.visual_mut(handle) {
                    let motion = visual.motion_mut();
                    motion.remove_transition(None)?;
                    motion.set_remove_on_completed(true);
                }
            }
        }
        map.clear();
        Ok(())
    }
}

/// Lazy fetch over the values of a series; see [`DataFactory::fetch`].
pub struct Fetch<'a, M: ChartModel> {
    values: Enumerate<slice::Iter<'a, M>>,
    mapping: Option<&'a Mapping<M>>,
    map: &'a mut IdentityMap,
    strategy: PointIdentityStrategy,
    series: SeriesId,
    canvas: CanvasId,
    failed: bool,
}

impl<M: ChartModel> Iterator for Fetch<'_, M> {
    type Item = Result<SharedPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (index, model) = self.values.next()?;

        let Some(key) = self.strategy.resolve(model, index) else {
            self.failed = true;
            return Some(Err(ChartError::NullReference {
                series: self.series,
                index,
            }));
        };

        let (series, canvas) = (self.series, self.canvas);
        let point = self
            .map
            .get_or_insert_with(key, || {
                trace!(%series, ?key, "new chart point");
                Arc::new(Mutex::new(ChartPoint::new(key, canvas, series)))
            })
            .clone();

        {
            let mut point = point.lock();
            point.context.index = index;
            match point
                .context
                .data_source
                .as_deref_mut()
                .and_then(|source| source.downcast_mut::<M>())
            {
                Some(source) => source.clone_from(model),
                None => point.context.data_source = Some(Box::new(model.clone())),
            }
            point.coordinate = match self.mapping {
                Some(mapping) => mapping(model, index),
                None => model.coordinate(index),
            };
        }

        Some(Ok(point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, self.values.size_hint().1)
        }
    }
}

impl<M: ChartModel> FusedIterator for Fetch<'_, M> {}
