//! Point identity across fetches, models and canvases.

use std::sync::Arc;

use livechart::prelude::*;
use livechart::{KeyHandle, MeasureContext, Result, SeriesContext, SharedPoint};
use livechart_test_utils::MockDrawingSurface;

#[derive(Clone)]
struct Sale {
    total: f64,
}

impl ChartModel for Sale {
    fn coordinate(&self, index: usize) -> Coordinate {
        Coordinate::xy(index as f64, self.total)
    }
}

fn fetch_all(series: &dyn ChartSeries, canvas: &mut MotionCanvas) -> Vec<SharedPoint> {
    livechart_core::logging::init_for_tests();
    series
        .fetch(canvas)
        .collect::<Result<Vec<_>>>()
        .unwrap()
}

fn measure(series: &mut dyn ChartSeries, canvas: &mut MotionCanvas) {
    let settings = ChartSettings::default().without_animations();
    let x_axes = vec![Axis::x().with_limits(Some(-0.5), Some(2.5))];
    let y_axes = vec![Axis::y().with_limits(Some(0.0), Some(10.0))];
    let series_context = SeriesContext::new(&[]);
    let surface = MockDrawingSurface::new();
    let mut context = MeasureContext {
        canvas,
        x_axes: &x_axes,
        y_axes: &y_axes,
        draw_margin: Rect::new(0.0, 0.0, 400.0, 300.0),
        series_context: &series_context,
        settings: &settings,
        is_zooming_or_panning: false,
        surface: &surface,
    };
    series.measure(&mut context).unwrap();
}

#[test]
fn test_positional_points_survive_edits() {
    let mut canvas = MotionCanvas::new();
    let mut series = ColumnSeries::new(vec![1.0, 2.0, 3.0]);
    let first = fetch_all(&series, &mut canvas);

    series.values_mut()[1] = 7.0;
    let second = fetch_all(&series, &mut canvas);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert_eq!(second[1].lock().primary(), 7.0);
    assert_eq!(canvas.identity().get(series.id()).unwrap().len(), 3);
}

#[test]
fn test_reference_points_follow_their_models() {
    let mut canvas = MotionCanvas::new();
    let low = Arc::new(Sale { total: 1.0 });
    let high = Arc::new(Sale { total: 9.0 });
    let mut series = ColumnSeries::new(vec![Arc::clone(&low), Arc::clone(&high)]);

    let before = fetch_all(&series, &mut canvas);
    series.set_values(vec![Arc::clone(&high), Arc::clone(&low)]);
    let after = fetch_all(&series, &mut canvas);

    assert!(Arc::ptr_eq(&before[0], &after[1]));
    assert!(Arc::ptr_eq(&before[1], &after[0]));

    let point = after[1].lock();
    assert_eq!(point.index(), 1);
    assert_eq!(point.secondary(), 1.0);
    assert_eq!(point.primary(), 1.0);
    assert!(matches!(point.context.key, KeyHandle::Reference(_)));
    assert_eq!(point.data_source::<Arc<Sale>>().map(|sale| sale.total), Some(1.0));
}

#[test]
fn test_canvases_do_not_share_points() {
    let mut left = MotionCanvas::new();
    let mut right = MotionCanvas::new();
    let mut series = ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED);

    let on_left = fetch_all(&series, &mut left);
    let on_right = fetch_all(&series, &mut right);
    for (a, b) in on_left.iter().zip(&on_right) {
        assert!(!Arc::ptr_eq(a, b));
        assert_ne!(a.lock().context.canvas, b.lock().context.canvas);
    }

    series.dispose(&mut left);
    assert!(left.identity().get(series.id()).is_none());
    assert_eq!(right.identity().get(series.id()).unwrap().len(), 2);
}

#[test]
fn test_measure_keeps_visuals_per_canvas() {
    let mut left = MotionCanvas::with_clock(FrameClock::manual());
    let mut right = MotionCanvas::with_clock(FrameClock::manual());
    let mut series = ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::RED);

    measure(&mut series, &mut left);
    measure(&mut series, &mut right);
    assert_eq!(left.scene().visual_count(), 3);
    assert_eq!(right.scene().visual_count(), 3);
    assert_eq!(series.ever_fetched(left.id()).count(), 3);
    assert_eq!(series.ever_fetched(right.id()).count(), 3);

    series.set_values(vec![1.0]);
    measure(&mut series, &mut left);
    assert_eq!(series.ever_fetched(left.id()).count(), 1);
    assert_eq!(series.ever_fetched(right.id()).count(), 3);

    series.dispose(&mut right);
    assert_eq!(right.scene().visual_count(), 0);
    assert_eq!(series.ever_fetched(right.id()).count(), 0);
    assert_eq!(series.ever_fetched(left.id()).count(), 1);
}

#[test]
fn test_restart_visuals_recreates_points() {
    let mut canvas = MotionCanvas::with_clock(FrameClock::manual());
    let mut series = ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED);
    measure(&mut series, &mut canvas);
    let before = fetch_all(&series, &mut canvas);

    series.restart_visuals(&mut canvas).unwrap();
    assert!(before.iter().all(|point| point.lock().context.visual.is_none()));
    assert_eq!(series.ever_fetched(canvas.id()).count(), 0);

    let stats = canvas.draw(&MockDrawingSurface::new());
    assert_eq!(stats.collected, 2);
    assert_eq!(canvas.scene().visual_count(), 0);

    measure(&mut series, &mut canvas);
    let after = fetch_all(&series, &mut canvas);
    assert!(!Arc::ptr_eq(&before[0], &after[0]));
    assert_eq!(canvas.scene().visual_count(), 2);
}

#[test]
fn test_refetch_reuses_the_model_copy() {
    let mut canvas = MotionCanvas::new();
    let mut series = ColumnSeries::new(vec![1.0, 2.0]);
    let points = fetch_all(&series, &mut canvas);
    let first: *const f64 = points[1].lock().data_source::<f64>().unwrap();

    series.values_mut()[1] = 5.0;
    let points = fetch_all(&series, &mut canvas);
    let point = points[1].lock();
    assert!(std::ptr::eq(first, point.data_source::<f64>().unwrap()));
    assert_eq!(point.data_source::<f64>(), Some(&5.0));
}

#[test]
fn test_dropped_null_point_is_disposed() {
    let mut canvas = MotionCanvas::with_clock(FrameClock::manual());
    let mut series = ColumnSeries::new(vec![Some(1.0), None]).with_fill(Color::RED);
    measure(&mut series, &mut canvas);
    assert_eq!(series.ever_fetched(canvas.id()).count(), 2);
    assert_eq!(canvas.scene().visual_count(), 1);

    series.set_values(vec![Some(1.0)]);
    measure(&mut series, &mut canvas);
    assert_eq!(canvas.identity().get(series.id()).unwrap().len(), 1);
    assert_eq!(series.ever_fetched(canvas.id()).count(), 1);
}

#[test]
fn test_churned_null_models_are_disposed() {
    let mut canvas = MotionCanvas::with_clock(FrameClock::manual());
    let mut series = ColumnSeries::new(vec![Arc::new(None::<f64>)]).with_fill(Color::RED);

    for _ in 0..50 {
        series.set_values(vec![Arc::new(None)]);
        measure(&mut series, &mut canvas);
    }
    assert_eq!(canvas.identity().get(series.id()).unwrap().len(), 1);
    assert_eq!(series.ever_fetched(canvas.id()).count(), 1);
    assert_eq!(canvas.scene().visual_count(), 0);
}

#[test]
fn test_steady_measure_keeps_every_point() {
    let mut canvas = MotionCanvas::with_clock(FrameClock::manual());
    let values: Vec<f64> = (0..2000).map(|i| (i % 10) as f64).collect();
    let mut series = ColumnSeries::new(values).with_fill(Color::RED);

    for _ in 0..3 {
        measure(&mut series, &mut canvas);
    }
    assert_eq!(series.ever_fetched(canvas.id()).count(), 2000);
    assert_eq!(canvas.scene().visual_count(), 2000);

    series.values_mut().truncate(1500);
    measure(&mut series, &mut canvas);
    assert_eq!(series.ever_fetched(canvas.id()).count(), 1500);
    assert_eq!(canvas.identity().get(series.id()).unwrap().len(), 1500);
    assert_eq!(canvas.draw(&MockDrawingSurface::new()).collected, 500);
}

#[test]
fn test_flat_series_gets_value_padding() {
    let mut canvas = MotionCanvas::new();
    let mut series = ColumnSeries::new(vec![5.0, 5.0, 5.0]);
    let bounds = series
        .bounds(&mut canvas, &Axis::x(), &Axis::y(), Size::new(400.0, 300.0))
        .unwrap();

    assert!(!bounds.is_previous);
    let primary = bounds.bounds.primary;
    assert_eq!((primary.min, primary.max), (5.0, 5.0));
    assert!((primary.padding_max - 0.25).abs() < 1e-9);
    assert!((primary.padding_min - 0.25).abs() < 1e-9);

    let secondary = bounds.bounds.secondary;
    assert_eq!((secondary.min, secondary.max), (-0.5, 2.5));
}

#[test]
fn test_emptied_series_reports_previous_bounds() {
    let mut canvas = MotionCanvas::new();
    let mut series = ColumnSeries::new(vec![2.0, 4.0]);
    let size = Size::new(400.0, 300.0);
    series.bounds(&mut canvas, &Axis::x(), &Axis::y(), size).unwrap();

    series.set_values(Vec::new());
    let bounds = series.bounds(&mut canvas, &Axis::x(), &Axis::y(), size).unwrap();
    assert!(bounds.is_previous);
    assert_eq!(bounds.bounds.primary.max, 4.0);
}
