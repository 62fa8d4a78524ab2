//! Measure and draw passes of a chart under a stepped clock.

use std::time::Duration;

use livechart::prelude::*;
use livechart::{ChartError, KeyHandle, LabelGeometry, Margin, RoundedRectangleGeometry, SizedGeometry};
use livechart_core::logging;
use livechart_test_utils::MockDrawingSurface;

fn chart(settings: ChartSettings) -> CartesianChart {
    logging::init_for_tests();
    let mut chart = CartesianChart::with_canvas(settings, MotionCanvas::with_clock(FrameClock::manual()));
    chart.resize(Size::new(400.0, 300.0));
    chart
}

fn advance(chart: &mut CartesianChart, millis: u64) {
    chart
        .canvas_mut()
        .scene_mut()
        .clock_mut()
        .advance(Duration::from_millis(millis));
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn close(actual: (f64, f64), expected: (f64, f64)) -> bool {
    (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9
}

fn bar_rect(chart: &CartesianChart, series: SeriesId, index: usize) -> Rect {
    let map = chart.canvas().identity().get(series).unwrap();
    let point = map.get(&KeyHandle::Position(index)).unwrap().lock();
    let handle = point.context.visual.unwrap();
    let scene = chart.canvas().scene();
    scene
        .get::<RoundedRectangleGeometry>(handle)
        .unwrap()
        .rect_at(scene.now())
        .unwrap()
}

#[test]
fn test_grouped_columns_share_the_category() {
    let mut chart = chart(ChartSettings::default().without_animations());
    chart.set_x_axes(vec![Axis::x().with_limits(Some(0.0), Some(10.0))]);
    chart.add_series(ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED));
    chart.add_series(ColumnSeries::new(vec![3.0, 4.0]).with_fill(Color::BLUE));

    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();

    let mut rects = surface.rects();
    assert_eq!(rects.len(), 4);
    rects.sort_by(|a, b| a.x.total_cmp(&b.x));
    let xs: Vec<f32> = rects.iter().map(|rect| rect.x).collect();
    for (x, expected) in xs.iter().zip([-15.0, 0.0, 25.0, 40.0]) {
        assert!(approx(*x, expected), "bar at {x}, expected {expected}");
    }
    assert!(rects.iter().all(|rect| approx(rect.width, 15.0)));
}

#[test]
fn test_ignored_bar_position_takes_whole_category() {
    let mut chart = chart(ChartSettings::default().without_animations());
    chart.set_x_axes(vec![Axis::x().with_limits(Some(0.0), Some(10.0))]);
    let wide = chart.add_series(
        ColumnSeries::new(vec![1.0])
            .with_fill(Color::RED)
            .with_ignores_bar_position(true),
    );
    chart.add_series(ColumnSeries::new(vec![2.0]).with_fill(Color::BLUE));

    chart.update(&MockDrawingSurface::new()).unwrap();
    let rect = bar_rect(&chart, wide, 0);
    assert!(approx(rect.width, 30.0));
    assert!(approx(rect.x, -15.0));
}

#[test]
fn test_axes_cover_every_series() {
    let mut chart = chart(ChartSettings::default().without_animations());
    chart.add_series(ColumnSeries::new(vec![1.0, 5.0]));
    chart.add_series(ColumnSeries::new(vec![-2.0, 3.0, 4.0]));

    chart.update(&MockDrawingSurface::new()).unwrap();
    // Each series pads by half its own tick: 0.5 on [1, 5], 1.0 on [-2, 4]
    // for values, 0.1 and 0.2 for categories.
    let y = &chart.y_axes()[0];
    assert!(close((y.data_bounds().min, y.data_bounds().max), (-2.5, 5.25)));
    let x = &chart.x_axes()[0];
    assert!(close(x.range(), (-0.6, 2.6)), "x range {:?}", x.range());
}

#[test]
fn test_rows_put_categories_on_the_y_axis() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(RowSeries::new(vec![2.0, 6.0]).with_fill(Color::GREEN));

    chart.update(&MockDrawingSurface::new()).unwrap();
    // Half unit per category, then half a tick of padding on both axes.
    assert!(close(chart.y_axes()[0].range(), (-0.6, 1.6)));
    assert!(close(chart.x_axes()[0].range(), (1.75, 6.25)));

    let short = bar_rect(&chart, id, 0);
    let long = bar_rect(&chart, id, 1);
    assert!(long.width > short.width);
    assert!(long.y < short.y, "later categories sit higher");
}

#[test]
fn test_settled_chart_is_not_animating() {
    let mut chart = chart(ChartSettings::default());
    chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();

    let stats = chart.update(&surface).unwrap();
    assert_eq!(stats.animating, 3);

    advance(&mut chart, 900);
    chart.draw(&surface);

    let stats = chart.update(&surface).unwrap();
    assert_eq!(stats.animating, 0);
    assert_eq!(stats.painted, 3);
}

#[test]
fn test_retarget_continues_from_current_state() {
    let mut chart = chart(ChartSettings::default());
    chart.set_y_axes(vec![Axis::y().with_limits(Some(0.0), Some(10.0))]);
    let id = chart.add_series(ColumnSeries::new(vec![2.0, 8.0]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();

    advance(&mut chart, 300);
    chart.draw(&surface);
    let before = bar_rect(&chart, id, 1);

    chart
        .series_mut::<ColumnSeries<f64>>(id)
        .unwrap()
        .set_values(vec![2.0, 4.0]);
    chart.update(&surface).unwrap();
    let after = bar_rect(&chart, id, 1);
    assert!(approx(before.height, after.height));

    advance(&mut chart, 900);
    chart.draw(&surface);
    assert!(approx(bar_rect(&chart, id, 1).height, 120.0));
}

#[test]
fn test_removed_point_shrinks_then_is_collected() {
    let mut chart = chart(ChartSettings::default());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    advance(&mut chart, 900);
    chart.draw(&surface);

    chart
        .series_mut::<ColumnSeries<f64>>(id)
        .unwrap()
        .set_values(vec![1.0, 2.0]);
    let stats = chart.update(&surface).unwrap();

    let map = chart.canvas().identity().get(id).unwrap();
    assert_eq!(map.len(), 2);
    assert!(!map.contains(&KeyHandle::Position(2)));
    assert_eq!(stats.collected, 0);
    assert_eq!(chart.canvas().scene().visual_count(), 3);

    advance(&mut chart, 900);
    let stats = chart.draw(&surface);
    assert_eq!(stats.collected, 1);
    assert_eq!(chart.canvas().scene().visual_count(), 2);
}

#[test]
fn test_removed_point_vanishes_while_zooming() {
    let mut chart = chart(ChartSettings::default());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();

    chart.set_zooming_or_panning(true);
    chart
        .series_mut::<ColumnSeries<f64>>(id)
        .unwrap()
        .set_values(vec![1.0]);
    let stats = chart.update(&surface).unwrap();
    assert_eq!(stats.collected, 2);
    assert_eq!(chart.canvas().scene().visual_count(), 1);
}

#[test]
fn test_null_values_draw_nothing() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(
        ColumnSeries::new(vec![Some(1.0), None, Some(3.0)]).with_fill(Color::RED),
    );
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();

    assert_eq!(surface.count_rects(), 2);
    let map = chart.canvas().identity().get(id).unwrap();
    let null = map.get(&KeyHandle::Position(1)).unwrap().lock();
    assert!(null.is_null());
    assert!(null.context.visual.is_none());
    assert!(null.context.hover_area.is_none());
}

#[test]
fn test_value_becoming_null_keeps_its_point() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(ColumnSeries::new(vec![Some(1.0), Some(2.0)]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    let before = chart
        .canvas()
        .identity()
        .get(id)
        .unwrap()
        .get(&KeyHandle::Position(1))
        .cloned()
        .unwrap();

    chart
        .series_mut::<ColumnSeries<Option<f64>>>(id)
        .unwrap()
        .set_values(vec![Some(1.0), None]);
    chart.update(&surface).unwrap();

    let after = chart
        .canvas()
        .identity()
        .get(id)
        .unwrap()
        .get(&KeyHandle::Position(1))
        .cloned()
        .unwrap();
    assert!(std::sync::Arc::ptr_eq(&before, &after));
    assert!(after.lock().context.visual.is_none());
    assert_eq!(chart.canvas().scene().visual_count(), 1);
}

#[test]
fn test_hit_testing_prefers_the_category_axis() {
    let mut chart = chart(ChartSettings::default().without_animations());
    chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]).with_fill(Color::RED));
    chart.update(&MockDrawingSurface::new()).unwrap();

    let hits = chart.find_hit_points(Point::new(333.0, 5.0));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].lock().index(), 2);
    assert!(chart.find_hit_points(Point::new(5.0, 5.0)).is_empty());
}

#[test]
fn test_data_labels_follow_values() {
    let mut chart = chart(ChartSettings::default().without_animations());
    chart.add_series(
        ColumnSeries::new(vec![1.0, 2.5])
            .with_fill(Color::RED)
            .with_data_labels(Color::BLACK)
            .with_data_labels_formatter(|point| format!("{:.1}", point.primary())),
    );
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();

    let mut texts = surface.texts();
    texts.sort();
    assert_eq!(texts, vec!["1.0".to_string(), "2.5".to_string()]);
}

#[test]
fn test_hidden_series_is_skipped() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED));
    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().set_visible(false);

    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    assert_eq!(surface.count_rects(), 0);
    assert!(chart.canvas().identity().get(id).is_none());
}

#[test]
fn test_series_hidden_after_a_draw_stops_painting() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(
        ColumnSeries::new(vec![1.0, 2.0])
            .with_fill(Color::RED)
            .with_data_labels(Color::BLACK),
    );
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    assert_eq!(surface.count_rects(), 2);

    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().set_visible(false);
    surface.clear_calls();
    let stats = chart.update(&surface).unwrap();
    assert_eq!(surface.count_rects(), 0);
    assert_eq!(surface.count_texts(), 0);
    assert_eq!(stats.collected, 4);
    assert_eq!(chart.canvas().scene().visual_count(), 0);
    assert!(chart.canvas().identity().get(id).unwrap().is_empty());

    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().set_visible(true);
    surface.clear_calls();
    chart.update(&surface).unwrap();
    assert_eq!(surface.count_rects(), 2);
}

#[test]
fn test_hidden_series_shrinks_out() {
    let mut chart = chart(ChartSettings::default());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    advance(&mut chart, 900);
    chart.draw(&surface);

    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().set_visible(false);
    let stats = chart.update(&surface).unwrap();
    assert_eq!(stats.animating, 2);
    assert_eq!(chart.canvas().scene().visual_count(), 2);

    advance(&mut chart, 900);
    let stats = chart.draw(&surface);
    assert_eq!(stats.collected, 2);
    assert_eq!(stats.painted, 0);
    assert_eq!(chart.canvas().scene().visual_count(), 0);
}

#[test]
fn test_unpainted_series_leaves_no_visuals() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0, 3.0]));
    let surface = MockDrawingSurface::new();
    chart.update(&surface).unwrap();
    assert_eq!(chart.canvas().scene().visual_count(), 3);
    assert_eq!(surface.count_rects(), 0);

    assert!(chart.remove_series(id));
    assert_eq!(chart.canvas().scene().visual_count(), 0);
    let stats = chart.draw(&surface);
    assert_eq!(stats.animating, 0);
    assert_eq!(stats.collected, 0);
}

#[test]
fn test_null_point_with_foreign_visual_is_an_error() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(ColumnSeries::new(vec![Some(1.0)]).with_fill(Color::RED));
    chart.update(&MockDrawingSurface::new()).unwrap();

    let label = chart
        .canvas_mut()
        .scene_mut()
        .add_visual(LabelGeometry::new(Point::ZERO, 10.0));
    {
        let map = chart.canvas().identity().get(id).unwrap();
        let mut point = map.get(&KeyHandle::Position(0)).unwrap().lock();
        point.context.visual = Some(label);
    }

    chart
        .series_mut::<ColumnSeries<Option<f64>>>(id)
        .unwrap()
        .set_values(vec![None]);
    let result = chart.update(&MockDrawingSurface::new());
    assert!(matches!(result, Err(ChartError::VisualTypeMismatch { .. })));
}

#[test]
fn test_needs_measure_tracks_edits() {
    let mut chart = chart(ChartSettings::default());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED));
    assert!(chart.needs_measure());

    chart.update(&MockDrawingSurface::new()).unwrap();
    assert!(!chart.needs_measure());

    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().values_mut().push(3.0);
    assert!(chart.needs_measure());
    chart.update(&MockDrawingSurface::new()).unwrap();

    chart
        .series_mut::<ColumnSeries<f64>>(id)
        .unwrap()
        .set_fill(Some(Color::BLUE));
    assert!(chart.needs_measure());

    chart.series_mut::<ColumnSeries<f64>>(id).unwrap().set_visible(false);
    chart.update(&MockDrawingSurface::new()).unwrap();
    assert!(!chart.needs_measure());
}

#[test]
fn test_remove_series_clears_canvas() {
    let mut chart = chart(ChartSettings::default().without_animations());
    let id = chart.add_series(ColumnSeries::new(vec![1.0, 2.0]).with_fill(Color::RED));
    chart.update(&MockDrawingSurface::new()).unwrap();

    assert!(chart.remove_series(id));
    assert!(!chart.remove_series(id));
    assert_eq!(chart.series_count(), 0);
    assert_eq!(chart.canvas().scene().visual_count(), 0);
    assert_eq!(chart.canvas().scene().paint_task_count(), 0);
    assert!(chart.canvas().identity().get(id).is_none());
}

#[test]
fn test_unknown_axis_is_an_error() {
    let mut chart = chart(ChartSettings::default());
    chart.add_series(ColumnSeries::new(vec![1.0]).with_axes(0, 3));
    assert!(chart.update(&MockDrawingSurface::new()).is_err());
}

#[test]
fn test_draw_margin_offsets_bars() {
    let mut chart = chart(
        ChartSettings::default()
            .without_animations()
            .with_draw_margin(Margin::uniform(20.0)),
    );
    chart.set_x_axes(vec![Axis::x().with_limits(Some(0.0), Some(9.0))]);
    let id = chart.add_series(ColumnSeries::new(vec![1.0]).with_fill(Color::RED));
    chart.update(&MockDrawingSurface::new()).unwrap();

    // 360 px over 9 units: 40 px categories, 30 px bars
    let rect = bar_rect(&chart, id, 0);
    assert!(approx(rect.x, 5.0));
    assert!(approx(rect.width, 30.0));
}
