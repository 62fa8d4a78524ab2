//! Headless bar chart.
//!
//! Drives a column and a row series through a few frames of a stepped
//! clock, editing the data between frames, and logs what each frame drew.
//!
//! Run with: cargo run -p livechart --features mock --example headless_bars

use std::time::Duration;

use livechart::prelude::*;
use livechart_core::logging;
use livechart_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use livechart_test_utils::MockDrawingSurface;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> livechart::Result<()> {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let mut chart = CartesianChart::with_canvas(
        ChartSettings::default().with_animations_speed(Duration::from_millis(300)),
        MotionCanvas::with_clock(FrameClock::manual()),
    );
    chart.resize(Size::new(640.0, 480.0));

    let sales = chart.add_series(
        ColumnSeries::new(vec![4.0, 6.0, 3.0, 8.0])
            .with_fill(Color::BLUE)
            .with_corner_radius(4.0, 4.0)
            .with_data_labels(Color::BLACK),
    );
    let costs = chart.add_series(
        ColumnSeries::new(vec![Some(2.0), None, Some(1.5), Some(5.0)])
            .with_fill(Color::RED)
            .with_stroke(Color::BLACK, 1.0),
    );

    let surface = MockDrawingSurface::new();
    for frame in 0..60 {
        new_frame();
        match frame {
            20 => {
                if let Some(series) = chart.series_mut::<ColumnSeries<f64>>(sales) {
                    series.values_mut().push(5.0);
                }
            }
            40 => {
                if let Some(series) = chart.series_mut::<ColumnSeries<Option<f64>>>(costs) {
                    series.set_values(vec![Some(2.5), Some(1.0)]);
                }
            }
            _ => {}
        }

        chart
            .canvas_mut()
            .scene_mut()
            .clock_mut()
            .advance(FRAME);
        surface.clear_calls();
        let stats = chart.update(&surface)?;
        if frame % 10 == 0 || stats.collected > 0 {
            tracing::info!(
                frame,
                painted = stats.painted,
                animating = stats.animating,
                collected = stats.collected,
                rects = surface.count_rects(),
                labels = surface.count_texts(),
                "frame"
            );
        }
    }

    let hits = chart.find_hit_points(Point::new(100.0, 400.0));
    for point in &hits {
        let point = point.lock();
        tracing::info!(index = point.index(), value = point.primary(), "hit");
    }

    chart.dispose();
    Ok(())
}
