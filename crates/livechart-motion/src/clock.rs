use std::time::{Duration, Instant};

use livechart_core::profiling::profile_function;

/// Monotonic time source for a canvas.
///
/// Motion properties never read the wall clock themselves; they are resolved
/// against [`FrameClock::now`]. A clock can follow real time through
/// [`update`](Self::update) or be stepped by hand with
/// [`advance`](Self::advance), which keeps headless runs and tests
/// deterministic.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use livechart_motion::FrameClock;
///
/// let mut clock = FrameClock::manual();
/// clock.advance(Duration::from_millis(16));
/// assert_eq!(clock.now(), Duration::from_millis(16));
/// assert_eq!(clock.frame_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Canvas time, scaled
    now: Duration,
    /// Time advanced by the last frame, scaled
    delta: Duration,
    frame_count: u64,
    /// Multiplier for real time (1.0 = normal, 0.0 = paused)
    time_scale: f32,
    /// Longest step a single real-time update may take
    max_delta: Duration,
    /// `None` for manually stepped clocks
    last_frame_time: Option<Instant>,
}

impl FrameClock {
    /// A clock following the wall clock from now on.
    pub fn new() -> Self {
        Self {
            last_frame_time: Some(Instant::now()),
            ..Self::manual()
        }
    }

    /// A clock that only moves through [`advance`](Self::advance).
    pub fn manual() -> Self {
        Self {
            now: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            time_scale: 1.0,
            max_delta: Duration::from_millis(100),
            last_frame_time: None,
        }
    }

    /// Steps the clock by the real time elapsed since the previous update.
    ///
    /// A no-op on manual clocks.
    pub fn update(&mut self) {
        profile_function!();
        let Some(last) = self.last_frame_time else {
            return;
        };
        let now = Instant::now();
        let raw_delta = now.duration_since(last).min(self.max_delta);
        self.last_frame_time = Some(now);
        self.step(raw_delta.mul_f32(self.time_scale));
    }

    /// Steps the clock by `delta`, ignoring the time scale.
    pub fn advance(&mut self, delta: Duration) {
        self.step(delta);
    }

    fn step(&mut self, delta: Duration) {
        self.delta = delta;
        self.now += delta;
        self.frame_count += 1;
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        self.last_frame_time.is_none()
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Sets the time scale applied to real-time updates.
    ///
    /// - 1.0 = normal speed
    /// - 0.5 = half speed
    /// - 0.0 = paused
    #[inline]
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    #[inline]
    pub fn set_max_delta(&mut self, max_delta: Duration) {
        self.max_delta = max_delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
