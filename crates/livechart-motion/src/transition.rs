use std::time::Duration;

use crate::EasingFunction;

/// Duration and easing applied when a motion property moves to a new target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: EasingFunction,
}

impl Transition {
    /// Chart-wide default animation length.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(800);

    pub const fn new(duration: Duration, easing: EasingFunction) -> Self {
        Self { duration, easing }
    }

    /// A transition that resolves immediately.
    pub const fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            easing: EasingFunction::Linear,
        }
    }

    /// True when movement under this transition snaps straight to the target.
    #[inline]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Linear progress in `[0, 1]` after `elapsed` time.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.is_instant() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased progress after `elapsed` time.
    #[inline]
    pub fn eased_progress(&self, elapsed: Duration) -> f32 {
        self.easing.apply(self.progress(elapsed))
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, EasingFunction::default())
    }
}
