use std::time::Duration;

use crate::{Interpolate, Transition};

/// One animated value of a visual.
///
/// A property remembers the value it animates from, the value it animates
/// to and when the movement began. The current value is computed on demand
/// from the canvas time, so reading it never mutates state.
///
/// Setting a target equal to the current target is a no-op. Setting a
/// different target while a movement is in flight starts the new movement
/// from the value currently on screen, so retargeting never jumps.
#[derive(Debug, Clone)]
pub struct MotionProperty<T: Interpolate> {
    name: &'static str,
    from: T,
    to: T,
    last: T,
    start_time: Duration,
    /// Transition attached to the property, used for future movements.
    transition: Option<Transition>,
    /// Transition driving the movement currently in flight.
    active: Option<Transition>,
    completed: bool,
}

impl<T: Interpolate> MotionProperty<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            from: initial.clone(),
            to: initial.clone(),
            last: initial,
            start_time: Duration::ZERO,
            transition: None,
            active: None,
            completed: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The value the current movement started from.
    #[inline]
    pub fn previous_value(&self) -> &T {
        &self.from
    }

    #[inline]
    pub fn target(&self) -> &T {
        &self.to
    }

    /// The value computed at the most recent [`advance`](Self::advance).
    #[inline]
    pub fn last_value(&self) -> &T {
        &self.last
    }

    #[inline]
    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    #[inline]
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Attaches (or with `None`, detaches) the transition used for future
    /// movements. Detaching also snaps any movement in flight to its target.
    pub fn set_transition(&mut self, transition: Option<Transition>) {
        self.transition = transition;
        if transition.is_none() {
            self.active = None;
        }
    }

    /// Moves toward `value` using the attached transition.
    ///
    /// Returns `false` when `value` already is the target.
    pub fn set_target(&mut self, value: T, now: Duration) -> bool {
        self.set_target_with(value, now, None)
    }

    /// Moves toward `value`, overriding the attached transition for this
    /// movement only.
    pub fn set_target_with(
        &mut self,
        value: T,
        now: Duration,
        transition: Option<Transition>,
    ) -> bool {
        if value == self.to {
            return false;
        }

        self.from = self.value_at(now);
        self.to = value;
        self.start_time = now;
        self.active = transition.or(self.transition);
        self.completed = false;
        true
    }

    /// The value at `now` without touching any state.
    pub fn value_at(&self, now: Duration) -> T {
        if self.completed {
            return self.to.clone();
        }

        match self.active {
            Some(transition) if !transition.is_instant() => {
                let elapsed = now.saturating_sub(self.start_time);
                if transition.progress(elapsed) >= 1.0 {
                    self.to.clone()
                } else {
                    T::interpolate(&self.from, &self.to, transition.eased_progress(elapsed))
                }
            }
            _ => self.to.clone(),
        }
    }

    /// Computes the value at `now`, records it as the last value and marks
    /// the property completed once the movement has run its course.
    pub fn advance(&mut self, now: Duration) -> &T {
        self.last = self.value_at(now);
        if !self.completed {
            self.completed = match self.active {
                Some(transition) if !transition.is_instant() => {
                    transition.progress(now.saturating_sub(self.start_time)) >= 1.0
                }
                _ => true,
            };
        }
        &self.last
    }

    /// Jumps straight to the target.
    pub fn complete(&mut self) {
        self.from = self.to.clone();
        self.last = self.to.clone();
        self.completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EasingFunction;

    fn linear(ms: u64) -> Transition {
        Transition::new(Duration::from_millis(ms), EasingFunction::Linear)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_same_target_is_noop() {
        let mut prop = MotionProperty::new("X", 5.0f32);
        prop.set_transition(Some(linear(100)));
        assert!(!prop.set_target(5.0, ms(10)));
        assert!(prop.is_completed());
        assert_eq!(prop.start_time(), Duration::ZERO);
    }

    #[test]
    fn test_interpolates_over_duration() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(100)));
        assert!(prop.set_target(10.0, ms(0)));
        assert!(!prop.is_completed());

        assert!((prop.value_at(ms(50)) - 5.0).abs() < 1e-4);
        assert_eq!(prop.value_at(ms(100)), 10.0);
        assert_eq!(prop.value_at(ms(500)), 10.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(100)));
        prop.set_target(10.0, ms(0));

        let on_screen = prop.value_at(ms(50));
        prop.set_target(20.0, ms(50));

        assert_eq!(*prop.previous_value(), on_screen);
        assert_eq!(prop.value_at(ms(50)), on_screen);
        assert_eq!(prop.start_time(), ms(50));
    }

    #[test]
    fn test_no_transition_snaps() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_target(42.0, ms(0));
        assert_eq!(prop.value_at(ms(0)), 42.0);

        prop.advance(ms(0));
        assert!(prop.is_completed());
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(Transition::instant()));
        prop.set_target(1.0, ms(0));
        assert_eq!(*prop.advance(ms(0)), 1.0);
        assert!(prop.is_completed());
    }

    #[test]
    fn test_advance_completes_after_duration() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(100)));
        prop.set_target(1.0, ms(0));

        prop.advance(ms(60));
        assert!(!prop.is_completed());
        assert!((*prop.last_value() - 0.6).abs() < 1e-4);

        prop.advance(ms(100));
        assert!(prop.is_completed());
        assert_eq!(*prop.last_value(), 1.0);
    }

    #[test]
    fn test_override_applies_to_one_movement() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(1000)));

        prop.set_target_with(10.0, ms(0), Some(linear(100)));
        assert_eq!(prop.value_at(ms(100)), 10.0);

        prop.set_target(20.0, ms(100));
        assert!(prop.value_at(ms(200)) < 20.0);
    }

    #[test]
    fn test_complete_jumps_to_target() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(100)));
        prop.set_target(8.0, ms(0));

        prop.complete();
        assert!(prop.is_completed());
        assert_eq!(prop.value_at(ms(1)), 8.0);
        assert_eq!(*prop.previous_value(), 8.0);
    }

    #[test]
    fn test_detaching_transition_snaps_in_flight_movement() {
        let mut prop = MotionProperty::new("X", 0.0f32);
        prop.set_transition(Some(linear(100)));
        prop.set_target(8.0, ms(0));

        prop.set_transition(None);
        assert_eq!(prop.value_at(ms(10)), 8.0);
    }
}
