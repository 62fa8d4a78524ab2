//! Chart-wide configuration.

use std::time::Duration;

use livechart_core::{Point, Rect, Size};
use livechart_motion::{EasingFunction, Transition};

use crate::TooltipFindingStrategy;

/// Space between the control edges and the draw margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margin {
    /// Create margins with uniform padding.
    pub const fn uniform(padding: f32) -> Self {
        Self {
            left: padding,
            top: padding,
            right: padding,
            bottom: padding,
        }
    }

    /// The area left inside a control of `size`; never negative.
    pub fn apply(&self, size: Size) -> Rect {
        Rect::from_location_size(
            Point::new(self.left, self.top),
            Size::new(
                (size.width - self.left - self.right).max(0.0),
                (size.height - self.top - self.bottom).max(0.0),
            ),
        )
    }
}

/// Settings shared by every series of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    /// Duration of point transitions; zero disables animations.
    pub animations_speed: Duration,
    pub easing_function: EasingFunction,
    pub tooltip_finding_strategy: TooltipFindingStrategy,
    pub draw_margin: Margin,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            animations_speed: Transition::DEFAULT_DURATION,
            easing_function: EasingFunction::CubicOut,
            tooltip_finding_strategy: TooltipFindingStrategy::Automatic,
            draw_margin: Margin::default(),
        }
    }
}

impl ChartSettings {
    pub fn with_animations_speed(mut self, speed: Duration) -> Self {
        self.animations_speed = speed;
        self
    }

    pub fn with_easing_function(mut self, easing: EasingFunction) -> Self {
        self.easing_function = easing;
        self
    }

    pub fn with_tooltip_finding_strategy(mut self, strategy: TooltipFindingStrategy) -> Self {
        self.tooltip_finding_strategy = strategy;
        self
    }

    pub fn with_draw_margin(mut self, margin: Margin) -> Self {
        self.draw_margin = margin;
        self
    }

    /// Points snap to their targets.
    pub fn without_animations(self) -> Self {
        self.with_animations_speed(Duration::ZERO)
    }

    /// The transition series fall back to.
    pub fn transition(&self) -> Transition {
        Transition::new(self.animations_speed, self.easing_function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChartSettings::default();
        assert_eq!(settings.animations_speed, Duration::from_millis(800));
        assert_eq!(settings.transition().easing, EasingFunction::CubicOut);
        assert!(ChartSettings::default().without_animations().transition().is_instant());
    }

    #[test]
    fn test_margin_never_negative() {
        let rect = Margin::uniform(30.0).apply(Size::new(50.0, 100.0));
        assert_eq!(rect, Rect::new(30.0, 30.0, 0.0, 40.0));
    }
}
