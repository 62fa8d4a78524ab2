use std::mem::discriminant;

/// Easing functions for transitions.
///
/// Every variant maps `0.0 -> 0.0` and `1.0 -> 1.0`; input is clamped to the
/// unit interval first. Overshooting curves (`BackOut`, `Elastic`) may leave
/// the interval in between.
///
/// Two `Custom` curves never compare equal, not even to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Quadratic ease in
    QuadIn,
    /// Quadratic ease out
    QuadOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out, the chart default
    #[default]
    CubicOut,
    /// Cubic ease in-out
    CubicInOut,
    /// Sine ease in
    SineIn,
    /// Sine ease out
    SineOut,
    /// Overshoots the target slightly before settling
    BackOut,
    /// Bounce effect
    Bounce,
    /// Elastic effect
    Elastic,
    /// User-supplied curve
    Custom(fn(f32) -> f32),
}

impl PartialEq for EasingFunction {
    fn eq(&self, other: &Self) -> bool {
        !matches!(self, Self::Custom(_)) && discriminant(self) == discriminant(other)
    }
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn | EasingFunction::QuadIn => t * t,
            EasingFunction::EaseOut | EasingFunction::QuadOut => t * (2.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingFunction::CubicIn => t * t * t,
            EasingFunction::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingFunction::CubicInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
            EasingFunction::SineIn => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            EasingFunction::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
            EasingFunction::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
            EasingFunction::Bounce => {
                if t < 1.0 / 2.75 {
                    7.5625 * t * t
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    7.5625 * t * t + 0.75
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    7.5625 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / 2.75;
                    7.5625 * t * t + 0.984375
                }
            }
            EasingFunction::Elastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let p = 0.3;
                    let s = p / 4.0;
                    let t = t - 1.0;
                    -(2.0f32.powf(10.0 * t) * ((t - s) * (2.0 * std::f32::consts::PI) / p).sin())
                }
            }
            EasingFunction::Custom(curve) => curve(t),
        }
    }
}
