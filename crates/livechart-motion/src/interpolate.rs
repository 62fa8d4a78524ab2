use std::fmt;

use livechart_core::math::{Vec2, lerp_f32, lerp_f64};
use livechart_core::{Color, Point, Size};

/// A value a [`MotionProperty`](crate::MotionProperty) can animate.
///
/// `t` is the eased progress; it may leave `[0, 1]` for overshooting curves.
pub trait Interpolate: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        lerp_f32(*from, *to, t)
    }
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        lerp_f64(*from, *to, t)
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        from.lerp(*to, t)
    }
}

impl Interpolate for Point {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        Vec2::interpolate(&(*from).into(), &(*to).into(), t).into()
    }
}

impl Interpolate for Size {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        Size::new(
            lerp_f32(from.width, to.width, t),
            lerp_f32(from.height, to.height, t),
        )
    }
}

impl Interpolate for Color {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        from.lerp(*to, t)
    }
}

/// Non-numeric values switch to the target once the movement completes.
impl Interpolate for String {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        if t >= 1.0 { to.clone() } else { from.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_midpoint() {
        assert_eq!(f32::interpolate(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f64::interpolate(&-4.0, &4.0, 0.25), -2.0);
    }

    #[test]
    fn test_point_interpolates_per_axis() {
        let mid = Point::interpolate(&Point::new(0.0, 10.0), &Point::new(10.0, 20.0), 0.5);
        assert_eq!(mid, Point::new(5.0, 15.0));
    }

    #[test]
    fn test_string_switches_at_end() {
        let a = "old".to_string();
        let b = "new".to_string();
        assert_eq!(String::interpolate(&a, &b, 0.9), "old");
        assert_eq!(String::interpolate(&a, &b, 1.0), "new");
    }
}
