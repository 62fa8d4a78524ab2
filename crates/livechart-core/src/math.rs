/// Vector math from [`glam`].
///
/// Chart code only needs the 2D types; they are re-exported here so
/// downstream crates do not pin their own `glam` version.
///
/// [`glam`]: https://docs.rs/glam
pub use glam::{Vec2, vec2};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between `a` and `b` in double precision.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f32) -> f64 {
    a + (b - a) * t as f64
}

/// `true` when both values are within `f64::EPSILON` scaled by magnitude.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}
