//! Mathematical utilities

pub mod aabb;

pub use aabb::Aabb;

/// Linear interpolation from `a` to `b` by `t`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
