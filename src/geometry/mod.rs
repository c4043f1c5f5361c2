//! Geometry primitives
//!
//! Pure value types and functions, no state:
//! - vector helpers on top of `glam::Vec3`
//! - `Basis`: orthonormal forward/right/up frame, convertible to/from `Quat`
//! - `Plane`, `Line`, `Sphere`

pub mod orientation;
pub mod primitives;

pub use orientation::{Basis, angle_axis};
pub use primitives::{Line, Plane, Sphere};

use glam::Vec3;

/// Below this length a vector has no usable direction
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Normalize `v`, or return `Vec3::ZERO` when it is too short to carry a direction.
///
/// Never produces NaN/Inf. Callers that need a direction check the length first.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON && len.is_finite() {
        v / len
    } else {
        Vec3::ZERO
    }
}

/// Project `v` onto `onto` (zero if `onto` is degenerate)
#[inline]
pub fn vector_projection(v: Vec3, onto: Vec3) -> Vec3 {
    let denom = onto.length_squared();
    if denom <= NORMALIZE_EPSILON * NORMALIZE_EPSILON {
        return Vec3::ZERO;
    }
    onto * (v.dot(onto) / denom)
}

/// Same point with its height replaced
#[inline]
pub fn with_z(v: Vec3, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

/// Length of the ground-plane (XY) component
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    with_z(a - b, 0.0).length()
}
