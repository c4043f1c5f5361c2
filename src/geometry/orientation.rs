//! Orientation frames
//!
//! A `Basis` is the axis-relative view of a rotation: local +X is forward,
//! +Y is right and +Z is up, with `forward × right = up`. `Quat` stays the
//! canonical form for composition; the basis is what offset math reads.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::safe_normalize;

/// Orthonormal forward/right/up frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation of `angle` radians about `axis` (axis need not be unit length)
#[inline]
pub fn angle_axis(angle: f32, axis: Vec3) -> Quat {
    let axis = safe_normalize(axis);
    if axis == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, angle)
}

impl Basis {
    pub const IDENTITY: Self = Self {
        forward: Vec3::X,
        right: Vec3::Y,
        up: Vec3::Z,
    };

    pub fn from_quat(rotation: Quat) -> Self {
        let rotation = rotation.normalize();
        Self {
            forward: rotation * Vec3::X,
            right: rotation * Vec3::Y,
            up: rotation * Vec3::Z,
        }
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(self.forward, self.right, self.up)).normalize()
    }

    /// Rotate every axis by `rotation`
    pub fn rotated(&self, rotation: Quat) -> Self {
        Self {
            forward: rotation * self.forward,
            right: rotation * self.right,
            up: rotation * self.up,
        }
    }

    /// Map a local (forward, right, up) offset into world space
    #[inline]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.forward * local.x + self.right * local.y + self.up * local.z
    }

    /// Express a world vector in this frame's (forward, right, up) components
    #[inline]
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        Vec3::new(
            world.dot(self.forward),
            world.dot(self.right),
            world.dot(self.up),
        )
    }

    /// Upright frame whose forward axis follows `heading` flattened onto the ground.
    ///
    /// Falls back to identity when the heading points straight up or down.
    pub fn yaw_aligned(heading: Vec3) -> Self {
        let forward = safe_normalize(Vec3::new(heading.x, heading.y, 0.0));
        if forward == Vec3::ZERO {
            return Self::IDENTITY;
        }
        Self {
            forward,
            right: Vec3::Z.cross(forward),
            up: Vec3::Z,
        }
    }

    /// Frame whose up axis points from `from` toward `to`, rolled about that axis by `roll`.
    pub fn look_at(from: Vec3, to: Vec3, roll: f32) -> Self {
        let up = safe_normalize(to - from);
        if up == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let reference = if up.dot(Vec3::Z).abs() > 0.999 {
            Vec3::X
        } else {
            Vec3::Z
        };
        let forward = safe_normalize(reference - up * reference.dot(up));
        let base = Self {
            forward,
            right: up.cross(forward),
            up,
        };
        base.rotated(Quat::from_axis_angle(up, roll))
    }
}
