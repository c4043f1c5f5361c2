//! Camera viewing volume

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Basis, Plane};

/// Distance of the near plane in front of the camera
pub const NEAR_PLANE_DISTANCE: f32 = 1.0;

/// Camera state read from the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub location: Vec3,
    pub rotation: Quat,
    /// Horizontal field of view in degrees
    pub fov_degrees: f32,
}

impl Camera {
    pub fn basis(&self) -> Basis {
        Basis::from_quat(self.rotation)
    }

    /// Horizontal and vertical half-angles (radians) for a viewport
    pub fn half_angles(&self, viewport: Vec2) -> (f32, f32) {
        let half_h = (self.fov_degrees.clamp(1.0, 179.0) * 0.5).to_radians();
        let aspect = if viewport.x > 0.0 {
            viewport.y.max(1.0) / viewport.x
        } else {
            1.0
        };
        let half_v = (half_h.tan() * aspect).atan();
        (half_h, half_v)
    }
}

/// Five inward-facing planes: near, left, right, top, bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane; 5],
    origin: Vec3,
    tan_half_v: f32,
}

impl Frustum {
    pub fn new(camera: &Camera, viewport: Vec2) -> Self {
        let Basis { forward, right, up } = camera.basis();
        let (half_h, half_v) = camera.half_angles(viewport);
        let origin = camera.location;
        let (sin_h, cos_h) = half_h.sin_cos();
        let (sin_v, cos_v) = half_v.sin_cos();

        let planes = [
            Plane::new(forward, origin + forward * NEAR_PLANE_DISTANCE),
            Plane::new(forward * sin_h + right * cos_h, origin), // left
            Plane::new(forward * sin_h - right * cos_h, origin), // right
            Plane::new(forward * sin_v - up * cos_v, origin),    // top
            Plane::new(forward * sin_v + up * cos_v, origin),    // bottom
        ];

        Self {
            planes,
            origin,
            tan_half_v: half_v.tan(),
        }
    }

    /// True if `point` is inside the volume by at least `epsilon` units.
    ///
    /// A larger epsilon only ever rejects more points.
    pub fn contains(&self, point: Vec3, epsilon: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= epsilon)
    }

    /// How much of the half-viewport height a sphere at `point` spans, in `[0, 1]`
    pub fn apparent_size(&self, point: Vec3, radius: f32) -> f32 {
        let distance = point.distance(self.origin);
        if distance <= radius || self.tan_half_v <= 0.0 {
            return 1.0;
        }
        (radius / (distance * self.tan_half_v)).clamp(0.0, 1.0)
    }
}
