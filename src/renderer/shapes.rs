//! World-space shapes drawn as projected line segments
//!
//! A segment is only drawn when both of its ends are inside the frustum.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::geometry::{Basis, Sphere, safe_normalize};
use crate::host::Canvas;
use crate::visibility::Frustum;

/// Circle in the local forward/right plane of `orientation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub location: Vec3,
    pub orientation: Quat,
    pub radius: f32,
    /// Segments in a full turn
    pub steps: u32,
    pub thickness: f32,
    /// Portion of the full turn to draw (0-1)
    pub sweep: f32,
}

impl Circle {
    pub fn new(location: Vec3, orientation: Quat, radius: f32) -> Self {
        Self {
            location,
            orientation,
            radius,
            steps: 16,
            thickness: 1.0,
            sweep: 1.0,
        }
    }

    /// Vertices along the drawn arc, first to last
    pub fn points(&self) -> Vec<Vec3> {
        let steps = self.steps.max(3);
        let sweep = self.sweep.clamp(0.0, 1.0);
        let segments = (steps as f32 * sweep).ceil() as u32;
        if segments == 0 {
            return Vec::new();
        }
        let max_angle = TAU * sweep;
        let step = TAU / steps as f32;

        (0..=segments)
            .map(|i| {
                let angle = (step * i as f32).min(max_angle);
                let local = Vec3::new(angle.cos(), angle.sin(), 0.0) * self.radius;
                self.location + self.orientation * local
            })
            .collect()
    }

    /// Returns the number of segments actually drawn
    pub fn draw(&self, canvas: &mut dyn Canvas, frustum: &Frustum) -> usize {
        let points = self.points();
        let mut drawn = 0;
        for pair in points.windows(2) {
            if frustum.contains(pair[0], 0.0) && frustum.contains(pair[1], 0.0) {
                let (a, b) = (canvas.project(pair[0]), canvas.project(pair[1]));
                canvas.draw_line(a, b, self.thickness);
                drawn += 1;
            }
        }
        drawn
    }
}

/// Outline of `sphere` as seen from `camera` (its silhouette circle)
pub fn draw_sphere_outline(
    canvas: &mut dyn Canvas,
    frustum: &Frustum,
    sphere: &Sphere,
    camera: Vec3,
    steps: u32,
) -> usize {
    let distance = sphere.center.distance(camera);
    if distance <= sphere.radius {
        return 0;
    }
    let r = sphere.radius;
    let toward_camera = safe_normalize(camera - sphere.center);
    let mut circle = Circle::new(
        sphere.center + toward_camera * (r * r / distance),
        Basis::look_at(sphere.center, camera, 0.0).to_quat(),
        r * (1.0 - (r * r) / (distance * distance)).sqrt(),
    );
    circle.steps = steps;
    circle.draw(canvas, frustum)
}

/// Arrow from `origin` along `vector`
pub fn draw_vector(canvas: &mut dyn Canvas, frustum: &Frustum, origin: Vec3, vector: Vec3) -> bool {
    let tip = origin + vector;
    let dir = safe_normalize(vector);
    if dir == Vec3::ZERO || !frustum.contains(origin, 0.0) || !frustum.contains(tip, 0.0) {
        return false;
    }
    let side = {
        let s = safe_normalize(dir.cross(Vec3::Z));
        if s == Vec3::ZERO { Vec3::X } else { s }
    };
    let head = (vector.length() * 0.2).min(20.0);
    let tip_2d = canvas.project(tip);
    let origin_2d = canvas.project(origin);
    canvas.draw_line(origin_2d, tip_2d, 1.0);
    for wing in [side, -side] {
        let back = canvas.project(tip - dir * head + wing * head * 0.5);
        canvas.draw_line(tip_2d, back, 1.0);
    }
    true
}
