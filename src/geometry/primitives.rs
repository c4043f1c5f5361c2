//! Plane, line segment and sphere

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{NORMALIZE_EPSILON, safe_normalize};

/// Line segment between two world points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Closest point on the segment to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq < NORMALIZE_EPSILON {
            return self.start; // Degenerate segment
        }
        let t = ((point - self.start).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.start + dir * t
    }
}

/// Infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    /// The normal is normalized here; a zero normal stays zero and the plane intersects nothing.
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: safe_normalize(normal),
            point,
        }
    }

    /// Signed distance from the plane, positive on the normal's side
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point - self.point)
    }

    /// Intersection of the infinite line through `line` with this plane
    ///
    /// `None` when the line is parallel to the plane or the plane is degenerate.
    pub fn intersect_line(&self, line: &Line) -> Option<Vec3> {
        let dir = line.direction();
        let denom = self.normal.dot(dir);
        if denom.abs() < NORMALIZE_EPSILON {
            return None;
        }
        let t = self.normal.dot(self.point - line.start) / denom;
        Some(line.start + dir * t)
    }
}

/// Bounding sphere (the ball)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) < self.radius
    }

    /// True if the segment passes through the sphere's interior
    pub fn occludes_segment(&self, segment: &Line) -> bool {
        self.contains(segment.closest_point(self.center))
    }
}
