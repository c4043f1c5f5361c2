//! Host boundary
//!
//! The game owns physics, the camera and the screen. The trainer only reads
//! snapshots through `World` and draws through `Canvas`; anything the host
//! cannot resolve this frame comes back as `None` and the frame's work is
//! skipped.

pub mod headless;

pub use headless::{DrawCall, HeadlessWorld, RecordingCanvas};

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Basis, Sphere};
use crate::renderer::Rgba;
use crate::visibility::Camera;

/// Observable rigid body state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub location: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl RigidBody {
    pub fn basis(&self) -> Basis {
        Basis::from_quat(self.rotation)
    }
}

/// The player's car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub body: RigidBody,
    pub on_ground: bool,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub body: RigidBody,
    pub radius: f32,
}

impl BallSnapshot {
    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.body.location, self.radius)
    }
}

/// Queries and commands against the running game
pub trait World {
    fn vehicle(&self) -> Option<VehicleSnapshot>;
    fn ball(&self) -> Option<BallSnapshot>;
    fn camera(&self) -> Option<Camera>;

    fn set_ball_location(&mut self, location: Vec3);
    fn set_ball_velocity(&mut self, velocity: Vec3);
    /// `local` selects body space instead of world space
    fn set_ball_angular_velocity(&mut self, angular_velocity: Vec3, local: bool);
}

/// Screen drawing surface
pub trait Canvas {
    fn viewport_size(&self) -> Vec2;
    /// World point to screen pixels
    fn project(&self, point: Vec3) -> Vec2;
    fn set_color(&mut self, color: Rgba);
    fn draw_line(&mut self, start: Vec2, end: Vec2, thickness: f32);
    fn draw_string(&mut self, position: Vec2, text: &str);
}
