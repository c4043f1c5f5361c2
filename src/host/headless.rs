//! Plain-data host used by the demo binary and tests
//!
//! `HeadlessWorld` integrates a car and ball ballistically and logs every
//! command the trainer issues; `RecordingCanvas` projects with a pinhole
//! camera and records draw calls instead of rasterizing.

use glam::{Quat, Vec2, Vec3};

use super::{BallSnapshot, Canvas, RigidBody, VehicleSnapshot, World};
use crate::consts::{BALL_RADIUS, GRAVITY_Z};
use crate::renderer::Rgba;
use crate::visibility::Camera;

/// Command issued to the world, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldCommand {
    SetBallLocation(Vec3),
    SetBallVelocity(Vec3),
    SetBallAngularVelocity { angular_velocity: Vec3, local: bool },
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessWorld {
    pub vehicle: Option<VehicleSnapshot>,
    pub ball: Option<BallSnapshot>,
    pub camera: Option<Camera>,
    /// Commands received since the last `take_commands`
    pub commands: Vec<WorldCommand>,
}

impl HeadlessWorld {
    /// Car resting at the origin, ball sitting on its roof, camera behind
    pub fn kickoff() -> Self {
        let car = VehicleSnapshot {
            body: RigidBody {
                location: Vec3::new(0.0, 0.0, 17.0),
                ..Default::default()
            },
            on_ground: true,
        };
        let ball = BallSnapshot {
            body: RigidBody {
                location: Vec3::new(0.0, 0.0, 17.0 + 150.0),
                ..Default::default()
            },
            radius: BALL_RADIUS,
        };
        let camera = Camera {
            location: Vec3::new(-280.0, 0.0, 120.0),
            rotation: Quat::from_rotation_y(0.05),
            fov_degrees: 110.0,
        };
        Self {
            vehicle: Some(car),
            ball: Some(ball),
            camera: Some(camera),
            commands: Vec::new(),
        }
    }

    pub fn take_commands(&mut self) -> Vec<WorldCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of ball teleports since the last `take_commands`
    pub fn teleport_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, WorldCommand::SetBallLocation(_)))
            .count()
    }

    /// Advance car and ball by `dt` seconds (no collisions beyond the floor)
    pub fn step(&mut self, dt: f32) {
        if let Some(car) = &mut self.vehicle {
            let body = &mut car.body;
            body.location += body.velocity * dt;
            let spin = body.angular_velocity * dt;
            if spin.length_squared() > 0.0 {
                body.rotation = (Quat::from_scaled_axis(spin) * body.rotation).normalize();
                // Grounded cars turn their velocity with them
                if car.on_ground {
                    body.velocity = Quat::from_scaled_axis(spin) * body.velocity;
                }
            }
        }
        if let Some(ball) = &mut self.ball {
            let body = &mut ball.body;
            body.velocity.z += GRAVITY_Z * dt;
            body.location += body.velocity * dt;
            if body.location.z < ball.radius {
                body.location.z = ball.radius;
                body.velocity.z = 0.0;
            }
        }
    }
}

impl World for HeadlessWorld {
    fn vehicle(&self) -> Option<VehicleSnapshot> {
        self.vehicle
    }

    fn ball(&self) -> Option<BallSnapshot> {
        self.ball
    }

    fn camera(&self) -> Option<Camera> {
        self.camera
    }

    fn set_ball_location(&mut self, location: Vec3) {
        if let Some(ball) = &mut self.ball {
            ball.body.location = location;
        }
        self.commands.push(WorldCommand::SetBallLocation(location));
    }

    fn set_ball_velocity(&mut self, velocity: Vec3) {
        if let Some(ball) = &mut self.ball {
            ball.body.velocity = velocity;
        }
        self.commands.push(WorldCommand::SetBallVelocity(velocity));
    }

    fn set_ball_angular_velocity(&mut self, angular_velocity: Vec3, local: bool) {
        if let Some(ball) = &mut self.ball {
            ball.body.angular_velocity = if local {
                ball.body.rotation * angular_velocity
            } else {
                angular_velocity
            };
        }
        self.commands.push(WorldCommand::SetBallAngularVelocity {
            angular_velocity,
            local,
        });
    }
}

/// Recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        start: Vec2,
        end: Vec2,
        thickness: f32,
        color: Rgba,
    },
    Text {
        position: Vec2,
        text: String,
        color: Rgba,
    },
}

/// Canvas that records instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub viewport: Vec2,
    pub camera: Option<Camera>,
    pub calls: Vec<DrawCall>,
    color: Rgba,
}

impl RecordingCanvas {
    pub fn new(viewport: Vec2, camera: Option<Camera>) -> Self {
        Self {
            viewport,
            camera,
            calls: Vec::new(),
            color: Rgba::WHITE,
        }
    }

    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn project(&self, point: Vec3) -> Vec2 {
        let Some(camera) = &self.camera else {
            return Vec2::ZERO;
        };
        let local = camera.basis().world_to_local(point - camera.location);
        if local.x <= f32::EPSILON {
            // Behind the camera: push far off screen
            return Vec2::splat(-1.0e6);
        }
        let (half_h, _) = camera.half_angles(self.viewport);
        let focal = (self.viewport.x * 0.5) / half_h.tan();
        let center = self.viewport * 0.5;
        Vec2::new(
            center.x + local.y / local.x * focal,
            center.y - local.z / local.x * focal,
        )
    }

    fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2, thickness: f32) {
        self.calls.push(DrawCall::Line {
            start,
            end,
            thickness,
            color: self.color,
        });
    }

    fn draw_string(&mut self, position: Vec2, text: &str) {
        self.calls.push(DrawCall::Text {
            position,
            text: text.to_string(),
            color: self.color,
        });
    }
}
