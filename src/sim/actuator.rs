//! Reset actuator
//!
//! Puts the ball where the controller says it stays balanced, moving with the
//! car, with part of its spin removed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::controller::ControllerState;
use crate::geometry::horizontal_distance;
use crate::host::{BallSnapshot, VehicleSnapshot, World};
use crate::settings::Settings;

/// Why a reset happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    /// Dribble mode: ball dropped to the floor threshold
    FloorBreach,
    /// Flick mode: ball went past the max distance
    DistanceBreach,
    /// Asked for explicitly
    Requested,
}

/// Ball is below `radius + threshold` above the floor
pub fn floor_breached(ball: &BallSnapshot, floor_threshold: f32) -> bool {
    ball.body.location.z - (ball.radius + floor_threshold) < 0.0
}

/// Ball is horizontally further than `max_distance` from the car
pub fn distance_breached(ball: &BallSnapshot, vehicle: &VehicleSnapshot, max_distance: f32) -> bool {
    horizontal_distance(ball.body.location, vehicle.body.location) > max_distance
}

/// Spin left on the ball after a reset
pub fn damped_angular_velocity(angular_velocity: Vec3, reduction: f32) -> Vec3 {
    angular_velocity * (1.0 - reduction.clamp(0.0, 1.0))
}

/// Teleport the ball to the controller's target. Returns false if nothing was done.
///
/// Skipped when the car or ball is missing or the car is inside a goal.
pub fn apply_reset<W: World + ?Sized>(
    world: &mut W,
    controller: &ControllerState,
    settings: &Settings,
) -> bool {
    let (Some(vehicle), Some(ball)) = (world.vehicle(), world.ball()) else {
        return false;
    };
    if settings.arena.in_goal(vehicle.body.location) {
        return false;
    }

    let car = &vehicle.body;
    world.set_ball_location(car.location + controller.target_offset);
    world.set_ball_velocity(car.velocity + controller.target_velocity_adjust);
    world.set_ball_angular_velocity(
        damped_angular_velocity(ball.body.angular_velocity, settings.angular_reduction),
        false,
    );
    true
}
