//! Launch sequencer (catch practice)
//!
//! `Idle -> Preparing -> Released -> Idle`. While preparing, the ball is held
//! still at the point it will be launched from; when the countdown ends the
//! ball is fired at the car. Every request bumps `generation`, and a release
//! only acts if it carries the current generation, so a newer request
//! silently supersedes an older pending one.

use std::f32::consts::TAU;
use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::LAUNCH_SPEED_SCALE;
use crate::geometry::{Basis, angle_axis, safe_normalize};
use crate::host::{VehicleSnapshot, World};
use crate::settings::Settings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchState {
    /// Counting down with the ball held at the launch point
    pub is_preparing: bool,
    pub countdown_start: Duration,
    /// Unit direction from the car to the launch point
    pub launch_direction: Vec3,
    /// Launch speed as a fraction of `LAUNCH_SPEED_SCALE` (0-1)
    pub launch_magnitude: f32,
    pub generation: u64,
}

impl Default for LaunchState {
    fn default() -> Self {
        Self {
            is_preparing: false,
            countdown_start: Duration::ZERO,
            launch_direction: Vec3::X,
            launch_magnitude: 0.0,
            generation: 0,
        }
    }
}

/// Direction `yaw` radians around the up axis, tilted `elevation_degrees` above the horizon
pub fn launch_direction(yaw: f32, elevation_degrees: f32) -> Vec3 {
    let basis = Basis::IDENTITY;
    let basis = basis.rotated(angle_axis(yaw, basis.up));
    // Negative so that positive angles tilt upward
    let basis = basis.rotated(angle_axis(-elevation_degrees.to_radians(), basis.right));
    safe_normalize(basis.forward)
}

impl LaunchState {
    /// Start a new countdown with a random direction and speed; returns its generation
    pub fn begin<R: Rng>(&mut self, settings: &Settings, rng: &mut R, now: Duration) -> u64 {
        let yaw = rng.random_range(0.0..TAU);
        let elevation = settings.launch_angle.sample(rng);
        let speed = settings.launch_speed.sample(rng);

        self.launch_direction = launch_direction(yaw, elevation);
        self.launch_magnitude = (speed / LAUNCH_SPEED_SCALE).clamp(0.0, 1.0);
        self.countdown_start = now;
        self.is_preparing = true;
        self.generation += 1;
        self.generation
    }

    /// Fraction of the countdown still to go, 1 at the start and 0 when it expires
    pub fn countdown_remaining(&self, now: Duration, preparation_secs: f32) -> f32 {
        if preparation_secs <= 0.0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.countdown_start).as_secs_f32();
        (1.0 - elapsed / preparation_secs).clamp(0.0, 1.0)
    }

    /// Point the ball is held at while preparing
    pub fn hold_location(&self, vehicle_location: Vec3, settings: &Settings) -> Vec3 {
        let reach = (settings.max_flick_distance - settings.arena.hold_inset).max(0.0);
        settings
            .arena
            .clamp_hold(vehicle_location + self.launch_direction * reach)
    }

    pub fn launch_speed(&self) -> f32 {
        self.launch_magnitude * LAUNCH_SPEED_SCALE
    }
}

/// Pin the ball at the launch point with zero velocity
pub fn hold_ball<W: World + ?Sized>(
    world: &mut W,
    launch: &LaunchState,
    vehicle: &VehicleSnapshot,
    settings: &Settings,
) {
    world.set_ball_velocity(Vec3::ZERO);
    world.set_ball_location(launch.hold_location(vehicle.body.location, settings));
}

/// Deferred release for `generation`; returns true if the ball was launched.
///
/// Stale generations and repeated releases are no-ops. If the car or ball
/// cannot be resolved the countdown still ends but nothing is launched.
pub fn release<W: World + ?Sized>(world: &mut W, launch: &mut LaunchState, generation: u64) -> bool {
    if generation != launch.generation {
        log::trace!(
            "Dropping stale launch {} (current {})",
            generation,
            launch.generation
        );
        return false;
    }
    if !launch.is_preparing {
        return false;
    }
    launch.is_preparing = false;

    let (Some(vehicle), Some(ball)) = (world.vehicle(), world.ball()) else {
        log::debug!("Launch {} skipped: car or ball missing", generation);
        return false;
    };

    let direction = safe_normalize(vehicle.body.location - ball.body.location);
    world.set_ball_velocity(direction * launch.launch_speed() + vehicle.body.velocity);
    log::info!(
        "Launch {} released at {:.0} uu/s",
        generation,
        launch.launch_speed()
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessWorld;
    use crate::host::headless::WorldCommand;
    use crate::settings::ValueRange;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_direction_elevation() {
        let flat = launch_direction(0.0, 0.0);
        assert!((flat - Vec3::X).length() < 1e-5);

        let up = launch_direction(1.2, 45.0);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!((up.z - 45f32.to_radians().sin()).abs() < 1e-4);

        // Yaw a quarter turn: forward swings to +Y
        let side = launch_direction(std::f32::consts::FRAC_PI_2, 30.0);
        assert!(side.y > 0.8 && side.x.abs() < 1e-4 && side.z > 0.4);
    }

    #[test]
    fn test_begin_bumps_generation() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut launch = LaunchState::default();
        assert_eq!(launch.begin(&settings, &mut rng, Duration::from_secs(1)), 1);
        assert_eq!(launch.begin(&settings, &mut rng, Duration::from_secs(2)), 2);
        assert!(launch.is_preparing);
        assert!((0.3..=0.7).contains(&launch.launch_magnitude));
        assert!(launch.launch_direction.z > 0.0);
    }

    #[test]
    fn test_countdown_remaining() {
        let launch = LaunchState {
            countdown_start: Duration::from_secs(10),
            is_preparing: true,
            ..Default::default()
        };
        assert_eq!(launch.countdown_remaining(Duration::from_secs(10), 2.0), 1.0);
        assert!((launch.countdown_remaining(Duration::from_millis(10_500), 2.0) - 0.75).abs() < 1e-5);
        assert_eq!(launch.countdown_remaining(Duration::from_secs(30), 2.0), 0.0);
        assert_eq!(launch.countdown_remaining(Duration::from_secs(10), 0.0), 0.0);
    }

    #[test]
    fn test_hold_location_is_clamped() {
        let mut settings = Settings::default();
        settings.launch_angle = ValueRange::new(10.0, 10.0);
        let launch = LaunchState {
            launch_direction: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        let held = launch.hold_location(Vec3::new(0.0, 4500.0, 17.0), &settings);
        assert_eq!(held, Vec3::new(0.0, 5000.0, 100.0));

        let free = launch.hold_location(Vec3::new(0.0, 0.0, 300.0), &settings);
        assert_eq!(free, Vec3::new(0.0, 1100.0, 300.0));
    }

    #[test]
    fn test_release_fires_at_car() {
        let mut world = HeadlessWorld::kickoff();
        if let Some(ball) = &mut world.ball {
            ball.body.location = Vec3::new(1000.0, 0.0, 17.0);
        }
        let mut launch = LaunchState {
            is_preparing: true,
            launch_magnitude: 0.5,
            generation: 3,
            ..Default::default()
        };
        assert!(release(&mut world, &mut launch, 3));
        assert!(!launch.is_preparing);
        let velocity = world.ball.unwrap().body.velocity;
        assert!((velocity - Vec3::new(-2500.0, 0.0, 0.0)).length() < 1e-2);

        // Second delivery of the same generation does nothing
        world.take_commands();
        assert!(!release(&mut world, &mut launch, 3));
        assert!(world.commands.is_empty());
    }

    #[test]
    fn test_stale_release_is_ignored() {
        let mut world = HeadlessWorld::kickoff();
        let mut launch = LaunchState {
            is_preparing: true,
            generation: 2,
            ..Default::default()
        };
        assert!(!release(&mut world, &mut launch, 1));
        assert!(launch.is_preparing);
        assert!(!world
            .commands
            .iter()
            .any(|c| matches!(c, WorldCommand::SetBallVelocity(_))));
    }

    #[test]
    fn test_release_without_ball_ends_countdown() {
        let mut world = HeadlessWorld::kickoff();
        world.ball = None;
        let mut launch = LaunchState {
            is_preparing: true,
            generation: 1,
            ..Default::default()
        };
        assert!(!release(&mut world, &mut launch, 1));
        assert!(!launch.is_preparing);
    }
}
