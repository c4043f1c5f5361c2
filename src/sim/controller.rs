//! Adaptive stabilization controller
//!
//! Runs once per frame. From the car's velocity, acceleration, yaw rate and
//! ground contact it estimates where a reset ball has to spawn (relative to the
//! car) to stay balanced on the roof, then smooths that estimate over a short
//! sliding time window. Only the position is smoothed; the velocity correction
//! is the latest instantaneous value so braking stays responsive.

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Basis;
use crate::host::{BallSnapshot, VehicleSnapshot};
use crate::settings::StabilizerTuning;

/// One smoothed-offset sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResetSample {
    /// World-space offset from the car
    pub offset: Vec3,
    /// Time since session start
    pub timestamp: Duration,
}

/// Sliding time window of samples, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleWindow {
    samples: VecDeque<ResetSample>,
    length: Duration,
}

impl SampleWindow {
    pub fn new(length: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            length,
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn set_length(&mut self, length: Duration) {
        self.length = length;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResetSample> {
        self.samples.iter()
    }

    /// Append a sample and drop every sample at least one window length older than it.
    ///
    /// Timestamps are expected to be non-decreasing.
    pub fn push(&mut self, sample: ResetSample) {
        let newest = sample.timestamp;
        self.samples.push_back(sample);
        while let Some(oldest) = self.samples.front() {
            if newest.saturating_sub(oldest.timestamp) >= self.length && self.samples.len() > 1 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Arithmetic mean of all offsets in the window
    pub fn mean(&self) -> Option<Vec3> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: Vec3 = self.samples.iter().map(|s| s.offset).sum();
        Some(sum / self.samples.len() as f32)
    }
}

/// Car state the controller reads each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicInput {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub basis: Basis,
    pub on_ground: bool,
    pub ball_radius: f32,
}

impl KinematicInput {
    pub fn new(vehicle: &VehicleSnapshot, ball: &BallSnapshot) -> Self {
        Self {
            velocity: vehicle.body.velocity,
            angular_velocity: vehicle.body.angular_velocity,
            basis: vehicle.body.basis(),
            on_ground: vehicle.on_ground,
            ball_radius: ball.radius.max(0.0),
        }
    }
}

/// Unsmoothed per-frame estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTarget {
    /// World-space spawn offset from the car
    pub offset: Vec3,
    pub velocity_adjust: Vec3,
}

/// Instantaneous spawn offset and velocity correction for the current motion.
///
/// `acceleration` is the scaled estimate from consecutive velocity samples.
pub fn estimate_target(
    input: &KinematicInput,
    acceleration: Vec3,
    tuning: &StabilizerTuning,
) -> RawTarget {
    let basis = &input.basis;
    let accel_forward = acceleration.dot(basis.forward);
    let velocity_right = input.velocity.dot(basis.right);

    let speed_frac = input.velocity.length() / tuning.speed_scale();
    let yaw_rate = input.angular_velocity.z;
    let turn_frac = yaw_rate.abs() / tuning.turn_scale();

    let mut spawn = Vec3::new(0.0, 0.0, tuning.base_height);
    let mut forward = basis.forward * (accel_forward * tuning.forward_accel_gain * speed_frac);
    let mut velocity_adjust = Vec3::ZERO;

    if input.on_ground && yaw_rate != 0.0 {
        // Positive yaw rate turns right
        let lateral = basis.right * (tuning.lateral_gain * turn_frac * speed_frac);
        spawn += lateral * yaw_rate.signum();
        spawn.z *= 1.0 - turn_frac;
        forward -= forward * turn_frac;
        velocity_adjust = (-basis.right * velocity_right)
            .clamp_length_max(tuning.max_velocity_correction);
    }

    forward -= forward * speed_frac;
    spawn.z = spawn.z.max(input.ball_radius);

    RawTarget {
        offset: spawn + forward,
        velocity_adjust,
    }
}

/// Per-session controller state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerState {
    /// Smoothed world-space spawn offset from the car
    pub target_offset: Vec3,
    /// Latest velocity correction added to the car velocity on reset
    pub target_velocity_adjust: Vec3,
    pub window: SampleWindow,
    /// Scaled acceleration estimate from the last frame with a usable dt
    pub acceleration: Vec3,
    pub previous_velocity: Vec3,
    pub previous_sample_time: Option<Duration>,
}

impl ControllerState {
    pub fn new(tuning: &StabilizerTuning) -> Self {
        Self {
            target_offset: Vec3::new(0.0, 0.0, tuning.base_height),
            target_velocity_adjust: Vec3::ZERO,
            window: SampleWindow::new(tuning.sample_window()),
            acceleration: Vec3::ZERO,
            previous_velocity: Vec3::ZERO,
            previous_sample_time: None,
        }
    }

    /// Refresh the acceleration estimate; a zero or negative dt keeps the previous one
    fn update_acceleration(&mut self, velocity: Vec3, tuning: &StabilizerTuning, now: Duration) {
        if let Some(previous) = self.previous_sample_time {
            let dt = now.saturating_sub(previous).as_secs_f32();
            if dt > 0.0 {
                self.acceleration =
                    (velocity - self.previous_velocity) * tuning.accel_unit_scale / dt;
            }
        }
        self.previous_velocity = velocity;
        self.previous_sample_time = Some(now);
    }

    /// Run one controller frame
    pub fn update(&mut self, input: &KinematicInput, tuning: &StabilizerTuning, now: Duration) {
        self.update_acceleration(input.velocity, tuning, now);

        let raw = estimate_target(input, self.acceleration, tuning);

        self.window.set_length(tuning.sample_window());
        self.window.push(ResetSample {
            offset: raw.offset,
            timestamp: now,
        });

        let mut offset = self.window.mean().unwrap_or(raw.offset);
        // Averaging can dip below the floor, so it is applied again
        offset.z = offset.z.max(input.ball_radius);
        self.target_offset = offset;
        self.target_velocity_adjust = raw.velocity_adjust;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn input(velocity: Vec3, yaw_rate: f32) -> KinematicInput {
        KinematicInput {
            velocity,
            angular_velocity: Vec3::new(0.0, 0.0, yaw_rate),
            basis: Basis::IDENTITY,
            on_ground: true,
            ball_radius: BALL_RADIUS,
        }
    }

    #[test]
    fn test_window_size_stabilizes() {
        let mut window = SampleWindow::new(ms(250));
        for i in 0..100 {
            window.push(ResetSample {
                offset: Vec3::ZERO,
                timestamp: ms(i * 10),
            });
        }
        // ceil(250 / 10)
        assert_eq!(window.len(), 25);

        let mut uneven = SampleWindow::new(ms(500));
        for i in 0..20 {
            uneven.push(ResetSample {
                offset: Vec3::ZERO,
                timestamp: ms(i * 300),
            });
        }
        // ceil(500 / 300)
        assert_eq!(uneven.len(), 2);
    }

    #[test]
    fn test_window_keeps_newest_after_gap() {
        let mut window = SampleWindow::new(ms(100));
        window.push(ResetSample { offset: Vec3::X, timestamp: ms(0) });
        window.push(ResetSample { offset: Vec3::Y, timestamp: ms(5_000) });
        assert_eq!(window.len(), 1);
        assert_eq!(window.mean(), Some(Vec3::Y));
    }

    #[test]
    fn test_window_mean() {
        let mut window = SampleWindow::new(ms(1000));
        assert_eq!(window.mean(), None);
        window.push(ResetSample { offset: Vec3::new(0.0, 0.0, 100.0), timestamp: ms(0) });
        window.push(ResetSample { offset: Vec3::new(10.0, 0.0, 200.0), timestamp: ms(10) });
        assert_eq!(window.mean(), Some(Vec3::new(5.0, 0.0, 150.0)));
    }

    #[test]
    fn test_stationary_converges_to_base_height() {
        let tuning = StabilizerTuning::default();
        let mut controller = ControllerState::new(&tuning);
        for i in 0..120 {
            controller.update(&input(Vec3::ZERO, 0.0), &tuning, ms(i * 16));
        }
        assert!((controller.target_offset - Vec3::new(0.0, 0.0, 150.0)).length() < 1e-4);
        assert_eq!(controller.target_velocity_adjust, Vec3::ZERO);
    }

    #[test]
    fn test_zero_dt_keeps_previous_acceleration() {
        let tuning = StabilizerTuning::default();
        let mut controller = ControllerState::new(&tuning);
        controller.update(&input(Vec3::ZERO, 0.0), &tuning, ms(0));
        controller.update(&input(Vec3::new(100.0, 0.0, 0.0), 0.0), &tuning, ms(100));
        let accel = controller.acceleration;
        assert!((accel.x - 100.0 * 0.036 / 0.1).abs() < 1e-3);

        controller.update(&input(Vec3::new(500.0, 0.0, 0.0), 0.0), &tuning, ms(100));
        assert_eq!(controller.acceleration, accel);
        assert!(controller.target_offset.is_finite());
    }

    #[test]
    fn test_right_turn_shifts_right_and_lowers() {
        let tuning = StabilizerTuning::default();
        let velocity = Vec3::new(0.5 * tuning.max_speed, 0.0, 0.0);
        let raw = estimate_target(&input(velocity, 2.0), Vec3::ZERO, &tuning);
        assert!(raw.offset.y > 0.0);
        assert!(raw.offset.z < tuning.base_height);
        assert!(raw.offset.z >= BALL_RADIUS);

        let left = estimate_target(&input(velocity, -2.0), Vec3::ZERO, &tuning);
        assert!(left.offset.y < 0.0);
    }

    #[test]
    fn test_turn_only_counts_on_ground() {
        let tuning = StabilizerTuning::default();
        let mut airborne = input(Vec3::new(1000.0, 0.0, 0.0), 3.0);
        airborne.on_ground = false;
        let raw = estimate_target(&airborne, Vec3::ZERO, &tuning);
        assert_eq!(raw.offset, Vec3::new(0.0, 0.0, tuning.base_height));
        assert_eq!(raw.velocity_adjust, Vec3::ZERO);
    }

    #[test]
    fn test_velocity_correction_opposes_slide_and_is_clamped() {
        let tuning = StabilizerTuning::default();
        let sliding = estimate_target(&input(Vec3::new(800.0, 100.0, 0.0), 1.0), Vec3::ZERO, &tuning);
        assert!((sliding.velocity_adjust - Vec3::new(0.0, -100.0, 0.0)).length() < 1e-3);

        let powerslide = estimate_target(&input(Vec3::new(800.0, -900.0, 0.0), 1.0), Vec3::ZERO, &tuning);
        assert!((powerslide.velocity_adjust.length() - tuning.max_velocity_correction).abs() < 1e-2);
        assert!(powerslide.velocity_adjust.y > 0.0);
    }

    #[test]
    fn test_forward_lead_is_attenuated_by_speed() {
        let tuning = StabilizerTuning::default();
        let accel = Vec3::new(100.0, 0.0, 0.0);
        let slow = estimate_target(&input(Vec3::new(460.0, 0.0, 0.0), 0.0), accel, &tuning);
        let fast = estimate_target(&input(Vec3::new(2300.0, 0.0, 0.0), 0.0), accel, &tuning);
        assert!(slow.offset.x > 0.0);
        // At full speed the (1 - speed) attenuation removes the lead entirely
        assert!(fast.offset.x.abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn target_height_never_below_ball_radius(
            vx in -2300.0f32..2300.0,
            vy in -2300.0f32..2300.0,
            vz in -500.0f32..500.0,
            yaw_rate in -5.5f32..5.5,
            pitch in -1.5f32..1.5,
            roll in -1.5f32..1.5,
            on_ground in any::<bool>(),
            frames in 1usize..20,
        ) {
            let tuning = StabilizerTuning::default();
            let mut controller = ControllerState::new(&tuning);
            let rotation = glam::Quat::from_euler(glam::EulerRot::ZYX, 0.3, pitch, roll);
            let mut kin = input(Vec3::new(vx, vy, vz), yaw_rate);
            kin.basis = Basis::from_quat(rotation);
            kin.on_ground = on_ground;
            for i in 0..frames {
                let v = kin.velocity * (1.0 - i as f32 / 40.0);
                let frame = KinematicInput { velocity: v, ..kin };
                controller.update(&frame, &tuning, ms(i as u64 * 16));
                prop_assert!(controller.target_offset.z >= BALL_RADIUS);
            }
        }
    }
}
