//! Trainer settings
//!
//! Plain values read every frame. The host owns the option surface; this
//! module only holds defaults, JSON (de)serialization and clamping into sane
//! ranges.

use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Auto-reset modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingMode {
    /// Reset when the ball drops to the floor threshold
    Dribble,
    /// Reset when the ball gets too far from the car
    Flick,
}

impl TrainingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingMode::Dribble => "Dribble",
            TrainingMode::Flick => "Flick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dribble" => Some(TrainingMode::Dribble),
            "flick" | "flicks" => Some(TrainingMode::Flick),
            _ => None,
        }
    }
}

/// Inclusive range a value is drawn from uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Ordered and clamped into `[lo, hi]`
    pub fn clamped(&self, lo: f32, hi: f32) -> Self {
        let a = self.min.clamp(lo, hi);
        let b = self.max.clamp(lo, hi);
        Self::new(a.min(b), a.max(b))
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Empirically tuned "feel" constants for the stabilization controller.
///
/// These are not physical limits; changing them changes how resets feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerTuning {
    /// Speed treated as full speed (uu/s)
    pub max_speed: f32,
    /// Yaw rate treated as a full-lock turn (rad/s)
    pub max_turn_rate: f32,
    /// Spawn height above the car when nothing is happening
    pub base_height: f32,
    /// Lateral shift at full turn and full speed
    pub lateral_gain: f32,
    /// Forward lead per unit of forward acceleration
    pub forward_accel_gain: f32,
    /// Scale applied to velocity deltas before dividing by dt (uu/s -> km/h)
    pub accel_unit_scale: f32,
    /// Upper bound on the sideways velocity correction (uu/s)
    pub max_velocity_correction: f32,
    /// Length of the smoothing window (seconds)
    pub sample_window_secs: f32,
}

impl Default for StabilizerTuning {
    fn default() -> Self {
        Self {
            max_speed: 2300.0,
            max_turn_rate: 5.5,
            base_height: 150.0,
            lateral_gain: 300.0,
            forward_accel_gain: 4.0,
            accel_unit_scale: 0.036,
            max_velocity_correction: 215.0,
            sample_window_secs: 0.5,
        }
    }
}

impl StabilizerTuning {
    /// Smoothing window length, clamped to 0.01-5 s
    pub fn sample_window(&self) -> Duration {
        clamped_secs(self.sample_window_secs, 0.01, 5.0, Duration::from_millis(500))
    }

    /// Full-speed divisor, never zero
    pub fn speed_scale(&self) -> f32 {
        finite_or(self.max_speed, 2300.0).max(1.0)
    }

    /// Full-lock yaw rate divisor, never zero
    pub fn turn_scale(&self) -> f32 {
        finite_or(self.max_turn_rate, 5.5).max(0.01)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Seconds as a `Duration`, clamped; NaN falls back to `fallback`
fn clamped_secs(secs: f32, min: f32, max: f32, fallback: Duration) -> Duration {
    Duration::try_from_secs_f32(secs.clamp(min, max)).unwrap_or(fallback)
}

/// Arena limits the trainer respects when moving the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaBounds {
    /// |y| at or beyond this is inside a goal
    pub goal_depth: f32,
    /// Corner of the box a held launch ball is kept inside
    pub hold_min: Vec3,
    pub hold_max: Vec3,
    /// Held ball sits this much closer than the max flick distance
    pub hold_inset: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            goal_depth: 5120.0,
            hold_min: Vec3::new(-4000.0, -5000.0, 100.0),
            hold_max: Vec3::new(4000.0, 5000.0, 1900.0),
            hold_inset: 150.0,
        }
    }
}

impl ArenaBounds {
    pub fn in_goal(&self, location: Vec3) -> bool {
        location.y.abs() >= self.goal_depth
    }

    /// Clamp into the hold box (tighter than the arena to stay off walls and corners)
    pub fn clamp_hold(&self, location: Vec3) -> Vec3 {
        location.clamp(self.hold_min, self.hold_max)
    }
}

/// Trainer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Reset ===
    /// Fraction of the ball's spin removed on reset (0.0 - 1.0)
    pub angular_reduction: f32,
    /// Extra height above the floor that still counts as a drop (dribble mode)
    pub floor_threshold: f32,
    /// Horizontal ball-car distance that ends a flick (flick mode)
    pub max_flick_distance: f32,

    // === Catch practice ===
    /// Countdown before a held ball is released (seconds)
    pub preparation_secs: f32,
    /// Launch speed range (uu/s)
    pub launch_speed: ValueRange,
    /// Launch elevation range (degrees above horizontal)
    pub launch_angle: ValueRange,

    // === Modes ===
    pub dribble_mode: bool,
    pub flick_mode: bool,

    // === Overlays ===
    pub show_safe_zone: bool,
    pub show_floor_height: bool,

    /// Log flick speeds at info level
    pub log_flick_speed: bool,

    pub stabilizer: StabilizerTuning,
    pub arena: ArenaBounds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            angular_reduction: 0.5,
            floor_threshold: 2.0,
            max_flick_distance: 1250.0,

            preparation_secs: 2.0,
            launch_speed: ValueRange::new(1500.0, 3500.0),
            launch_angle: ValueRange::new(15.0, 75.0),

            dribble_mode: false,
            flick_mode: false,

            show_safe_zone: true,
            show_floor_height: false,

            log_flick_speed: true,

            stabilizer: StabilizerTuning::default(),
            arena: ArenaBounds::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy with every value clamped into its legal range
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.angular_reduction = s.angular_reduction.clamp(0.0, 1.0);
        s.floor_threshold = s.floor_threshold.clamp(0.0, 100_000.0);
        s.max_flick_distance = s.max_flick_distance.clamp(300.0, 100_000.0);
        s.preparation_secs = s.preparation_secs.clamp(0.0, 20.0);
        s.launch_speed = s.launch_speed.clamped(0.0, 5000.0);
        s.launch_angle = s.launch_angle.clamped(10.0, 90.0);

        let t = &mut s.stabilizer;
        t.max_speed = t.max_speed.max(1.0);
        t.max_turn_rate = t.max_turn_rate.max(0.01);
        t.base_height = t.base_height.max(0.0);
        t.max_velocity_correction = t.max_velocity_correction.max(0.0);
        t.sample_window_secs = t.sample_window_secs.clamp(0.01, 5.0);

        let a = &mut s.arena;
        let (lo, hi) = (a.hold_min.min(a.hold_max), a.hold_min.max(a.hold_max));
        a.hold_min = lo;
        a.hold_max = hi;
        a.goal_depth = a.goal_depth.abs();
        s
    }

    /// Launch countdown length, clamped to 0-20 s
    pub fn preparation_duration(&self) -> Duration {
        clamped_secs(self.preparation_secs, 0.0, 20.0, Duration::from_secs(2))
    }

    pub fn mode_enabled(&self, mode: TrainingMode) -> bool {
        match mode {
            TrainingMode::Dribble => self.dribble_mode,
            TrainingMode::Flick => self.flick_mode,
        }
    }

    /// Flip a mode on/off, returns the new state
    pub fn toggle_mode(&mut self, mode: TrainingMode) -> bool {
        let flag = match mode {
            TrainingMode::Dribble => &mut self.dribble_mode,
            TrainingMode::Flick => &mut self.flick_mode,
        };
        *flag = !*flag;
        *flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_defaults_are_already_sane() {
        let s = Settings::default();
        let clamped = s.sanitized();
        assert_eq!(s.angular_reduction, clamped.angular_reduction);
        assert_eq!(s.max_flick_distance, clamped.max_flick_distance);
        assert_eq!(s.launch_speed, clamped.launch_speed);
    }

    #[test]
    fn test_consumed_values_clamped_without_sanitize() {
        let mut s = Settings::default();
        s.preparation_secs = -1.0;
        s.stabilizer.sample_window_secs = f32::NAN;
        s.stabilizer.max_speed = 0.0;
        s.stabilizer.max_turn_rate = -3.0;
        assert_eq!(s.preparation_duration(), Duration::ZERO);
        assert_eq!(s.stabilizer.sample_window(), Duration::from_millis(500));
        assert_eq!(s.stabilizer.speed_scale(), 1.0);
        assert_eq!(s.stabilizer.turn_scale(), 0.01);

        s.preparation_secs = 90.0;
        s.stabilizer.sample_window_secs = 0.25;
        assert_eq!(s.preparation_duration(), Duration::from_secs(20));
        assert_eq!(s.stabilizer.sample_window(), Duration::from_millis(250));
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut s = Settings::default();
        s.angular_reduction = 3.0;
        s.floor_threshold = -10.0;
        s.max_flick_distance = 10.0;
        s.launch_angle = ValueRange::new(120.0, 0.0);
        let s = s.sanitized();
        assert_eq!(s.angular_reduction, 1.0);
        assert_eq!(s.floor_threshold, 0.0);
        assert_eq!(s.max_flick_distance, 300.0);
        assert_eq!(s.launch_angle, ValueRange::new(10.0, 90.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "flick_mode": true, "angular_reduction": 2.0 }"#).unwrap();
        assert!(s.flick_mode);
        assert!(!s.dribble_mode);
        assert_eq!(s.angular_reduction, 1.0);
        assert_eq!(s.stabilizer.base_height, 150.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_toggle_mode() {
        let mut s = Settings::default();
        assert!(s.toggle_mode(TrainingMode::Dribble));
        assert!(s.mode_enabled(TrainingMode::Dribble));
        assert!(!s.toggle_mode(TrainingMode::Dribble));
        assert_eq!(TrainingMode::from_str("FLICK"), Some(TrainingMode::Flick));
        assert_eq!(TrainingMode::from_str("catch"), None);
    }

    #[test]
    fn test_range_sample_stays_inside() {
        let mut rng = Pcg32::seed_from_u64(7);
        let range = ValueRange::new(1500.0, 3500.0);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((1500.0..=3500.0).contains(&v));
        }
        assert_eq!(ValueRange::new(42.0, 42.0).sample(&mut rng), 42.0);
    }

    #[test]
    fn test_goal_and_hold_box() {
        let arena = ArenaBounds::default();
        assert!(arena.in_goal(Vec3::new(0.0, -5120.0, 17.0)));
        assert!(!arena.in_goal(Vec3::new(0.0, 5119.0, 17.0)));
        let held = arena.clamp_hold(Vec3::new(9000.0, -6000.0, 20.0));
        assert_eq!(held, Vec3::new(4000.0, -5000.0, 100.0));
    }
}
