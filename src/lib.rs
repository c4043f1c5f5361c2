//! Dribble Trainer - ball-on-car balance guide
//!
//! Core modules:
//! - `geometry`: Vector/orientation algebra, planes, lines, spheres
//! - `visibility`: Frustum, occlusion and guide-line clipping
//! - `sim`: Stabilization controller, reset actuator, launch sequencer, session
//! - `renderer`: Overlays drawn through the host canvas
//! - `host`: World/Canvas traits plus a headless implementation
//! - `settings`: Options and tuning constants

pub mod geometry;
pub mod host;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod visibility;

pub use settings::{Settings, SettingsError, TrainingMode};
pub use sim::{SessionContext, TickReport};

/// Trainer constants
pub mod consts {
    /// Standard ball radius (uu)
    pub const BALL_RADIUS: f32 = 92.75;
    /// World gravity (uu/s²), only used by the headless world
    pub const GRAVITY_Z: f32 = -650.0;

    /// Launch speeds are stored as a fraction of this
    pub const LAUNCH_SPEED_SCALE: f32 = 5000.0;
    /// uu/s -> km/h
    pub const UU_TO_KPH: f32 = 0.036;
}
