//! Trainer simulation
//!
//! Everything that runs inside the per-frame callback:
//! - Stabilization controller (where a reset should put the ball)
//! - Reset actuator and the breach checks that trigger it
//! - Launch sequencer with generation-stamped deferred release
//! - The session that threads them together each frame
//!
//! Single-threaded and frame-driven. Randomness comes from a seeded RNG only.

pub mod actuator;
pub mod controller;
pub mod launch;
pub mod state;
pub mod tick;
pub mod timer;

pub use actuator::{ResetCause, apply_reset, distance_breached, floor_breached};
pub use controller::{ControllerState, KinematicInput, ResetSample, SampleWindow, estimate_target};
pub use launch::LaunchState;
pub use state::SessionContext;
pub use tick::TickReport;
pub use timer::{DeferredTask, FrameTimer};
