//! Session state
//!
//! One `SessionContext` per training session. It is created when the session
//! starts, dropped when it ends, and owns everything that lives between frames.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::controller::ControllerState;
use super::launch::LaunchState;
use super::timer::FrameTimer;
use crate::renderer::GuidanceRenderer;
use crate::settings::{Settings, TrainingMode};

#[derive(Debug)]
pub struct SessionContext {
    pub settings: Settings,
    pub controller: ControllerState,
    pub launch: LaunchState,
    pub(super) timer: FrameTimer,
    pub(super) rng: Pcg32,
    pub(super) renderer: GuidanceRenderer,
}

impl SessionContext {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let controller = ControllerState::new(&settings.stabilizer);
        log::debug!("Session started (seed {})", seed);
        Self {
            settings,
            controller,
            launch: LaunchState::default(),
            timer: FrameTimer::new(),
            rng: Pcg32::seed_from_u64(seed),
            renderer: GuidanceRenderer::default(),
        }
    }

    /// Replace the settings (clamped); controller history is kept
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }

    /// Flip a training mode, returns the new state
    pub fn toggle_mode(&mut self, mode: TrainingMode) -> bool {
        let on = self.settings.toggle_mode(mode);
        log::info!("{} mode {}", mode.as_str(), if on { "on" } else { "off" });
        on
    }

    /// Toggle a mode by name ("dribble", "flick"); `None` for an unknown name
    pub fn request_toggle(&mut self, name: &str) -> Option<bool> {
        let Some(mode) = TrainingMode::from_str(name) else {
            log::debug!("Unknown training mode '{}'", name);
            return None;
        };
        Some(self.toggle_mode(mode))
    }

    /// Number of deferred tasks still waiting
    pub fn pending_tasks(&self) -> usize {
        self.timer.pending_count()
    }
}
