//! Guidance renderer
//!
//! Each overlay decides for itself whether it is enabled this frame and draws
//! through the host `Canvas`. The renderer just walks the list with one shared
//! frame context.

pub mod overlays;
pub mod shapes;

pub use overlays::{FloorRings, GuideLine, LaunchCountdown, ModeStatus, SafeZone};
pub use shapes::{Circle, draw_sphere_outline, draw_vector};

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::host::{BallSnapshot, Canvas, VehicleSnapshot};
use crate::settings::Settings;
use crate::sim::{ControllerState, LaunchState};
use crate::visibility::{Camera, Frustum};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha from a float (clamped to 0-255)
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// Red at 0, yellow at 0.5, green at 1
    pub fn from_percentage(percent: f32, alpha: u8) -> Self {
        let p = percent.clamp(0.0, 1.0);
        let (r, g) = if p < 0.5 {
            (1.0, p * 2.0)
        } else {
            (1.0 - (p - 0.5) * 2.0, 1.0)
        };
        Self::new((r * 255.0).round() as u8, (g * 255.0).round() as u8, 0, alpha)
    }
}

/// Everything an overlay may read this frame
pub struct FrameContext<'a> {
    pub settings: &'a Settings,
    pub controller: &'a ControllerState,
    pub launch: &'a LaunchState,
    pub vehicle: Option<VehicleSnapshot>,
    pub ball: Option<BallSnapshot>,
    pub camera: Camera,
    pub frustum: Frustum,
    pub now: Duration,
}

/// One independently toggled layer of the overlay
pub trait Overlay {
    fn name(&self) -> &'static str;
    fn enabled(&self, frame: &FrameContext) -> bool;
    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas);
}

pub struct GuidanceRenderer {
    overlays: Vec<Box<dyn Overlay>>,
}

impl Default for GuidanceRenderer {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ModeStatus),
            Box::new(FloorRings),
            Box::new(SafeZone),
            Box::new(GuideLine),
            Box::new(LaunchCountdown),
        ])
    }
}

impl fmt::Debug for GuidanceRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.overlays.iter().map(|o| o.name()))
            .finish()
    }
}

impl GuidanceRenderer {
    pub fn new(overlays: Vec<Box<dyn Overlay>>) -> Self {
        Self { overlays }
    }

    /// Draw every enabled overlay, returns how many ran
    pub fn render(&self, frame: &FrameContext, canvas: &mut dyn Canvas) -> usize {
        let mut drawn = 0;
        for overlay in &self.overlays {
            if overlay.enabled(frame) {
                overlay.draw(frame, canvas);
                drawn += 1;
            }
        }
        drawn
    }
}
