//! Per-frame session update
//!
//! Order inside one frame: controller, due timers, breach checks, launch hold.

use std::time::Duration;

use super::actuator::{ResetCause, apply_reset, distance_breached, floor_breached};
use super::controller::KinematicInput;
use super::launch::{hold_ball, release};
use super::state::SessionContext;
use super::timer::DeferredTask;
use crate::consts::UU_TO_KPH;
use crate::host::{Canvas, World};
use crate::renderer::FrameContext;
use crate::visibility::Frustum;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Car or ball missing, nothing ran
    pub skipped: bool,
    pub reset: Option<ResetCause>,
    /// A launch was released this frame
    pub released: bool,
    /// Ball speed when it left flick range
    pub flick_speed_kph: Option<f32>,
}

impl TickReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

impl SessionContext {
    /// Run one frame at `now` (time since session start)
    pub fn tick<W: World + ?Sized>(&mut self, world: &mut W, now: Duration) -> TickReport {
        let (Some(vehicle), Some(ball)) = (world.vehicle(), world.ball()) else {
            return TickReport::skipped();
        };
        let mut report = TickReport::default();

        self.controller.update(
            &KinematicInput::new(&vehicle, &ball),
            &self.settings.stabilizer,
            now,
        );

        for task in self.timer.take_due(now) {
            match task {
                DeferredTask::ReleaseLaunch { generation } => {
                    report.released |= self.release_launch(world, generation);
                }
            }
        }

        if self.launch.is_preparing {
            hold_ball(world, &self.launch, &vehicle, &self.settings);
            return report;
        }

        let settings = &self.settings;
        let cause = if settings.dribble_mode && floor_breached(&ball, settings.floor_threshold) {
            Some(ResetCause::FloorBreach)
        } else if settings.flick_mode
            && distance_breached(&ball, &vehicle, settings.max_flick_distance)
        {
            let arena = &settings.arena;
            if !arena.in_goal(ball.body.location) && !arena.in_goal(vehicle.body.location) {
                let kph = ball.body.velocity.length() * UU_TO_KPH;
                if settings.log_flick_speed {
                    log::info!("Flick speed: {:.1} km/h", kph);
                }
                report.flick_speed_kph = Some(kph);
            }
            Some(ResetCause::DistanceBreach)
        } else {
            None
        };

        if let Some(cause) = cause {
            if apply_reset(world, &self.controller, &self.settings) {
                log::debug!("Ball reset ({:?})", cause);
                report.reset = Some(cause);
            }
        }
        report
    }

    /// Explicit reset request
    pub fn reset<W: World + ?Sized>(&mut self, world: &mut W) -> bool {
        let done = apply_reset(world, &self.controller, &self.settings);
        if done {
            log::debug!("Ball reset ({:?})", ResetCause::Requested);
        }
        done
    }

    /// Start a launch countdown; the release is scheduled for `preparation_secs` later.
    ///
    /// Returns the launch generation, or `None` when there is no car.
    pub fn request_launch<W: World + ?Sized>(&mut self, world: &W, now: Duration) -> Option<u64> {
        world.vehicle()?;
        let generation = self.launch.begin(&self.settings, &mut self.rng, now);
        let delay = self.settings.preparation_duration();
        self.timer
            .schedule_after(now, delay, DeferredTask::ReleaseLaunch { generation });
        log::info!(
            "Launch {} requested: {:.0} uu/s in {:.1}s",
            generation,
            self.launch.launch_speed(),
            delay.as_secs_f32()
        );
        Some(generation)
    }

    /// Deferred release; no-op unless `generation` is the latest launch
    pub fn release_launch<W: World + ?Sized>(&mut self, world: &mut W, generation: u64) -> bool {
        release(world, &mut self.launch, generation)
    }

    /// Draw the enabled overlays; returns how many ran (0 without a camera)
    pub fn render<W: World + ?Sized>(
        &self,
        world: &W,
        canvas: &mut dyn Canvas,
        now: Duration,
    ) -> usize {
        let Some(camera) = world.camera() else {
            return 0;
        };
        let frame = FrameContext {
            settings: &self.settings,
            controller: &self.controller,
            launch: &self.launch,
            vehicle: world.vehicle(),
            ball: world.ball(),
            camera,
            frustum: Frustum::new(&camera, canvas.viewport_size()),
            now,
        };
        self.renderer.render(&frame, canvas)
    }
}
