//! The individual guidance overlays

use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};

use super::shapes::{Circle, draw_sphere_outline, draw_vector};
use super::{FrameContext, Overlay, Rgba};
use crate::geometry::{Basis, Sphere, with_z};
use crate::host::Canvas;
use crate::visibility::clip_guide_line;

const RING_COLOR: Rgba = Rgba::new(150, 150, 255, 255);
const RING_COUNT: usize = 4;
const RING_RADIUS: f32 = 100.0;
const RING_STEPS: u32 = 24;

const RESET_SPHERE_COLOR: Rgba = Rgba::new(0, 255, 0, 50);
const VELOCITY_COLOR: Rgba = Rgba::new(0, 100, 255, 255);
const CAR_MARKER_COLOR: Rgba = Rgba::new(0, 255, 0, 100);

/// Straight segment between two world points, no visibility check
fn draw_world_line(canvas: &mut dyn Canvas, start: Vec3, end: Vec3, thickness: f32) {
    let (a, b) = (canvas.project(start), canvas.project(end));
    canvas.draw_line(a, b, thickness);
}

/// "Dribble: ON" / "Flick: OFF" at the bottom of the screen
pub struct ModeStatus;

impl ModeStatus {
    pub fn label(name: &str, on: bool) -> String {
        format!("{}: {}", name, if on { "ON" } else { "OFF" })
    }
}

impl Overlay for ModeStatus {
    fn name(&self) -> &'static str {
        "mode_status"
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.settings.dribble_mode || frame.settings.flick_mode
    }

    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas) {
        let size = canvas.viewport_size();
        let base = Vec2::new(size.x * 0.5, size.y - 30.0);
        canvas.set_color(Rgba::WHITE);
        canvas.draw_string(
            base - Vec2::new(90.0, 0.0),
            &Self::label("Dribble", frame.settings.dribble_mode),
        );
        canvas.draw_string(
            base + Vec2::new(30.0, 0.0),
            &Self::label("Flick", frame.settings.flick_mode),
        );
    }
}

/// Stacked rings under the car showing the dribble floor threshold
pub struct FloorRings;

impl Overlay for FloorRings {
    fn name(&self) -> &'static str {
        "floor_rings"
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.settings.show_floor_height && frame.vehicle.is_some()
    }

    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas) {
        let Some(vehicle) = &frame.vehicle else {
            return;
        };
        let threshold = frame.settings.floor_threshold;
        let height_step = threshold / 3.0;
        let top = with_z(vehicle.body.location, threshold);

        // Ring style carries over between iterations
        let mut color = RING_COLOR;
        let mut thickness = 3.0;
        for i in 0..RING_COUNT {
            let fi = i as f32;

            let mut ring = Circle::new(top, Quat::IDENTITY, RING_RADIUS - 8.0 * fi);
            ring.steps = RING_STEPS;
            ring.thickness = thickness;
            canvas.set_color(color);
            ring.draw(canvas, &frame.frustum);

            color = RING_COLOR.with_alpha(255.0 / ((fi + 1.0) / 2.0));
            thickness = 3.0 / (fi + 1.0);
            if i != 0 {
                let lower_at = with_z(top, threshold - height_step * fi);
                let mut lower = Circle::new(lower_at, Quat::IDENTITY, RING_RADIUS);
                lower.steps = RING_STEPS;
                lower.thickness = thickness;
                canvas.set_color(color);
                lower.draw(canvas, &frame.frustum);
            }
        }
    }
}

/// Where the next reset will put the ball, and the car's reference marks
pub struct SafeZone;

impl Overlay for SafeZone {
    fn name(&self) -> &'static str {
        "safe_zone"
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.settings.show_safe_zone && frame.vehicle.is_some() && frame.ball.is_some()
    }

    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas) {
        let (Some(vehicle), Some(ball)) = (&frame.vehicle, &frame.ball) else {
            return;
        };
        let car = &vehicle.body;
        let basis = car.basis();

        canvas.set_color(Rgba::GREEN);
        for axis in [basis.forward, -basis.forward, basis.right, -basis.right] {
            let (near, far) = (car.location + axis * 5.0, car.location + axis * 50.0);
            if frame.frustum.contains(near, 0.0) && frame.frustum.contains(far, 0.0) {
                draw_world_line(canvas, near, far, 2.0);
            }
        }

        let target = car.location + frame.controller.target_offset;
        canvas.set_color(RESET_SPHERE_COLOR);
        draw_sphere_outline(
            canvas,
            &frame.frustum,
            &Sphere::new(target, ball.radius),
            frame.camera.location,
            64,
        );

        let adjust = frame.controller.target_velocity_adjust;
        canvas.set_color(VELOCITY_COLOR);
        if draw_vector(canvas, &frame.frustum, target, adjust) {
            let label_at = canvas.project(target) - Vec2::new(20.0, 20.0);
            canvas.draw_string(label_at, &format!("{:.0}", adjust.length()));
        }

        let mut marker = Circle::new(car.location, car.rotation, 20.0);
        marker.thickness = 3.0;
        canvas.set_color(CAR_MARKER_COLOR);
        marker.draw(canvas, &frame.frustum);
    }
}

/// Crosshair on the ground under the ball plus the visible vertical line up to it
pub struct GuideLine;

impl Overlay for GuideLine {
    fn name(&self) -> &'static str {
        "guide_line"
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.settings.show_safe_zone && frame.vehicle.is_some() && frame.ball.is_some()
    }

    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas) {
        let (Some(vehicle), Some(ball)) = (&frame.vehicle, &frame.ball) else {
            return;
        };
        let car = &vehicle.body;
        let ground = with_z(ball.body.location, car.location.z);
        if !frame.frustum.contains(ground, 5.0) {
            return;
        }

        let basis = Basis::yaw_aligned(car.basis().forward);
        canvas.set_color(Rgba::WHITE);
        for axis in [basis.forward, basis.right] {
            draw_world_line(canvas, ground - axis * 20.0, ground + axis * 20.0, 1.0);
        }
        let mut dot = Circle::new(ground, basis.to_quat(), 4.0);
        dot.steps = 8;
        dot.draw(canvas, &frame.frustum);

        if let Some(line) = clip_guide_line(
            &ball.sphere(),
            ground,
            frame.camera.location,
            &frame.frustum,
        ) {
            draw_world_line(canvas, line.start, line.end, 1.0);
        }
    }
}

/// Pie around the held ball counting down to the launch, colored by launch speed
pub struct LaunchCountdown;

impl Overlay for LaunchCountdown {
    fn name(&self) -> &'static str {
        "launch_countdown"
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.launch.is_preparing && frame.ball.is_some()
    }

    fn draw(&self, frame: &FrameContext, canvas: &mut dyn Canvas) {
        let Some(ball) = &frame.ball else {
            return;
        };
        let location = ball.body.location;
        let preparation = frame.settings.preparation_duration().as_secs_f32();
        let sweep = frame.launch.countdown_remaining(frame.now, preparation);
        let apparent = frame.frustum.apparent_size(location, ball.radius);

        let orientation =
            Basis::look_at(location, frame.camera.location, PI - PI * sweep).to_quat();
        let mut pie = Circle::new(location, orientation, ball.radius);
        pie.thickness = 4.0;
        pie.sweep = sweep;
        pie.steps = (40.0 * apparent).max(8.0) as u32;

        canvas.set_color(Rgba::from_percentage(1.0 - frame.launch.launch_magnitude, 255));
        pie.draw(canvas, &frame.frustum);
    }
}
