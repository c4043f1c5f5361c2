//! Dribble Trainer headless demo
//!
//! Drives a scripted session against the headless world: a straight drive,
//! a right turn, then a launch. Run with `RUST_LOG=debug` for more detail.

use std::time::Duration;

use glam::{Vec2, Vec3};

use dribble_trainer::host::{HeadlessWorld, RecordingCanvas};
use dribble_trainer::{SessionContext, Settings, TrainingMode};

const TICK_RATE: u32 = 60;
const SESSION_SECS: u32 = 9;
const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

/// Script phase for a given frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Drive,
    Turn,
    Catch,
}

fn phase_at(seconds: f32) -> Phase {
    if seconds < 3.0 {
        Phase::Drive
    } else if seconds < 5.0 {
        Phase::Turn
    } else {
        Phase::Catch
    }
}

fn main() {
    env_logger::init();
    log::info!("Dribble Trainer (headless) starting...");

    let seed = 0x5eed;
    let mut session = SessionContext::new(Settings::default(), seed);
    session.toggle_mode(TrainingMode::Dribble);

    let mut world = HeadlessWorld::kickoff();
    let dt = Duration::from_secs(1) / TICK_RATE;
    let mut now = Duration::ZERO;
    let mut phase = Phase::Drive;
    let mut resets = 0;
    let mut releases = 0;

    for frame in 0..TICK_RATE * SESSION_SECS {
        now += dt;
        let next = phase_at(now.as_secs_f32());
        if next != phase {
            log::info!("{:?} -> {:?}", phase, next);
            phase = next;
            if phase == Phase::Catch {
                // Same path as a host "toggle <mode>" command
                session.request_toggle("dribble");
                session.request_toggle("flick");
                session.request_launch(&world, now);
            }
        }

        if let Some(car) = &mut world.vehicle {
            let forward = car.body.basis().forward;
            match phase {
                Phase::Drive => {
                    // Accelerate toward 1400 uu/s
                    let speed = car.body.velocity.length() + 600.0 * dt.as_secs_f32();
                    car.body.velocity = forward * speed.min(1400.0);
                }
                Phase::Turn => car.body.angular_velocity = Vec3::new(0.0, 0.0, 2.0),
                Phase::Catch => {
                    car.body.angular_velocity = Vec3::ZERO;
                    car.body.velocity *= 0.98;
                }
            }
        }
        // Chase camera
        if let (Some(camera), Some(car)) = (&mut world.camera, &world.vehicle) {
            let behind = car.body.basis().forward * -280.0;
            camera.location = car.body.location + behind + Vec3::Z * 100.0;
            camera.rotation = car.body.rotation;
        }

        world.step(dt.as_secs_f32());
        let report = session.tick(&mut world, now);
        if report.reset.is_some() {
            resets += 1;
        }
        if report.released {
            releases += 1;
        }
        if let Some(kph) = report.flick_speed_kph {
            println!("Flick at {:.1} km/h", kph);
        }

        if frame % TICK_RATE == 0 {
            let mut canvas = RecordingCanvas::new(VIEWPORT, world.camera);
            let overlays = session.render(&world, &mut canvas, now);
            log::info!(
                "t={:.1}s {:?}: offset {:.1?}, {} overlays, {} lines",
                now.as_secs_f32(),
                phase,
                session.controller.target_offset,
                overlays,
                canvas.line_count()
            );
        }
    }

    println!(
        "\nSession done: {} resets, {} launches released",
        resets, releases
    );
}
