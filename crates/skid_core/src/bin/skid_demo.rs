// Scripted corner slide: four wheels sharing one skid-mark recorder
// Run with: cargo run --bin skid_demo [arcade|simulation]

use anyhow::{Context, Result};
use nalgebra::{UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use skid_core::{
    AudioDevice, AudioTransition, BodyKinematics, FrameClock, FrameInput, GroundContact,
    MemoryTrailRecorder, RaceId, RaceSession, SkidConfig, SurfaceKind, SurfacePolicy,
    WheelKinematics, WheelSkid,
};
use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

const FRAME_DT: f32 = 1.0 / 60.0;
const PHYSICS_DT: f32 = 1.0 / 50.0;
const DURATION_SEC: f32 = 4.0;
const WHEEL_RADIUS: f32 = 0.34;
const SEED: u64 = 42;

/// Prints device commands instead of playing sound
struct ConsoleAudio {
    wheel: &'static str,
}

impl ConsoleAudio {
    fn emit(&self, command: &str, volume: Option<f32>) {
        println!("{}", json!({ "wheel": self.wheel, "audio": command, "volume": volume }));
    }
}

impl AudioDevice for ConsoleAudio {
    fn play(&mut self) {
        self.emit("play", None);
    }

    fn stop(&mut self) {
        self.emit("stop", None);
    }

    fn set_volume(&mut self, volume: f32) {
        self.emit("set_volume", Some(volume));
    }
}

impl Drop for ConsoleAudio {
    fn drop(&mut self) {
        self.emit("dispose", None);
    }
}

struct WheelMount {
    name: &'static str,
    /// Offset from the body origin in body space
    offset: Vector3<f32>,
    steers: bool,
}

fn mounts() -> [WheelMount; 4] {
    [
        WheelMount {
            name: "front_left",
            offset: Vector3::new(-0.8, 0.0, 1.3),
            steers: true,
        },
        WheelMount {
            name: "front_right",
            offset: Vector3::new(0.8, 0.0, 1.3),
            steers: true,
        },
        WheelMount {
            name: "rear_left",
            offset: Vector3::new(-0.8, 0.0, -1.3),
            steers: false,
        },
        WheelMount {
            name: "rear_right",
            offset: Vector3::new(0.8, 0.0, -1.3),
            steers: false,
        },
    ]
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(profile) => SkidConfig::from_profile(&profile),
        None => SkidConfig::from_env_or_default(),
    };
    config.validate().context("invalid skid profile")?;

    let mut session = RaceSession::new(RaceId(1));
    let mut trail = MemoryTrailRecorder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    let mounts = mounts();
    let mut wheels = Vec::with_capacity(mounts.len());
    for mount in &mounts {
        let audio = ConsoleAudio { wheel: mount.name };
        let wheel = WheelSkid::new(config.clone(), audio, SurfacePolicy::default(), 0.0)
            .with_context(|| format!("creating {}", mount.name))?
            .with_label(mount.name);
        let wheel = Rc::new(RefCell::new(wheel));
        WheelSkid::attach(&wheel, session.events_mut());
        wheels.push((mount, wheel));
    }

    let mut position = Vector3::<f32>::zeros();
    let mut heading = 0.0f32;
    let mut travel = 0.0f32;
    let mut speed = 16.0f32;
    let mut now = 0.0f32;
    let mut next_physics = 0.0f32;

    while now < DURATION_SEC {
        while next_physics <= now {
            for (_, wheel) in &wheels {
                wheel.borrow_mut().on_physics_step(next_physics);
            }
            next_physics += PHYSICS_DT;
        }

        // The body yaws into the corner faster than its velocity follows
        let steer = if (0.5..2.5).contains(&now) { 0.35 } else { 0.0 };
        heading += steer * 3.0 * FRAME_DT;
        travel += (heading - travel) * 1.5 * FRAME_DT;
        speed = (speed - 2.0 * FRAME_DT).max(0.0);

        let velocity = Vector3::new(travel.sin(), 0.0, travel.cos()) * speed;
        position += velocity * FRAME_DT;
        let body_rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), heading);

        for (mount, wheel) in &wheels {
            let steer_rotation = if mount.steers {
                UnitQuaternion::from_axis_angle(&Vector3::y_axis(), steer)
            } else {
                UnitQuaternion::identity()
            };
            // Rear wheels are driven and slip a little under throttle
            let tread = if mount.steers {
                speed
            } else {
                speed + rng.gen_range(0.0f32..0.6)
            };

            let input = FrameInput {
                wheel: WheelKinematics::grounded(
                    GroundContact {
                        point: position + body_rotation * mount.offset,
                        normal: Vector3::y(),
                        surface: SurfaceKind::Asphalt,
                    },
                    WHEEL_RADIUS,
                    tread / WHEEL_RADIUS * 60.0 / TAU,
                ),
                body: BodyKinematics::new(velocity, body_rotation * steer_rotation),
                clock: FrameClock::running(now),
            };

            let Some(sample) = wheel.borrow_mut().evaluate(&input, &mut trail) else {
                continue;
            };
            if sample.segment.is_some() || sample.audio != AudioTransition::None {
                println!(
                    "{}",
                    json!({ "t": now, "wheel": mount.name, "sample": sample })
                );
            }
        }

        now += FRAME_DT;
    }

    let notified = session.finish();
    let retired = wheels
        .iter()
        .filter(|(_, wheel)| wheel.borrow().is_retired())
        .count();
    println!(
        "{}",
        json!({
            "summary": {
                "skid_marks": trail.len(),
                "listeners_notified": notified,
                "wheels_retired": retired,
            }
        })
    );

    Ok(())
}
