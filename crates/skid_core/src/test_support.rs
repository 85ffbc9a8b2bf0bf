//! Shared fixtures for unit tests

use nalgebra::{UnitQuaternion, Vector3};
use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::AudioDevice;
use crate::kinematics::{BodyKinematics, FrameClock, FrameInput, GroundContact, WheelKinematics};
use crate::surface::SurfaceKind;

pub const RADIUS: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCall {
    Play,
    Stop,
    SetVolume(f32),
    Disposed,
}

pub type AudioLog = Rc<RefCell<Vec<AudioCall>>>;

/// Audio device that records every call, including its own drop
pub struct RecordingAudio {
    log: AudioLog,
}

impl RecordingAudio {
    pub fn new() -> (Self, AudioLog) {
        let log: AudioLog = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl AudioDevice for RecordingAudio {
    fn play(&mut self) {
        self.log.borrow_mut().push(AudioCall::Play);
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(AudioCall::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().push(AudioCall::SetVolume(volume));
    }
}

impl Drop for RecordingAudio {
    fn drop(&mut self) {
        self.log.borrow_mut().push(AudioCall::Disposed);
    }
}

pub fn rpm_for_surface_speed(speed: f32) -> f32 {
    speed / RADIUS * 60.0 / (2.0 * std::f32::consts::PI)
}

pub fn contact_at(point: Vector3<f32>, surface: SurfaceKind) -> GroundContact {
    GroundContact {
        point,
        normal: Vector3::y(),
        surface,
    }
}

/// Grounded wheel on asphalt, wheel frame aligned with world axes
pub fn grounded(velocity: Vector3<f32>, rpm: f32, point: Vector3<f32>, now: f32) -> FrameInput {
    FrameInput {
        wheel: WheelKinematics::grounded(contact_at(point, SurfaceKind::Asphalt), RADIUS, rpm),
        body: BodyKinematics::new(velocity, UnitQuaternion::identity()),
        clock: FrameClock::running(now),
    }
}

/// Pure sideways slide at `lateral` m/s with a stopped wheel
pub fn sliding(lateral: f32, point: Vector3<f32>, now: f32) -> FrameInput {
    grounded(Vector3::new(lateral, 0.0, 0.0), 0.0, point, now)
}

pub fn airborne(velocity: Vector3<f32>, now: f32) -> FrameInput {
    FrameInput {
        wheel: WheelKinematics::airborne(RADIUS, 0.0),
        body: BodyKinematics::new(velocity, UnitQuaternion::identity()),
        clock: FrameClock::running(now),
    }
}
