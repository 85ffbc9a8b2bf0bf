//! Per-frame kinematic inputs
//!
//! Axis convention for the wheel's local frame: +Z rolls forward, +X points
//! sideways, +Y is up.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::physics_constants::signal::RPM_TO_RAD_PER_SEC;
use crate::surface::SurfaceKind;

/// Where the wheel touches the ground this physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    pub point: Vector3<f32>,
    /// Unit normal of the ground at `point`
    pub normal: Vector3<f32>,
    pub surface: SurfaceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelKinematics {
    /// `None` while airborne
    pub contact: Option<GroundContact>,
    /// Wheel radius (m)
    pub radius: f32,
    /// Angular speed (revolutions per minute)
    pub rpm: f32,
}

impl WheelKinematics {
    pub fn airborne(radius: f32, rpm: f32) -> Self {
        Self {
            contact: None,
            radius,
            rpm,
        }
    }

    pub fn grounded(contact: GroundContact, radius: f32, rpm: f32) -> Self {
        Self {
            contact: Some(contact),
            radius,
            rpm,
        }
    }

    /// Linear speed of the tread (m/s)
    pub fn surface_speed(&self) -> f32 {
        self.radius * self.rpm * RPM_TO_RAD_PER_SEC
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyKinematics {
    /// Rigid-body linear velocity in world space (m/s)
    pub velocity: Vector3<f32>,
    /// Wheel local -> world rotation (includes steering)
    pub wheel_orientation: UnitQuaternion<f32>,
}

impl BodyKinematics {
    pub fn new(velocity: Vector3<f32>, wheel_orientation: UnitQuaternion<f32>) -> Self {
        Self {
            velocity,
            wheel_orientation,
        }
    }

    /// Velocity expressed in the wheel's local frame
    pub fn local_velocity(&self) -> Vector3<f32> {
        self.wheel_orientation.inverse_transform_vector(&self.velocity)
    }

    /// The wheel's rolling direction in world space
    pub fn forward(&self) -> Vector3<f32> {
        self.wheel_orientation.transform_vector(&Vector3::z())
    }

    /// Body speed along the rolling direction (signed)
    pub fn forward_speed(&self) -> f32 {
        self.velocity.dot(&self.forward())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

/// Simulation time for the frame being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Simulation seconds
    pub now: f32,
    /// 0 while paused
    pub time_scale: f32,
}

impl FrameClock {
    pub fn running(now: f32) -> Self {
        Self {
            now,
            time_scale: 1.0,
        }
    }

    pub fn paused(now: f32) -> Self {
        Self {
            now,
            time_scale: 0.0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.time_scale <= 0.0
    }
}

/// Everything one wheel needs for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub wheel: WheelKinematics,
    pub body: BodyKinematics,
    pub clock: FrameClock,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_surface_speed_from_rpm() {
        // 60 rpm = 1 rev/s = 2π rad/s; radius 0.5 -> π m/s
        let wheel = WheelKinematics::airborne(0.5, 60.0);
        assert!((wheel.surface_speed() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_identity_orientation_splits_axes() {
        let body = BodyKinematics::new(Vector3::new(3.0, 0.0, 4.0), UnitQuaternion::identity());
        let local = body.local_velocity();
        assert!((local.x - 3.0).abs() < 1e-6);
        assert!((local.z - 4.0).abs() < 1e-6);
        assert!((body.forward_speed() - 4.0).abs() < 1e-6);
        assert!((body.speed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_steered_wheel_sees_forward_motion_as_sideways() {
        // Wheel yawed 90° about +Y: its forward is world +X
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let body = BodyKinematics::new(Vector3::new(0.0, 0.0, 6.0), yaw);
        let local = body.local_velocity();
        assert!((local.x.abs() - 6.0).abs() < 1e-4);
        assert!(local.z.abs() < 1e-4);
        assert!(body.forward_speed().abs() < 1e-4);
    }

    #[test]
    fn test_clock_pause() {
        assert!(FrameClock::paused(1.0).is_paused());
        assert!(!FrameClock::running(1.0).is_paused());
    }
}
