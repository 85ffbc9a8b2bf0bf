//! Skid signal math
//!
//! The skid signal is the sum of two components:
//! - lateral slip: sideways body speed in the wheel's frame (cornering skids)
//! - wheelspin: mismatch between tread speed and forward body speed, faded
//!   out as forward speed grows
//!
//! Everything here is pure; state and side effects live in
//! [`crate::wheel_skid`].

use serde::{Deserialize, Serialize};

use crate::config::{SignalConfig, SpinFade};
use crate::kinematics::{BodyKinematics, WheelKinematics};

/// Components of one frame's skid signal (m/s)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkidSignal {
    pub lateral: f32,
    /// Wheelspin after fading
    pub spin: f32,
    pub total: f32,
}

impl SkidSignal {
    pub fn new(lateral: f32, spin: f32) -> Self {
        Self {
            lateral,
            spin,
            total: lateral + spin,
        }
    }

    /// Whether the signal is strong enough to draw a skid mark
    pub fn is_active(&self, cfg: &SignalConfig) -> bool {
        self.total >= cfg.skid_fx_speed
    }
}

pub fn lateral_slip(body: &BodyKinematics) -> f32 {
    body.local_velocity().x.abs()
}

/// Raw wheelspin mismatch, before fading
pub fn spin_mismatch(forward_speed: f32, surface_speed: f32, multiplier: f32) -> f32 {
    (forward_speed - surface_speed).abs() * multiplier
}

pub fn fade_spin(spin: f32, forward_speed: f32, fade: SpinFade) -> f32 {
    match fade {
        SpinFade::Linear { fade_out_speed } => {
            (spin * (fade_out_speed - forward_speed.abs())).max(0.0)
        }
        SpinFade::Off => spin,
    }
}

pub fn skid_signal(
    wheel: &WheelKinematics,
    body: &BodyKinematics,
    cfg: &SignalConfig,
) -> SkidSignal {
    let lateral = lateral_slip(body);
    let forward = body.forward_speed();
    let mismatch = spin_mismatch(forward, wheel.surface_speed(), cfg.wheel_slip_multiplier);
    SkidSignal::new(lateral, fade_spin(mismatch, forward, cfg.spin_fade))
}

/// Normalised intensity in [0, 1]
pub fn intensity(total: f32, max_skid_intensity: f32) -> f32 {
    (total / max_skid_intensity).clamp(0.0, 1.0)
}
