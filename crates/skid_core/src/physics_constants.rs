//! Default tuning constants for skid evaluation
//!
//! Units are metres and seconds unless noted. Runtime values live in
//! [`crate::config::SkidConfig`]; these are its defaults.

// ============================================================
// Skid signal
// ============================================================
pub mod signal {
    /// Minimum combined skid signal (m/s) before a skid mark is drawn
    pub const SKID_FX_SPEED: f32 = 0.5;

    /// Skid signal (m/s) at which intensity saturates at 1.0
    pub const MAX_SKID_INTENSITY: f32 = 20.0;

    /// Scale applied to the wheelspin mismatch
    pub const WHEEL_SLIP_MULTIPLIER: f32 = 10.0;

    /// Forward speed (m/s) at which the wheelspin contribution is fully faded out
    pub const SPIN_FADE_OUT_SPEED: f32 = 10.0;

    /// rpm -> rad/s
    pub const RPM_TO_RAD_PER_SEC: f32 = 2.0 * std::f32::consts::PI / 60.0;
}

// ============================================================
// Skid audio
// ============================================================
pub mod audio {
    /// Intensity above which the skid sound starts (and at or below which it stops)
    pub const AUDIO_THRESHOLD: f32 = 0.5;

    /// Body speed (m/s) below which the skid sound is always silenced
    pub const MOVEMENT_FLOOR: f32 = 0.2;

    /// Volume applied at intensity 1.0
    pub const MAX_VOLUME: f32 = 1.0;
}

// ============================================================
// Skid-mark trail storage
// ============================================================
pub mod trail {
    /// Segments kept by the in-memory recorder before the oldest is overwritten
    pub const MAX_MARKS: usize = 2048;

    /// Segments closer than this (m) to their predecessor are coalesced
    pub const MIN_DISTANCE: f32 = 0.25;

    pub const MIN_SQR_DISTANCE: f32 = MIN_DISTANCE * MIN_DISTANCE;
}
