//! # Skid Configuration
//!
//! All tuning values for skid evaluation in one place, with presets.
//!
//! ## Usage
//! ```rust
//! use skid_core::config::SkidConfig;
//!
//! let config = SkidConfig::default();
//! let arcade = SkidConfig::arcade();
//! let from_json = SkidConfig::from_json(r#"{"audio": {"max_volume": 0.8}}"#).unwrap();
//! assert!((from_json.audio.max_volume - 0.8).abs() < 1e-6);
//! ```
//!
//! ## Environment Variables
//!
//! - `SKID_PROFILE`: Select preset (arcade, simulation, default)

mod audio_config;
mod signal_config;

pub use audio_config::{AudioConfig, ContactLossAudio};
pub use signal_config::{SignalConfig, SpinFade};

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::Result;

pub const PROFILE_ENV_VAR: &str = "SKID_PROFILE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkidConfig {
    pub signal: SignalConfig,
    pub audio: AudioConfig,
}

impl SkidConfig {
    /// Default tuning, matching the stock skid-mark behaviour
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Marks and sound kick in earlier and louder
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.signal.skid_fx_speed = 0.3;
        cfg.signal.max_skid_intensity = 12.0;
        cfg.audio.audio_threshold = 0.35;
        cfg.audio.on_contact_loss = ContactLossAudio::Stop;
        cfg
    }

    /// For rigs with proper tire physics: gentler wheelspin, volume tracks intensity
    pub fn simulation() -> Self {
        let mut cfg = Self::default();
        cfg.signal.wheel_slip_multiplier = 1.0;
        cfg.audio.refresh_volume_while_playing = true;
        cfg
    }

    pub fn from_profile(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "arcade" => Self::arcade(),
            "simulation" => Self::simulation(),
            _ => Self::default(),
        }
    }

    /// Load from environment variable SKID_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var(PROFILE_ENV_VAR).unwrap_or_default())
    }

    /// Parse and validate. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: SkidConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.signal.validate()?;
        self.audio.validate()
    }
}

// ========== Tests ==========
