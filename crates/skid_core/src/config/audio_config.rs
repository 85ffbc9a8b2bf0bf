//! Skid audio tuning

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkidError};
use crate::physics_constants::audio;

/// What happens to a playing skid sound when the wheel leaves the ground
/// or rolls onto a surface that does not skid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactLossAudio {
    /// Leave the device alone; a later frame with zero intensity stops it
    #[default]
    Hold,
    /// Stop the sound on the same frame
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Start/stop intensity threshold
    pub audio_threshold: f32,
    /// Minimum body speed (m/s) for the sound to play at all
    pub movement_floor: f32,
    pub max_volume: f32,
    pub on_contact_loss: ContactLossAudio,
    /// Re-apply volume every frame while playing. Off by default: volume is
    /// only written on start/stop transitions.
    pub refresh_volume_while_playing: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            audio_threshold: audio::AUDIO_THRESHOLD,
            movement_floor: audio::MOVEMENT_FLOOR,
            max_volume: audio::MAX_VOLUME,
            on_contact_loss: ContactLossAudio::Hold,
            refresh_volume_while_playing: false,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.audio_threshold) {
            return Err(SkidError::invalid(
                "audio_threshold",
                format!("must be within [0, 1], got {}", self.audio_threshold),
            ));
        }
        if !self.movement_floor.is_finite() || self.movement_floor < 0.0 {
            return Err(SkidError::invalid(
                "movement_floor",
                format!("must be finite and non-negative, got {}", self.movement_floor),
            ));
        }
        if !self.max_volume.is_finite() || self.max_volume < 0.0 {
            return Err(SkidError::invalid(
                "max_volume",
                format!("must be finite and non-negative, got {}", self.max_volume),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_config() {
        let cfg = AudioConfig::default();
        assert!((cfg.audio_threshold - 0.5).abs() < 1e-6);
        assert!((cfg.movement_floor - 0.2).abs() < 1e-6);
        assert_eq!(cfg.on_contact_loss, ContactLossAudio::Hold);
        assert!(!cfg.refresh_volume_while_playing);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let cfg = AudioConfig {
            audio_threshold: 1.5,
            ..AudioConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_negative_volume_rejected() {
        let cfg = AudioConfig {
            max_volume: -0.1,
            ..AudioConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
