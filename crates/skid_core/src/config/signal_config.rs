//! Skid signal tuning

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkidError};
use crate::physics_constants::signal;

/// How the wheelspin contribution fades with forward speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinFade {
    /// `max(0, spin * (fade_out_speed - |forward|))`.
    ///
    /// For rigs whose wheels slip the entire time they accelerate.
    /// `fade_out_speed` may not exceed [`signal::SPIN_FADE_OUT_SPEED`], so
    /// wheelspin never counts at or above that forward speed.
    Linear { fade_out_speed: f32 },
    /// Wheelspin passes through unchanged at every speed. Opt-in only, for
    /// rigs with proper tire physics; no preset selects it.
    Off,
}

impl Default for SpinFade {
    fn default() -> Self {
        SpinFade::Linear {
            fade_out_speed: signal::SPIN_FADE_OUT_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Activation threshold for skid marks (m/s)
    pub skid_fx_speed: f32,
    /// Signal at which intensity reaches 1.0 (m/s)
    pub max_skid_intensity: f32,
    /// Wheelspin scale
    pub wheel_slip_multiplier: f32,
    pub spin_fade: SpinFade,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            skid_fx_speed: signal::SKID_FX_SPEED,
            max_skid_intensity: signal::MAX_SKID_INTENSITY,
            wheel_slip_multiplier: signal::WHEEL_SLIP_MULTIPLIER,
            spin_fade: SpinFade::default(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_skid_intensity.is_finite() || self.max_skid_intensity <= 0.0 {
            return Err(SkidError::invalid(
                "max_skid_intensity",
                format!("must be finite and greater than zero, got {}", self.max_skid_intensity),
            ));
        }
        if !self.skid_fx_speed.is_finite() || self.skid_fx_speed < 0.0 {
            return Err(SkidError::invalid(
                "skid_fx_speed",
                format!("must be finite and non-negative, got {}", self.skid_fx_speed),
            ));
        }
        if !self.wheel_slip_multiplier.is_finite() || self.wheel_slip_multiplier < 0.0 {
            return Err(SkidError::invalid(
                "wheel_slip_multiplier",
                format!("must be finite and non-negative, got {}", self.wheel_slip_multiplier),
            ));
        }
        if let SpinFade::Linear { fade_out_speed } = self.spin_fade {
            if !fade_out_speed.is_finite() || fade_out_speed < 0.0 {
                return Err(SkidError::invalid(
                    "spin_fade.fade_out_speed",
                    format!("must be finite and non-negative, got {}", fade_out_speed),
                ));
            }
            if fade_out_speed > signal::SPIN_FADE_OUT_SPEED {
                return Err(SkidError::invalid(
                    "spin_fade.fade_out_speed",
                    format!(
                        "must not exceed {} m/s, got {}",
                        signal::SPIN_FADE_OUT_SPEED,
                        fade_out_speed
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let cfg = SignalConfig::default();
        assert!((cfg.skid_fx_speed - 0.5).abs() < 1e-6);
        assert!((cfg.max_skid_intensity - 20.0).abs() < 1e-6);
        assert!((cfg.wheel_slip_multiplier - 10.0).abs() < 1e-6);
        assert_eq!(cfg.spin_fade, SpinFade::Linear { fade_out_speed: 10.0 });
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_max_intensity_rejected() {
        let cfg = SignalConfig {
            max_skid_intensity: 0.0,
            ..SignalConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            SkidError::InvalidConfig { field: "max_skid_intensity", .. }
        ));
    }

    #[test]
    fn test_nan_fade_rejected() {
        let cfg = SignalConfig {
            spin_fade: SpinFade::Linear { fade_out_speed: f32::NAN },
            ..SignalConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_fade_speed_above_limit_rejected() {
        let cfg = SignalConfig {
            spin_fade: SpinFade::Linear { fade_out_speed: 20.0 },
            ..SignalConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            SkidError::InvalidConfig { field: "spin_fade.fade_out_speed", .. }
        ));
    }

    #[test]
    fn test_fade_speed_at_or_below_limit_accepted() {
        for fade_out_speed in [10.0, 6.0, 0.0] {
            let cfg = SignalConfig {
                spin_fade: SpinFade::Linear { fade_out_speed },
                ..SignalConfig::default()
            };
            assert!(cfg.validate().is_ok());
        }
    }

    #[test]
    fn test_spin_fade_off_is_explicit_opt_in() {
        let cfg = SignalConfig {
            spin_fade: SpinFade::Off,
            ..SignalConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_ne!(SignalConfig::default().spin_fade, SpinFade::Off);
    }

    #[test]
    fn test_spin_fade_serde_tag() {
        let json = serde_json::to_string(&SpinFade::Off).unwrap();
        assert_eq!(json, r#"{"kind":"off"}"#);
        let back: SpinFade =
            serde_json::from_str(r#"{"kind":"linear","fade_out_speed":8.0}"#).unwrap();
        assert_eq!(back, SpinFade::Linear { fade_out_speed: 8.0 });
    }
}
