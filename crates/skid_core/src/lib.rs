//! # skid_core - Per-Wheel Skid Evaluation
//!
//! Decides once per rendered frame whether a wheel is skidding and how hard,
//! and drives two effects from that: a chained skid-mark trail and a skid
//! sound with start/stop hysteresis.
//!
//! ## Features
//! - Lateral slip plus faded wheelspin as the skid signal
//! - Trail chaining through an injected [`TrailRecorder`]
//! - Audio hysteresis through an injected [`AudioDevice`]
//! - Race-finish shutdown via an explicit [`RaceEventBus`]
//!
//! ## Example
//! ```rust
//! use nalgebra::{UnitQuaternion, Vector3};
//! use skid_core::{
//!     BodyKinematics, FrameClock, FrameInput, GroundContact, MemoryTrailRecorder, SilentAudio,
//!     SkidConfig, SkidPhase, SurfaceKind, SurfacePolicy, WheelKinematics, WheelSkid,
//! };
//!
//! let mut trail = MemoryTrailRecorder::default();
//! let mut wheel =
//!     WheelSkid::new(SkidConfig::default(), SilentAudio, SurfacePolicy::default(), 0.0).unwrap();
//!
//! let contact = GroundContact {
//!     point: Vector3::zeros(),
//!     normal: Vector3::y(),
//!     surface: SurfaceKind::Asphalt,
//! };
//! let input = FrameInput {
//!     wheel: WheelKinematics::grounded(contact, 0.35, 0.0),
//!     body: BodyKinematics::new(Vector3::new(12.0, 0.0, 0.0), UnitQuaternion::identity()),
//!     clock: FrameClock::running(0.0),
//! };
//! let sample = wheel.evaluate(&input, &mut trail).unwrap();
//! assert_eq!(sample.phase, SkidPhase::SkiddingAudible);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod kinematics;
pub mod physics_constants;
pub mod race_events;
pub mod session;
pub mod signal;
pub mod surface;
pub mod trail;
pub mod wheel_skid;

#[cfg(test)]
mod test_support;

pub use audio::{AudioDevice, AudioTransition, SilentAudio};
pub use config::{AudioConfig, ContactLossAudio, SignalConfig, SkidConfig, SpinFade};
pub use error::{Result, SkidError};
pub use kinematics::{BodyKinematics, FrameClock, FrameInput, GroundContact, WheelKinematics};
pub use race_events::{ListenerControl, RaceEventBus, RaceFinishListener, RaceId, SubscriptionId};
pub use session::{RaceSession, SessionState};
pub use signal::SkidSignal;
pub use surface::{SkidEligibility, SurfaceKind, SurfacePolicy};
pub use trail::{MemoryTrailRecorder, SkidMark, TrailHandle, TrailRecorder, TrailSegment};
pub use wheel_skid::{SkidPhase, SkidSample, SkidState, WheelSkid};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
