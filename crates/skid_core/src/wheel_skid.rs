//! Per-wheel skid evaluation
//!
//! Once per rendered frame, after the physics step, each wheel:
//! 1. drops its trail chain if it lost contact or sits on a non-skid surface
//! 2. computes the skid signal (lateral slip + faded wheelspin)
//! 3. drives the skid sound with start/stop hysteresis
//! 4. appends a skid-mark segment chained from the previous one
//!
//! ## Phases
//!
//! | Phase | Trail | Audio |
//! |-------|-------|-------|
//! | Idle | none | off |
//! | SkiddingSilent | active | off |
//! | SkiddingAudible | active | on |
//!
//! With [`ContactLossAudio::Hold`] a wheel that leaves the ground mid-skid
//! reports `Idle` while its sound keeps playing until a grounded frame
//! computes a sub-threshold intensity.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::audio::{AudioDevice, AudioTransition};
use crate::config::{ContactLossAudio, SkidConfig};
use crate::error::Result;
use crate::kinematics::{BodyKinematics, FrameClock, FrameInput, GroundContact};
use crate::race_events::{
    ListenerControl, RaceEventBus, RaceFinishListener, RaceId, SubscriptionId,
};
use crate::signal::{self, SkidSignal};
use crate::surface::{SkidEligibility, SurfacePolicy};
use crate::trail::{TrailHandle, TrailRecorder, TrailSegment};

/// Mutable per-wheel state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkidState {
    /// Last segment this wheel appended; `None` means no active chain
    pub last_trail: Option<TrailHandle>,
    pub audio_playing: bool,
    /// Simulation time of the last physics refresh
    pub last_physics_step: f32,
}

impl SkidState {
    fn new(now: f32) -> Self {
        Self {
            last_trail: None,
            audio_playing: false,
            last_physics_step: now,
        }
    }

    pub fn phase(&self) -> SkidPhase {
        match (self.last_trail.is_some(), self.audio_playing) {
            (false, _) => SkidPhase::Idle,
            (true, false) => SkidPhase::SkiddingSilent,
            (true, true) => SkidPhase::SkiddingAudible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkidPhase {
    Idle,
    SkiddingSilent,
    SkiddingAudible,
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkidSample {
    pub phase: SkidPhase,
    /// Zero when grounded contact is missing or the surface does not skid
    pub signal: SkidSignal,
    /// Zero below the activation threshold
    pub intensity: f32,
    /// Segment appended this frame
    pub segment: Option<TrailHandle>,
    pub audio: AudioTransition,
}

pub struct WheelSkid<A: AudioDevice, E: SkidEligibility = SurfacePolicy> {
    label: String,
    config: SkidConfig,
    eligibility: E,
    /// `None` once disposed
    audio: Option<A>,
    state: SkidState,
    subscription: Option<SubscriptionId>,
    retired: bool,
}

impl<A: AudioDevice, E: SkidEligibility> WheelSkid<A, E> {
    /// Fails if `config` is invalid (e.g. zero `max_skid_intensity`).
    pub fn new(config: SkidConfig, audio: A, eligibility: E, now: f32) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            label: String::from("wheel"),
            config,
            eligibility,
            audio: Some(audio),
            state: SkidState::new(now),
            subscription: None,
            retired: false,
        })
    }

    /// Name used in log output
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &SkidConfig {
        &self.config
    }

    pub fn state(&self) -> &SkidState {
        &self.state
    }

    pub fn phase(&self) -> SkidPhase {
        self.state.phase()
    }

    pub fn is_audio_playing(&self) -> bool {
        self.state.audio_playing
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Record that the physics step refreshed wheel contact data at `now`
    pub fn on_physics_step(&mut self, now: f32) {
        self.state.last_physics_step = now;
    }

    /// Run one frame. Returns `None` once the race has finished.
    pub fn evaluate<R>(&mut self, input: &FrameInput, trail: &mut R) -> Option<SkidSample>
    where
        R: TrailRecorder + ?Sized,
    {
        if self.retired {
            return None;
        }
        let before = self.state.phase();

        let sample = match input.wheel.contact {
            Some(contact) if self.eligibility.allows_skid(contact.surface) => {
                self.evaluate_grounded(input, &contact, trail)
            }
            _ => self.lose_contact(),
        };

        if sample.phase != before {
            debug!(
                wheel = %self.label,
                from = ?before,
                to = ?sample.phase,
                intensity = sample.intensity,
                "skid phase changed"
            );
        }
        Some(sample)
    }

    fn evaluate_grounded<R>(
        &mut self,
        input: &FrameInput,
        contact: &GroundContact,
        trail: &mut R,
    ) -> SkidSample
    where
        R: TrailRecorder + ?Sized,
    {
        let skid = signal::skid_signal(&input.wheel, &input.body, &self.config.signal);
        let active = skid.is_active(&self.config.signal);
        let intensity = if active {
            signal::intensity(skid.total, self.config.signal.max_skid_intensity)
        } else {
            0.0
        };

        let audio = self.drive_audio(intensity, &input.body, &input.clock);

        let segment = if active {
            // Account for movement since the physics step that produced the contact
            let elapsed = self.elapsed_since_physics(input.clock.now);
            let point = contact.point + input.body.velocity * elapsed;
            let handle = trail.append_segment(
                TrailSegment {
                    point,
                    normal: contact.normal,
                    intensity,
                },
                self.state.last_trail,
            );
            self.state.last_trail = Some(handle);
            Some(handle)
        } else {
            self.reset_chain();
            None
        };

        SkidSample {
            phase: self.state.phase(),
            signal: skid,
            intensity,
            segment,
            audio,
        }
    }

    fn lose_contact(&mut self) -> SkidSample {
        self.reset_chain();

        let audio = match self.config.audio.on_contact_loss {
            ContactLossAudio::Hold => AudioTransition::None,
            ContactLossAudio::Stop => self.force_stop(),
        };

        SkidSample {
            phase: self.state.phase(),
            signal: SkidSignal::default(),
            intensity: 0.0,
            segment: None,
            audio,
        }
    }

    fn reset_chain(&mut self) {
        if self.state.last_trail.take().is_some() {
            debug!(wheel = %self.label, "skid chain ended");
        }
    }

    fn elapsed_since_physics(&self, now: f32) -> f32 {
        let elapsed = now - self.state.last_physics_step;
        if elapsed < 0.0 {
            warn!(
                wheel = %self.label,
                now,
                last_physics_step = self.state.last_physics_step,
                "physics step is ahead of the frame clock"
            );
            return 0.0;
        }
        elapsed
    }

    fn drive_audio(
        &mut self,
        intensity: f32,
        body: &BodyKinematics,
        clock: &FrameClock,
    ) -> AudioTransition {
        let cfg = &self.config.audio;
        let Some(device) = self.audio.as_mut() else {
            return AudioTransition::None;
        };

        if body.speed() <= cfg.movement_floor || clock.is_paused() {
            device.stop();
            let was_playing = std::mem::replace(&mut self.state.audio_playing, false);
            return if was_playing {
                AudioTransition::Stopped
            } else {
                AudioTransition::None
            };
        }

        let volume = cfg.max_volume * intensity;
        let above = intensity > cfg.audio_threshold;

        if above && !self.state.audio_playing {
            device.play();
            self.state.audio_playing = true;
            device.set_volume(volume);
            AudioTransition::Started { volume }
        } else if !above && self.state.audio_playing {
            device.stop();
            self.state.audio_playing = false;
            device.set_volume(volume);
            AudioTransition::Stopped
        } else if self.state.audio_playing && cfg.refresh_volume_while_playing {
            device.set_volume(volume);
            AudioTransition::VolumeRefreshed { volume }
        } else {
            AudioTransition::None
        }
    }

    fn force_stop(&mut self) -> AudioTransition {
        if !self.state.audio_playing {
            return AudioTransition::None;
        }
        if let Some(device) = self.audio.as_mut() {
            device.stop();
        }
        self.state.audio_playing = false;
        AudioTransition::Stopped
    }

    /// Unsubscribe from race notifications
    pub fn detach(&mut self, bus: &mut RaceEventBus) -> bool {
        match self.subscription.take() {
            Some(id) => bus.unsubscribe(id),
            None => false,
        }
    }

    /// Release the audio device and stop evaluating for good
    fn retire(&mut self, race: RaceId) {
        if self.retired {
            return;
        }
        self.audio = None;
        self.state.audio_playing = false;
        self.state.last_trail = None;
        self.subscription = None;
        self.retired = true;
        info!(wheel = %self.label, race = race.0, "race finished, skid audio disposed");
    }
}

impl<A, E> WheelSkid<A, E>
where
    A: AudioDevice + 'static,
    E: SkidEligibility + 'static,
{
    /// Subscribe to race-finished notifications. Returns the existing
    /// subscription if already attached, `None` if retired.
    pub fn attach(this: &Rc<RefCell<Self>>, bus: &mut RaceEventBus) -> Option<SubscriptionId> {
        {
            let me = this.borrow();
            if me.retired {
                return None;
            }
            if let Some(id) = me.subscription {
                if bus.is_subscribed(id) {
                    return Some(id);
                }
            }
        }
        let listener: Rc<RefCell<dyn RaceFinishListener>> = this.clone();
        let id = bus.subscribe(Rc::downgrade(&listener));
        this.borrow_mut().subscription = Some(id);
        Some(id)
    }
}

impl<A: AudioDevice, E: SkidEligibility> RaceFinishListener for WheelSkid<A, E> {
    fn on_race_finished(&mut self, race: RaceId) -> ListenerControl {
        self.retire(race);
        ListenerControl::Unsubscribe
    }
}

impl<A: AudioDevice, E: SkidEligibility> std::fmt::Debug for WheelSkid<A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelSkid")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("has_audio", &self.audio.is_some())
            .field("retired", &self.retired)
            .finish()
    }
}
