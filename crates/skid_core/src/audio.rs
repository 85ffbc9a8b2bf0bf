//! Skid sound output

use serde::{Deserialize, Serialize};

/// Audio source attached to one wheel.
///
/// Dropping the device releases it.
pub trait AudioDevice {
    fn play(&mut self);
    /// Safe to call when already stopped
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

impl<T: AudioDevice + ?Sized> AudioDevice for Box<T> {
    fn play(&mut self) {
        (**self).play()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
}

/// What the evaluator did to the audio device this frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioTransition {
    #[default]
    None,
    Started { volume: f32 },
    Stopped,
    VolumeRefreshed { volume: f32 },
}

/// Device that discards every command, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioDevice for SilentAudio {
    fn play(&mut self) {}

    fn stop(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}
