//! Audio playback and on-device speech ports.
//!
//! Both speak to the client. `play`/`speak` resolve when output finishes;
//! `stop`/`cancel` end output early and make a pending call resolve.

use async_trait::async_trait;
use thiserror::Error;

use super::speech_synthesizer::SynthesizedAudio;
use crate::domain::voice::VoiceInfo;

/// Plays synthesized audio to the client.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, audio: SynthesizedAudio) -> Result<(), PlaybackError>;

    fn stop(&self);
}

/// Speaks text with the client's on-device voices.
#[async_trait]
pub trait LocalSpeech: Send + Sync {
    async fn voices(&self) -> Vec<VoiceInfo>;

    async fn speak(&self, utterance: LocalUtterance) -> Result<(), PlaybackError>;

    fn cancel(&self);
}

/// Text plus delivery settings for on-device speech.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUtterance {
    pub text: String,
    /// `None` uses the device default voice.
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback failed: {0}")]
    Failed(String),

    #[error("output device disconnected")]
    Disconnected,
}
