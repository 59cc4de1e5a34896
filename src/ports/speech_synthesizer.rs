//! Speech Synthesizer Port - Remote text-to-speech.

use async_trait::async_trait;
use thiserror::Error;

/// Encoded audio ready for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SynthesizedAudio {
    pub fn mpeg(bytes: Vec<u8>) -> Self {
        Self {
            content_type: "audio/mpeg".to_string(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Port for converting agent text to audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech synthesis not configured")]
    NotConfigured,

    #[error("synthesis provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("synthesis timed out")]
    Timeout,
}
