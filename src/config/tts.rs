//! Speech synthesis configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// ElevenLabs configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub elevenlabs_api_key: Option<Secret<String>>,

    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TtsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_elevenlabs(&self) -> bool {
        self.elevenlabs_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("tts.base_url"));
        }
        if self.voice_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TTS__VOICE_ID"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: None,
            voice_id: default_voice_id(),
            model_id: default_model_id(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_voice_id() -> String {
    // "Rachel"
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_model_id() -> String {
    "eleven_turbo_v2_5".to_string()
}

fn default_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
