//! ElevenLabs text-to-speech adapter.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};

/// Configuration for the ElevenLabs adapter.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// Missing key means every request fails with `NotConfigured`.
    api_key: Option<Secret<String>>,
    pub voice_id: String,
    pub model_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ElevenLabsConfig {
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        Self {
            api_key,
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_turbo_v2_5".to_string(),
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

pub struct ElevenLabsSynthesizer {
    config: ElevenLabsConfig,
    client: Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: ElevenLabsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });
        Self { config, client }
    }

    fn speech_url(&self) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    fn request_body<'a>(&'a self, text: &'a str) -> SpeechRequest<'a> {
        SpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings::default(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        let api_key = match &self.config.api_key {
            Some(key) if self.config.is_configured() => key,
            _ => return Err(SynthesisError::NotConfigured),
        };

        let response = self
            .client
            .post(self.speech_url())
            .header("xi-api-key", api_key.expose_secret())
            .header("Content-Type", "application/json")
            .header("Accept", "audio/mpeg")
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else {
                    SynthesisError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %message, "ElevenLabs request failed");
            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;
        debug!(bytes = bytes.len(), "Synthesized speech");
        Ok(SynthesizedAudio::mpeg(bytes.to_vec()))
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.3,
            use_speaker_boost: true,
        }
    }
}
