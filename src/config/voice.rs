//! Voice turn timing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::voice::VoiceTimings;
use crate::domain::voice::DEFAULT_VOICE_PRIORITY;

/// Turn-taking delays and on-device voice preferences.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Quiet time after the last final fragment before the turn is sent
    #[serde(default = "default_silence_ms")]
    pub silence_ms: u64,

    /// Pause after speaking before listening again
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Stand-in for speech time while muted
    #[serde(default = "default_mute_delay_ms")]
    pub mute_delay_ms: u64,

    #[serde(default = "default_restart_after_end_ms")]
    pub restart_after_end_ms: u64,

    #[serde(default = "default_restart_after_error_ms")]
    pub restart_after_error_ms: u64,

    /// Speaking rate for the on-device fallback voice
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f32,

    /// Preferred on-device voices, comma-separated, best first
    pub voice_priority: Option<String>,
}

impl VoiceConfig {
    pub fn voice_priority_list(&self) -> Vec<String> {
        match &self.voice_priority {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_VOICE_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn timings(&self) -> VoiceTimings {
        VoiceTimings {
            silence: Duration::from_millis(self.silence_ms),
            settle: Duration::from_millis(self.settle_ms),
            mute_delay: Duration::from_millis(self.mute_delay_ms),
            restart_after_end: Duration::from_millis(self.restart_after_end_ms),
            restart_after_error: Duration::from_millis(self.restart_after_error_ms),
            fallback_rate: self.fallback_rate,
            voice_priority: self.voice_priority_list(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.silence_ms == 0 {
            return Err(ValidationError::invalid("voice.silence_ms", "must be positive"));
        }
        if !(0.1..=10.0).contains(&self.fallback_rate) {
            return Err(ValidationError::invalid(
                "voice.fallback_rate",
                format!("{} is outside 0.1..=10", self.fallback_rate),
            ));
        }
        Ok(())
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            silence_ms: default_silence_ms(),
            settle_ms: default_settle_ms(),
            mute_delay_ms: default_mute_delay_ms(),
            restart_after_end_ms: default_restart_after_end_ms(),
            restart_after_error_ms: default_restart_after_error_ms(),
            fallback_rate: default_fallback_rate(),
            voice_priority: None,
        }
    }
}

fn default_silence_ms() -> u64 {
    1500
}

fn default_settle_ms() -> u64 {
    400
}

fn default_mute_delay_ms() -> u64 {
    300
}

fn default_restart_after_end_ms() -> u64 {
    300
}

fn default_restart_after_error_ms() -> u64 {
    500
}

fn default_fallback_rate() -> f32 {
    0.88
}
