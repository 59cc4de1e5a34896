//! Voice socket protocol between the server and the browser.
//!
//! Text frames carry JSON messages tagged by `type`. Synthesized audio
//! follows a `play_audio` header as one binary frame.

use serde::{Deserialize, Serialize};

use crate::application::voice::VoiceSnapshot;
use crate::domain::voice::VoiceInfo;

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected { session_id: String },

    /// Full controller state after a change.
    Snapshot { snapshot: VoiceSnapshot },

    StartRecognition { stream_id: u64 },

    StopRecognition { stream_id: u64 },

    /// Header for the binary frame that follows.
    PlayAudio {
        playback_id: u64,
        content_type: String,
        byte_length: usize,
    },

    StopAudio,

    /// Speak with an on-device voice.
    Speak {
        utterance_id: u64,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<String>,
        rate: f32,
        pitch: f32,
    },

    CancelSpeech,

    Error { code: String, message: String },

    Pong,
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Sent on open: what the browser can do.
    Hello {
        speech_recognition: bool,
        #[serde(default)]
        voices: Vec<VoiceInfo>,
    },

    Start,

    ToggleMute,

    Reset,

    Recognition {
        stream_id: u64,
        event: ClientRecognitionEvent,
    },

    PlaybackEnded {
        playback_id: u64,
        #[serde(default)]
        error: Option<String>,
    },

    SpeechEnded { utterance_id: u64 },

    Ping,
}

/// Recognition callbacks as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientRecognitionEvent {
    Interim { text: String },
    Final { text: String },
    Error { error: String },
    End,
}
