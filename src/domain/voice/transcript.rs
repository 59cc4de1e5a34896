//! Voice-session transcript, exchange history and the persisted bundle.

use serde::{Deserialize, Serialize};

use super::insight::InsightPayload;
use crate::domain::foundation::{SessionId, Timestamp};

/// Storage key for a session's voice transcript bundle.
pub fn storage_key(id: &SessionId) -> String {
    format!("voice-session-{}", id)
}

/// Who said something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    Client,
}

/// One spoken utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "role")]
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: Timestamp,
}

/// Role of a turn in the reasoning-service exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the exchange history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything a voice call accumulates. Persisted for recovery display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceTranscript {
    pub transcript: Vec<TranscriptEntry>,
    pub messages: Vec<ChatMessage>,
    pub insights: InsightPayload,
}

impl VoiceTranscript {
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Records a client turn in both the history and the transcript.
    pub fn record_client(&mut self, text: &str, at: Timestamp) {
        self.messages.push(ChatMessage::user(text));
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Client,
            text: text.to_string(),
            timestamp: at,
        });
    }

    /// Records an agent reply and adopts its insights wholesale.
    pub fn record_agent(&mut self, text: &str, insights: InsightPayload, at: Timestamp) {
        self.insights = insights;
        self.messages.push(ChatMessage::assistant(text));
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::Agent,
            text: text.to_string(),
            timestamp: at,
        });
    }
}
