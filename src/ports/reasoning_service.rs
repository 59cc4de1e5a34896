//! Reasoning Service Port - Interface for the conversational agent.
//!
//! The voice controller and the chat endpoint send the exchange history
//! (plus business context) and receive a spoken reply with structured
//! insights. Providers own prompting and reply parsing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::voice::{AgentReply, ChatMessage};

/// Port for one reasoning turn.
///
/// # Contract
///
/// - An empty `messages` list is the seed turn: the agent opens the call.
/// - Replies that are not valid JSON are still returned, with the raw text
///   as the message and default insights. Only transport and provider
///   failures are errors.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn reply(&self, request: ReasoningRequest) -> Result<AgentReply, ReasoningError>;

    /// Provider name for logs.
    fn provider_name(&self) -> &str;
}

/// Input to one turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningRequest {
    pub messages: Vec<ChatMessage>,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReasoningRequest {
    pub fn new(messages: Vec<ChatMessage>, business_name: impl Into<String>) -> Self {
        Self {
            messages,
            business_name: business_name.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    pub fn is_seed(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Errors from reasoning providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasoningError {
    #[error("reasoning service not configured")]
    NotConfigured,

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl ReasoningError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ReasoningError::Unavailable {
            message: message.into(),
        }
    }

    /// Whether a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReasoningError::RateLimited { .. }
                | ReasoningError::Unavailable { .. }
                | ReasoningError::Network(_)
                | ReasoningError::Timeout { .. }
        )
    }
}
