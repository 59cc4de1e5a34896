//! Groq Provider - ReasoningService over an OpenAI-compatible chat API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_model("llama-3.3-70b-versatile")
//!     .with_brand("11-8 AI");
//!
//! let provider = GroqProvider::new(config);
//! ```
//!
//! One request per turn, no retries: a failed turn sends the voice
//! controller back to listening.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::prompt::system_prompt;
use crate::domain::voice::{AgentReply, ChatRole};
use crate::ports::{ReasoningError, ReasoningRequest, ReasoningService};

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Consultancy name used in the persona.
    pub brand: String,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            max_tokens: 1024,
            timeout: Duration::from_secs(60),
            brand: "11-8 AI".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq chat-completions client.
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Builds the wire request: system prompt first, then the history.
    fn to_chat_request(&self, request: &ReasoningRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatRequestMessage {
            role: "system".to_string(),
            content: system_prompt(
                &self.config.brand,
                &request.business_name,
                request.notes.as_deref(),
            ),
        });
        messages.extend(request.messages.iter().map(|m| ChatRequestMessage {
            role: match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            }
            .to_string(),
            content: m.content.clone(),
        }));

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send(&self, request: &ReasoningRequest) -> Result<Response, ReasoningError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasoningError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ReasoningError::Network(format!("Connection failed: {}", e))
                } else {
                    ReasoningError::Network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<AgentReply, ReasoningError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::Parse(format!("Failed to parse response: {}", e)))?;

        let raw = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(AgentReply::parse(&raw))
    }
}

/// Maps a non-2xx status to an error.
fn error_for_status(status: u16, body: &str) -> ReasoningError {
    match status {
        401 | 403 => ReasoningError::AuthenticationFailed,
        429 => ReasoningError::RateLimited {
            retry_after_secs: parse_retry_after(body),
        },
        500..=599 => ReasoningError::unavailable(format!("Server error {}: {}", status, body)),
        _ => ReasoningError::Network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" from an error body. Defaults to 30.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .and_then(|msg| {
            let rest = msg.split("try again in ").nth(1)?;
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

#[async_trait]
impl ReasoningService for GroqProvider {
    async fn reply(&self, request: ReasoningRequest) -> Result<AgentReply, ReasoningError> {
        if self.config.api_key().trim().is_empty() {
            return Err(ReasoningError::NotConfigured);
        }
        debug!(
            model = %self.config.model,
            history = request.messages.len(),
            "Requesting agent turn"
        );
        let response = self.send(&request).await?;
        self.parse_response(response).await
    }

    fn provider_name(&self) -> &str {
        "groq"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
