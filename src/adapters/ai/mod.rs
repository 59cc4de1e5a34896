//! Reasoning Service Adapters.
//!
//! ## Available Adapters
//!
//! - `GroqProvider` - OpenAI-compatible chat completions (Groq by default)
//! - `MockReasoningService` - Configurable mock for testing

mod groq_provider;
mod mock_reasoning;
mod prompt;

pub use groq_provider::{GroqConfig, GroqProvider};
pub use mock_reasoning::MockReasoningService;
pub use prompt::system_prompt;
