//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Reasoning service (Groq) and its mock
//! - `tts` - Speech synthesis (ElevenLabs) and its mock
//! - `speech` - Browser-backed recognizer, player and on-device voice
//! - `storage` - Key/value session store (file, in-memory)
//! - `document` - Agreement document export
//! - `auth` - Shared-password session tokens
//! - `http` - REST and WebSocket endpoints

pub mod ai;
pub mod auth;
pub mod document;
pub mod http;
pub mod speech;
pub mod storage;
pub mod tts;

pub use ai::{GroqConfig, GroqProvider, MockReasoningService};
pub use auth::SharedSecretAuth;
pub use document::FileDocumentExporter;
pub use speech::BrowserClient;
pub use storage::{FileLocalStore, InMemoryLocalStore};
pub use tts::{ElevenLabsConfig, ElevenLabsSynthesizer, MockSpeechSynthesizer};
