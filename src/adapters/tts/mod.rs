//! Speech Synthesis Adapters.
//!
//! - `ElevenLabsSynthesizer` - ElevenLabs text-to-speech API
//! - `MockSpeechSynthesizer` - Queued results with call tracking

mod elevenlabs;
mod mock;

pub use elevenlabs::{ElevenLabsConfig, ElevenLabsSynthesizer};
pub use mock::MockSpeechSynthesizer;
