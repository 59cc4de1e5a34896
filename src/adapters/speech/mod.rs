//! Client speech adapters.
//!
//! - `browser` - Recognizer, player and on-device voice backed by the
//!   voice socket
//! - `protocol` - Messages exchanged over the voice socket
//! - `mock` - Recognizer, player and on-device voice for tests, sharing a
//!   `ResourceLog`

pub mod browser;
pub mod mock;
pub mod protocol;

pub use browser::{BrowserClient, Outbound};
pub use mock::{MockAudioPlayer, MockLocalSpeech, MockSpeechRecognizer, ResourceLog};
pub use protocol::{ClientMessage, ClientRecognitionEvent, ServerMessage};
