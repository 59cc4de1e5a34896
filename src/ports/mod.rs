//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Agent Ports
//!
//! - `ReasoningService` - Conversational agent turns with structured insights
//! - `SpeechSynthesizer` - Remote text-to-speech
//!
//! ## Client Ports
//!
//! - `SpeechRecognizer` / `RecognitionStream` - Continuous speech capture
//! - `AudioPlayer` - Playback of synthesized audio
//! - `LocalSpeech` - On-device speech fallback
//!
//! ## Persistence Ports
//!
//! - `LocalStore` - Key/value persistence for sessions and transcripts
//! - `DocumentExporter` - Output of rendered agreement documents

mod audio_player;
mod document_exporter;
mod local_store;
mod reasoning_service;
mod speech_recognizer;
mod speech_synthesizer;

pub use audio_player::{AudioPlayer, LocalSpeech, LocalUtterance, PlaybackError};
pub use document_exporter::{DocumentExporter, ExportError, ExportedDocument};
pub use local_store::{LocalStore, StoreError};
pub use reasoning_service::{ReasoningError, ReasoningRequest, ReasoningService};
pub use speech_recognizer::{
    RecognitionError, RecognitionEvent, RecognitionStream, SpeechRecognizer, ABORTED,
};
pub use speech_synthesizer::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};
