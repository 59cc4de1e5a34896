//! Speech Recognizer Port - Continuous speech-to-text from the client.
//!
//! A recognizer starts recognition streams. At most one stream is live per
//! voice session; the controller aborts the old one before starting
//! another.

use async_trait::async_trait;
use thiserror::Error;

/// Error text a recognizer reports after its own `abort`.
pub const ABORTED: &str = "aborted";

/// One event from a live recognition stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Provisional text for display.
    Interim(String),
    /// Settled text to add to the pending utterance.
    Final(String),
    /// Recognition error, e.g. `"no-speech"` or [`ABORTED`].
    Error(String),
    /// The stream finished on its own.
    Ended,
}

impl RecognitionEvent {
    /// Error caused by our own abort; never worth a restart.
    pub fn is_self_abort(&self) -> bool {
        matches!(self, RecognitionEvent::Error(kind) if kind == ABORTED)
    }
}

/// Port for starting recognition.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the client can recognize speech at all.
    fn is_supported(&self) -> bool;

    async fn start(&self) -> Result<Box<dyn RecognitionStream>, RecognitionError>;
}

/// A live recognition stream.
#[async_trait]
pub trait RecognitionStream: Send {
    /// Next event. Must be cancel-safe: dropping the future loses nothing.
    ///
    /// `None` after the stream has ended or been aborted.
    async fn next_event(&mut self) -> Option<RecognitionEvent>;

    /// Stops capture. Idempotent.
    fn abort(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("speech recognition not supported")]
    Unsupported,

    #[error("failed to start recognition: {0}")]
    StartFailed(String),
}
