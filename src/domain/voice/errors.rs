//! Voice controller errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Shown when the device cannot recognize speech.
pub const UNSUPPORTED_BROWSER_MESSAGE: &str =
    "Voice features require Chrome or Edge. Please open this session in Chrome for the full experience.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("{}", UNSUPPORTED_BROWSER_MESSAGE)]
    UnsupportedBrowser,

    #[error("Voice session already started")]
    AlreadyStarted,

    #[error("Voice controller has stopped")]
    ControllerStopped,
}

impl VoiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VoiceError::UnsupportedBrowser => ErrorCode::UnsupportedBrowser,
            VoiceError::AlreadyStarted => ErrorCode::InvalidStateTransition,
            VoiceError::ControllerStopped => ErrorCode::InternalError,
        }
    }
}

impl From<VoiceError> for DomainError {
    fn from(err: VoiceError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
