//! Errors surfaced by the discovery session handlers.

use thiserror::Error;

use crate::domain::discovery::WizardError;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{ExportError, StoreError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    #[error("Discovery session not found: {0}")]
    NotFound(SessionId),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("failed to serialize session: {0}")]
    Serialization(String),
}

impl DiscoveryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DiscoveryError::NotFound(_) => ErrorCode::SessionNotFound,
            DiscoveryError::Wizard(err) => err.code(),
            DiscoveryError::Store(_) | DiscoveryError::Export(_) => ErrorCode::StorageError,
            DiscoveryError::Serialization(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the caller sent something the wizard refused.
    pub fn is_rejection(&self) -> bool {
        matches!(self, DiscoveryError::Wizard(_))
    }
}

impl From<DiscoveryError> for DomainError {
    fn from(err: DiscoveryError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
