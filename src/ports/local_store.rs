//! Local Store Port - Client-side key/value persistence.
//!
//! Holds serialized discovery sessions (`discovery-session-{id}`) and voice
//! transcripts (`voice-session-{id}`). Values are opaque strings.

use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrites any existing value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    pub fn io(message: impl Into<String>) -> Self {
        StoreError::Io(message.into())
    }
}
