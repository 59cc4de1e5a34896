//! Discovery sessions over the key/value store.

use std::sync::Arc;

use tracing::warn;

use super::errors::DiscoveryError;
use crate::domain::discovery::{storage_key, DiscoverySession};
use crate::domain::voice;
use crate::domain::foundation::SessionId;
use crate::ports::LocalStore;

/// Reads and writes serialized sessions under `discovery-session-{id}`.
#[derive(Clone)]
pub struct DiscoverySessionStore {
    store: Arc<dyn LocalStore>,
}

impl DiscoverySessionStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Loads a saved session.
    ///
    /// A value that no longer parses is treated as absent.
    pub async fn load(&self, id: &SessionId) -> Result<Option<DiscoverySession>, DiscoveryError> {
        let Some(raw) = self.store.get(&storage_key(id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<DiscoverySession>(&raw) {
            Ok(session) if session.id() == id => Ok(Some(session)),
            Ok(session) => {
                warn!(requested = %id, stored = %session.id(), "Stored session id mismatch, ignoring");
                Ok(None)
            }
            Err(e) => {
                warn!(session_id = %id, error = %e, "Discarding unreadable discovery session");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &DiscoverySession) -> Result<(), DiscoveryError> {
        let json = serde_json::to_string(session)
            .map_err(|e| DiscoveryError::Serialization(e.to_string()))?;
        self.store.set(&storage_key(session.id()), json).await?;
        Ok(())
    }

    /// Drops everything kept for a session, including its voice transcript.
    pub async fn remove(&self, id: &SessionId) -> Result<(), DiscoveryError> {
        self.store.remove(&storage_key(id)).await?;
        self.store.remove(&voice::storage_key(id)).await?;
        Ok(())
    }
}
