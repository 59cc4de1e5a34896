//! LoadSessionHandler - Query handler for the current wizard state.

use std::sync::Arc;

use tracing::info;

use super::errors::DiscoveryError;
use super::session_store::DiscoverySessionStore;
use crate::domain::discovery::{DiscoverySession, DiscoveryWizard};
use crate::domain::foundation::{SessionId, Timestamp};

/// Query for a discovery session.
#[derive(Debug, Clone)]
pub struct LoadSessionQuery {
    pub session_id: SessionId,
}

/// Loads a session, creating a fresh one when none is stored.
pub struct LoadSessionHandler {
    wizard: Arc<DiscoveryWizard>,
    sessions: DiscoverySessionStore,
}

impl LoadSessionHandler {
    pub fn new(wizard: Arc<DiscoveryWizard>, sessions: DiscoverySessionStore) -> Self {
        Self { wizard, sessions }
    }

    pub async fn handle(&self, query: LoadSessionQuery) -> Result<DiscoverySession, DiscoveryError> {
        if let Some(session) = self.sessions.load(&query.session_id).await? {
            return Ok(session);
        }

        let session = self.wizard.new_session(query.session_id, Timestamp::now());
        self.sessions.save(&session).await?;
        info!(session_id = %query.session_id, "Started discovery session");
        Ok(session)
    }
}
