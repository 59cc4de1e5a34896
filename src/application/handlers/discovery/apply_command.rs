//! ApplyCommandHandler - Runs one wizard command against a stored session.

use std::sync::Arc;

use tracing::{debug, info};

use super::errors::DiscoveryError;
use super::session_store::DiscoverySessionStore;
use crate::domain::discovery::{DiscoverySession, DiscoveryWizard, SessionCommand};
use crate::domain::foundation::{SessionId, Timestamp};

/// Command to apply a wizard action.
#[derive(Debug, Clone)]
pub struct ApplyCommandCommand {
    pub session_id: SessionId,
    pub command: SessionCommand,
}

/// Handler for wizard commands.
///
/// The stored session only changes when the wizard accepts the command.
pub struct ApplyCommandHandler {
    wizard: Arc<DiscoveryWizard>,
    sessions: DiscoverySessionStore,
}

impl ApplyCommandHandler {
    pub fn new(wizard: Arc<DiscoveryWizard>, sessions: DiscoverySessionStore) -> Self {
        Self { wizard, sessions }
    }

    pub async fn handle(&self, cmd: ApplyCommandCommand) -> Result<DiscoverySession, DiscoveryError> {
        // 1. Load (or start) the session
        let current = match self.sessions.load(&cmd.session_id).await? {
            Some(session) => session,
            None => self.wizard.new_session(cmd.session_id, Timestamp::now()),
        };

        // 2. Apply
        let name = cmd.command.name();
        let is_reset = matches!(cmd.command, SessionCommand::Reset { .. });
        let was_agreed = current.is_agreed();
        let next = self.wizard.apply(&current, cmd.command).map_err(|e| {
            debug!(session_id = %cmd.session_id, command = name, error = %e, "Wizard rejected command");
            e
        })?;

        // 3. Persist. A reset leaves nothing behind; the next load starts over.
        if is_reset {
            self.sessions.remove(&cmd.session_id).await?;
            info!(session_id = %cmd.session_id, "Discovery session reset");
            return Ok(next);
        }
        self.sessions.save(&next).await?;

        if next.is_agreed() && !was_agreed {
            info!(
                session_id = %cmd.session_id,
                business = %next.business_snapshot().business_name,
                "Discovery agreement signed"
            );
        }
        Ok(next)
    }
}
