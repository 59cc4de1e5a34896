//! AgentTurnHandler - One reasoning-service turn for a conversation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::voice::{AgentReply, ChatMessage};
use crate::ports::{ReasoningError, ReasoningRequest, ReasoningService};

/// Command to get the agent's next turn.
#[derive(Debug, Clone)]
pub struct AgentTurnCommand {
    pub messages: Vec<ChatMessage>,
    pub business_name: String,
    pub notes: Option<String>,
}

/// Handler that asks the reasoning service for the next reply.
pub struct AgentTurnHandler {
    reasoning: Arc<dyn ReasoningService>,
}

impl AgentTurnHandler {
    pub fn new(reasoning: Arc<dyn ReasoningService>) -> Self {
        Self { reasoning }
    }

    pub async fn handle(&self, cmd: AgentTurnCommand) -> Result<AgentReply, ReasoningError> {
        let mut request = ReasoningRequest::new(cmd.messages, cmd.business_name);
        if let Some(notes) = cmd.notes {
            request = request.with_notes(notes);
        }
        let history = request.messages.len();

        match self.reasoning.reply(request).await {
            Ok(reply) => {
                info!(
                    provider = self.reasoning.provider_name(),
                    history,
                    stage = ?reply.insights.stage,
                    "Agent turn completed"
                );
                Ok(reply)
            }
            Err(e) => {
                warn!(provider = self.reasoning.provider_name(), error = %e, "Agent turn failed");
                Err(e)
            }
        }
    }
}
