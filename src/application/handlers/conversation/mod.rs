//! Conversation handlers.

mod agent_turn;

pub use agent_turn::{AgentTurnCommand, AgentTurnHandler};
