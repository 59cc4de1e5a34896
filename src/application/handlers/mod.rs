//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;
pub mod discovery;

pub use conversation::{AgentTurnCommand, AgentTurnHandler};
pub use discovery::{
    ApplyCommandCommand, ApplyCommandHandler, DiscoveryError, DiscoverySessionStore,
    ExportAgreementCommand, ExportAgreementHandler, LoadSessionHandler, LoadSessionQuery,
};
