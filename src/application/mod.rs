//! Application layer - Commands, Queries, Handlers and the voice controller.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The wizard handlers are request/response; the voice controller is a
//! long-lived actor per call.

pub mod handlers;
pub mod voice;

pub use handlers::{
    AgentTurnCommand, AgentTurnHandler, ApplyCommandCommand, ApplyCommandHandler, DiscoveryError,
    DiscoverySessionStore, ExportAgreementCommand, ExportAgreementHandler, LoadSessionHandler,
    LoadSessionQuery,
};
pub use voice::{
    VoicePorts, VoiceSessionContext, VoiceSessionHandle, VoiceSnapshot, VoiceTimings,
    VoiceTurnController,
};
