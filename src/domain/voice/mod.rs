//! Voice session domain module.
//!
//! Plain data and rules for a spoken discovery call: turn-taking states,
//! the transcript and exchange history, the insight payload returned with
//! each agent reply, the pending-utterance buffer and on-device voice
//! selection. The controller that drives these lives in
//! `application::voice`.

mod errors;
mod insight;
mod state;
mod transcript;
mod utterance;
mod voice_select;

pub use errors::{VoiceError, UNSUPPORTED_BROWSER_MESSAGE};
pub use insight::{AgentReply, AutomationSuggestion, ConversationStage, HeardPainPoint, InsightPayload};
pub use state::VoiceState;
pub use transcript::{storage_key, ChatMessage, ChatRole, Speaker, TranscriptEntry, VoiceTranscript};
pub use utterance::PendingUtterance;
pub use voice_select::{select_voice, VoiceInfo, DEFAULT_VOICE_PRIORITY};
