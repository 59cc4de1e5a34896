//! Voice session orchestration.

mod controller;

pub use controller::{
    VoicePorts, VoiceSessionContext, VoiceSessionHandle, VoiceSnapshot, VoiceTimings,
    VoiceTurnController,
};
