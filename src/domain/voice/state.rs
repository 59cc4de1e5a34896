//! Voice controller states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Turn-taking state of a voice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceState {
    #[default]
    Idle,
    Listening,
    Processing,
    Speaking,
}

impl VoiceState {
    /// Status line shown to the client.
    pub fn label(&self) -> &'static str {
        match self {
            VoiceState::Idle => "Ready",
            VoiceState::Listening => "Listening...",
            VoiceState::Processing => "Thinking...",
            VoiceState::Speaking => "Speaking...",
        }
    }
}

impl fmt::Display for VoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoiceState::Idle => "idle",
            VoiceState::Listening => "listening",
            VoiceState::Processing => "processing",
            VoiceState::Speaking => "speaking",
        };
        f.write_str(s)
    }
}

impl StateMachine for VoiceState {
    fn can_transition_to(&self, target: &Self) -> bool {
        // Reset may return to idle from anywhere.
        *target == VoiceState::Idle || self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use VoiceState::*;
        match self {
            Idle => vec![Processing],
            Listening => vec![Listening, Processing],
            Processing => vec![Speaking, Listening],
            Speaking => vec![Listening, Idle],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_cycle_is_valid() {
        let s = VoiceState::Idle;
        let s = s.transition_to(VoiceState::Processing).unwrap();
        let s = s.transition_to(VoiceState::Speaking).unwrap();
        let s = s.transition_to(VoiceState::Listening).unwrap();
        let s = s.transition_to(VoiceState::Processing).unwrap();
        assert_eq!(s, VoiceState::Processing);
    }

    #[test]
    fn cannot_speak_while_listening() {
        assert!(VoiceState::Listening.transition_to(VoiceState::Speaking).is_err());
        assert!(VoiceState::Idle.transition_to(VoiceState::Listening).is_err());
    }

    #[test]
    fn idle_is_always_reachable() {
        for state in [VoiceState::Listening, VoiceState::Processing, VoiceState::Speaking] {
            assert!(state.can_transition_to(&VoiceState::Idle));
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&VoiceState::Speaking).unwrap(), "\"speaking\"");
    }
}
