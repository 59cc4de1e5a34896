//! The six ordered wizard steps.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Position in the wizard, serialized as its 0-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    Snapshot,
    PainPoints,
    ValueMapping,
    Automation,
    Metrics,
    Agreement,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Snapshot,
        WizardStep::PainPoints,
        WizardStep::ValueMapping,
        WizardStep::Automation,
        WizardStep::Metrics,
        WizardStep::Agreement,
    ];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.ordinal() as usize + 1).copied()
    }

    pub fn previous(&self) -> Option<WizardStep> {
        (self.ordinal() as usize)
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Snapshot => "Business Snapshot",
            WizardStep::PainPoints => "Pain Points",
            WizardStep::ValueMapping => "Value Mapping",
            WizardStep::Automation => "Automation Opportunities",
            WizardStep::Metrics => "Metrics & Terms",
            WizardStep::Agreement => "Agreement",
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Snapshot
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.ordinal()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| ValidationError::out_of_range("currentStep", 0, 5, i64::from(value)))
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl StateMachine for WizardStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// One step forward or one step back.
    fn valid_transitions(&self) -> Vec<Self> {
        [self.previous(), self.next()].into_iter().flatten().collect()
    }

    fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_zero_based() {
        assert_eq!(WizardStep::Snapshot.ordinal(), 0);
        assert_eq!(WizardStep::Agreement.ordinal(), 5);
    }

    #[test]
    fn next_and_previous_stop_at_ends() {
        assert_eq!(WizardStep::Snapshot.previous(), None);
        assert_eq!(WizardStep::Agreement.next(), None);
        assert_eq!(WizardStep::Automation.next(), Some(WizardStep::Metrics));
    }

    #[test]
    fn transitions_are_adjacent_only() {
        assert!(WizardStep::PainPoints.can_transition_to(&WizardStep::Snapshot));
        assert!(WizardStep::PainPoints.can_transition_to(&WizardStep::ValueMapping));
        assert!(WizardStep::PainPoints.transition_to(WizardStep::Metrics).is_err());
        assert!(WizardStep::Agreement.is_terminal());
    }

    #[test]
    fn serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&WizardStep::Metrics).unwrap(), "4");
        let step: WizardStep = serde_json::from_str("2").unwrap();
        assert_eq!(step, WizardStep::ValueMapping);
        assert!(serde_json::from_str::<WizardStep>("6").is_err());
    }
}
