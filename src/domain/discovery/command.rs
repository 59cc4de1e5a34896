//! Commands accepted by the discovery wizard.
//!
//! Every command carries the ids and timestamps it needs so applying it is
//! deterministic. When a command arrives as JSON without them, serde fills
//! in fresh values.

use serde::{Deserialize, Serialize};

use super::metrics::MetricPatch;
use super::opportunity::MAX_OPPORTUNITIES;
use super::snapshot::SnapshotPatch;
use super::step::WizardStep;
use super::value_map::CustomerImpact;
use crate::domain::foundation::{MetricId, OpportunityId, PainPointId, Timestamp};

/// Upper bound on metrics a single template contributes per opportunity.
const METRICS_PER_OPPORTUNITY: usize = 2;

/// Pre-allocated identifiers for records generated when advancing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshIds {
    pub opportunities: Vec<OpportunityId>,
    pub metrics: Vec<MetricId>,
}

impl FreshIds {
    pub fn generate() -> Self {
        Self {
            opportunities: (0..MAX_OPPORTUNITIES).map(|_| OpportunityId::new()).collect(),
            metrics: (0..MAX_OPPORTUNITIES * METRICS_PER_OPPORTUNITY)
                .map(|_| MetricId::new())
                .collect(),
        }
    }
}

impl Default for FreshIds {
    fn default() -> Self {
        Self::generate()
    }
}

fn fresh_pain_point_id() -> PainPointId {
    PainPointId::custom()
}

/// A single user action on a discovery session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionCommand {
    UpdateSnapshot {
        patch: SnapshotPatch,
    },
    TogglePainPoint {
        id: PainPointId,
    },
    AddCustomPainPoint {
        #[serde(default = "fresh_pain_point_id")]
        id: PainPointId,
        label: String,
    },
    RemovePainPoint {
        id: PainPointId,
    },
    SetPainPointHours {
        id: PainPointId,
        hours: Option<f64>,
    },
    SetPainPointConsequence {
        id: PainPointId,
        consequence: String,
    },
    ReorderPainPoint {
        moved: PainPointId,
        target: PainPointId,
    },
    OverrideHourlyRate {
        pain_point_id: PainPointId,
        hourly_rate: u32,
    },
    OverrideImpact {
        pain_point_id: PainPointId,
        impact: CustomerImpact,
    },
    AddMetric {
        #[serde(default)]
        id: MetricId,
    },
    UpdateMetric {
        id: MetricId,
        patch: MetricPatch,
    },
    RemoveMetric {
        id: MetricId,
    },
    SetValueShare {
        percent: u8,
    },
    SetBaselineDays {
        days: u32,
    },
    SetMeasurementDays {
        days: u32,
    },
    SetClientName {
        name: String,
    },
    SetClientEmail {
        email: String,
    },
    Agree {
        #[serde(default)]
        at: Timestamp,
    },
    Advance {
        #[serde(default)]
        fresh: FreshIds,
    },
    Back,
    Reset {
        #[serde(default)]
        created_at: Timestamp,
    },
}

impl SessionCommand {
    pub fn add_custom_pain_point(label: impl Into<String>) -> Self {
        SessionCommand::AddCustomPainPoint {
            id: PainPointId::custom(),
            label: label.into(),
        }
    }

    pub fn add_metric() -> Self {
        SessionCommand::AddMetric { id: MetricId::new() }
    }

    pub fn agree() -> Self {
        SessionCommand::Agree { at: Timestamp::now() }
    }

    pub fn advance() -> Self {
        SessionCommand::Advance {
            fresh: FreshIds::generate(),
        }
    }

    pub fn reset() -> Self {
        SessionCommand::Reset {
            created_at: Timestamp::now(),
        }
    }

    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::UpdateSnapshot { .. } => "UpdateSnapshot",
            SessionCommand::TogglePainPoint { .. } => "TogglePainPoint",
            SessionCommand::AddCustomPainPoint { .. } => "AddCustomPainPoint",
            SessionCommand::RemovePainPoint { .. } => "RemovePainPoint",
            SessionCommand::SetPainPointHours { .. } => "SetPainPointHours",
            SessionCommand::SetPainPointConsequence { .. } => "SetPainPointConsequence",
            SessionCommand::ReorderPainPoint { .. } => "ReorderPainPoint",
            SessionCommand::OverrideHourlyRate { .. } => "OverrideHourlyRate",
            SessionCommand::OverrideImpact { .. } => "OverrideImpact",
            SessionCommand::AddMetric { .. } => "AddMetric",
            SessionCommand::UpdateMetric { .. } => "UpdateMetric",
            SessionCommand::RemoveMetric { .. } => "RemoveMetric",
            SessionCommand::SetValueShare { .. } => "SetValueShare",
            SessionCommand::SetBaselineDays { .. } => "SetBaselineDays",
            SessionCommand::SetMeasurementDays { .. } => "SetMeasurementDays",
            SessionCommand::SetClientName { .. } => "SetClientName",
            SessionCommand::SetClientEmail { .. } => "SetClientEmail",
            SessionCommand::Agree { .. } => "Agree",
            SessionCommand::Advance { .. } => "Advance",
            SessionCommand::Back => "Back",
            SessionCommand::Reset { .. } => "Reset",
        }
    }

    /// The step on which this command may be issued. Navigation and reset
    /// are available everywhere.
    pub fn home_step(&self) -> Option<WizardStep> {
        match self {
            SessionCommand::UpdateSnapshot { .. } => Some(WizardStep::Snapshot),
            SessionCommand::TogglePainPoint { .. }
            | SessionCommand::AddCustomPainPoint { .. }
            | SessionCommand::RemovePainPoint { .. }
            | SessionCommand::SetPainPointHours { .. }
            | SessionCommand::SetPainPointConsequence { .. }
            | SessionCommand::ReorderPainPoint { .. } => Some(WizardStep::PainPoints),
            SessionCommand::OverrideHourlyRate { .. } | SessionCommand::OverrideImpact { .. } => {
                Some(WizardStep::ValueMapping)
            }
            SessionCommand::AddMetric { .. }
            | SessionCommand::UpdateMetric { .. }
            | SessionCommand::RemoveMetric { .. }
            | SessionCommand::SetValueShare { .. }
            | SessionCommand::SetBaselineDays { .. }
            | SessionCommand::SetMeasurementDays { .. } => Some(WizardStep::Metrics),
            SessionCommand::SetClientName { .. }
            | SessionCommand::SetClientEmail { .. }
            | SessionCommand::Agree { .. } => Some(WizardStep::Agreement),
            SessionCommand::Advance { .. } | SessionCommand::Back | SessionCommand::Reset { .. } => None,
        }
    }

    /// Whether the command is still accepted after the agreement is signed.
    pub fn allowed_when_frozen(&self) -> bool {
        matches!(
            self,
            SessionCommand::Advance { .. }
                | SessionCommand::Back
                | SessionCommand::Reset { .. }
                | SessionCommand::Agree { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_json_with_camel_case_fields() {
        let cmd: SessionCommand = serde_json::from_str(
            r#"{"type": "override_hourly_rate", "painPointId": "scheduling", "hourlyRate": 55}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            SessionCommand::OverrideHourlyRate {
                pain_point_id: PainPointId::new("scheduling").unwrap(),
                hourly_rate: 55,
            }
        );
    }

    #[test]
    fn missing_ids_are_generated() {
        let cmd: SessionCommand =
            serde_json::from_str(r#"{"type": "add_custom_pain_point", "label": "Permits"}"#).unwrap();
        assert!(matches!(cmd, SessionCommand::AddCustomPainPoint { ref label, .. } if label == "Permits"));

        let cmd: SessionCommand = serde_json::from_str(r#"{"type": "advance"}"#).unwrap();
        match cmd {
            SessionCommand::Advance { fresh } => {
                assert_eq!(fresh.opportunities.len(), 3);
                assert_eq!(fresh.metrics.len(), 6);
            }
            other => panic!("expected Advance, got {:?}", other),
        }
    }

    #[test]
    fn unit_variant_round_trips() {
        let json = serde_json::to_string(&SessionCommand::Back).unwrap();
        assert_eq!(json, r#"{"type":"back"}"#);
    }

    #[test]
    fn home_steps_cover_each_stage() {
        assert_eq!(
            SessionCommand::SetValueShare { percent: 10 }.home_step(),
            Some(WizardStep::Metrics)
        );
        assert_eq!(SessionCommand::agree().home_step(), Some(WizardStep::Agreement));
        assert_eq!(SessionCommand::Back.home_step(), None);
    }

    #[test]
    fn only_navigation_reset_and_agree_survive_freeze() {
        assert!(SessionCommand::Back.allowed_when_frozen());
        assert!(SessionCommand::agree().allowed_when_frozen());
        assert!(!SessionCommand::SetClientName { name: "x".into() }.allowed_when_frozen());
    }
}
