//! The wizard transition function.

use std::sync::Arc;

use tracing::debug;

use super::catalog::WizardCatalog;
use super::command::SessionCommand;
use super::errors::WizardError;
use super::session::DiscoverySession;
use crate::domain::foundation::{SessionId, Timestamp};

/// Applies [`SessionCommand`]s to [`DiscoverySession`] snapshots.
///
/// `apply` never mutates its input: it returns a new session or an error,
/// leaving the caller's copy untouched either way.
#[derive(Debug, Clone)]
pub struct DiscoveryWizard {
    catalog: Arc<WizardCatalog>,
}

impl DiscoveryWizard {
    pub fn new(catalog: Arc<WizardCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &WizardCatalog {
        &self.catalog
    }

    /// A fresh session with catalog defaults.
    pub fn new_session(&self, id: SessionId, created_at: Timestamp) -> DiscoverySession {
        DiscoverySession::new(id, &self.catalog, created_at)
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// - `AgreementFrozen` for any non-navigation command after agreement
    /// - `StepLocked` when the command belongs to another step
    /// - `GuardFailed` / `NoSuchStep` for navigation that cannot proceed
    /// - not-found and validation errors from the individual operations
    pub fn apply(
        &self,
        session: &DiscoverySession,
        command: SessionCommand,
    ) -> Result<DiscoverySession, WizardError> {
        let name = command.name();

        if !command.allowed_when_frozen() {
            session.ensure_not_frozen()?;
        }
        // Re-agreeing a signed session is a no-op from any step.
        let repeat_agree = session.is_agreed() && matches!(command, SessionCommand::Agree { .. });
        if let Some(step) = command.home_step().filter(|_| !repeat_agree) {
            session.ensure_step(name, step)?;
        }

        let catalog = self.catalog.as_ref();
        let mut next = session.clone();
        match command {
            SessionCommand::UpdateSnapshot { patch } => next.update_snapshot(patch, catalog),
            SessionCommand::TogglePainPoint { id } => next.toggle_pain_point(&id, catalog)?,
            SessionCommand::AddCustomPainPoint { id, label } => {
                next.add_custom_pain_point(id, &label, catalog)?
            }
            SessionCommand::RemovePainPoint { id } => next.remove_pain_point(&id, catalog)?,
            SessionCommand::SetPainPointHours { id, hours } => {
                next.set_pain_point_hours(&id, hours, catalog)?
            }
            SessionCommand::SetPainPointConsequence { id, consequence } => {
                next.set_pain_point_consequence(&id, consequence)?
            }
            SessionCommand::ReorderPainPoint { moved, target } => {
                next.reorder_pain_point(&moved, &target)?
            }
            SessionCommand::OverrideHourlyRate {
                pain_point_id,
                hourly_rate,
            } => next.override_hourly_rate(&pain_point_id, hourly_rate)?,
            SessionCommand::OverrideImpact {
                pain_point_id,
                impact,
            } => next.override_impact(&pain_point_id, impact)?,
            SessionCommand::AddMetric { id } => next.add_metric(id, catalog),
            SessionCommand::UpdateMetric { id, patch } => next.update_metric(&id, patch)?,
            SessionCommand::RemoveMetric { id } => next.remove_metric(&id)?,
            SessionCommand::SetValueShare { percent } => next.set_value_share(percent)?,
            SessionCommand::SetBaselineDays { days } => next.set_baseline_days(days)?,
            SessionCommand::SetMeasurementDays { days } => next.set_measurement_days(days)?,
            SessionCommand::SetClientName { name } => next.set_client_name(name),
            SessionCommand::SetClientEmail { email } => next.set_client_email(email),
            SessionCommand::Agree { at } => next.agree(at)?,
            SessionCommand::Advance { fresh } => next.advance(catalog, fresh)?,
            SessionCommand::Back => next.back()?,
            SessionCommand::Reset { created_at } => {
                debug!(session_id = %session.id(), "Resetting discovery session");
                return Ok(self.new_session(*session.id(), created_at));
            }
        }

        debug!(
            session_id = %next.id(),
            command = name,
            step = next.current_step().ordinal(),
            "Applied wizard command"
        );
        Ok(next)
    }

    /// Applies commands in order, stopping at the first error.
    pub fn apply_all(
        &self,
        session: &DiscoverySession,
        commands: impl IntoIterator<Item = SessionCommand>,
    ) -> Result<DiscoverySession, WizardError> {
        commands
            .into_iter()
            .try_fold(session.clone(), |current, command| self.apply(&current, command))
    }
}

impl Default for DiscoveryWizard {
    fn default() -> Self {
        Self::new(Arc::new(WizardCatalog::standard()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discovery::metrics::MetricPatch;
    use crate::domain::discovery::snapshot::{RevenueRange, SnapshotPatch, TeamSize};
    use crate::domain::discovery::step::WizardStep;
    use crate::domain::discovery::value_map::CustomerImpact;
    use crate::domain::foundation::PainPointId;
    use proptest::prelude::*;

    fn wizard() -> DiscoveryWizard {
        DiscoveryWizard::default()
    }

    fn pid(id: &str) -> PainPointId {
        PainPointId::new(id).unwrap()
    }

    fn snapshot_patch() -> SnapshotPatch {
        SnapshotPatch::default()
            .business_name("Coastal Property Management")
            .industry("Property Management")
            .team_size(TeamSize::TwoToFive)
            .revenue_range(RevenueRange::From100KTo500K)
            .typical_day("Answering tenant calls and chasing invoices all day")
    }

    fn at_pain_points() -> DiscoverySession {
        let w = wizard();
        let s = w.new_session(SessionId::new(), Timestamp::now());
        w.apply_all(
            &s,
            [
                SessionCommand::UpdateSnapshot { patch: snapshot_patch() },
                SessionCommand::advance(),
            ],
        )
        .unwrap()
    }

    fn at_value_mapping() -> DiscoverySession {
        wizard()
            .apply_all(
                &at_pain_points(),
                [
                    SessionCommand::TogglePainPoint { id: pid("scheduling") },
                    SessionCommand::TogglePainPoint { id: pid("invoicing") },
                    SessionCommand::TogglePainPoint { id: pid("lead-response") },
                    SessionCommand::SetPainPointHours { id: pid("scheduling"), hours: Some(12.0) },
                    SessionCommand::SetPainPointHours { id: pid("invoicing"), hours: Some(6.0) },
                    SessionCommand::SetPainPointHours { id: pid("lead-response"), hours: Some(3.0) },
                    SessionCommand::advance(),
                ],
            )
            .unwrap()
    }

    fn at_agreement() -> DiscoverySession {
        wizard()
            .apply_all(
                &at_value_mapping(),
                [SessionCommand::advance(), SessionCommand::advance(), SessionCommand::advance()],
            )
            .unwrap()
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let w = wizard();
        let s = w.new_session(SessionId::new(), Timestamp::now());
        let before = s.clone();
        let next = w
            .apply(&s, SessionCommand::UpdateSnapshot { patch: snapshot_patch() })
            .unwrap();
        assert_eq!(s, before);
        assert_ne!(next, s);
    }

    #[test]
    fn snapshot_guard_blocks_incomplete_profile() {
        let w = wizard();
        let s = w.new_session(SessionId::new(), Timestamp::now());
        let err = w.apply(&s, SessionCommand::advance()).unwrap_err();
        assert!(matches!(err, WizardError::GuardFailed { step: WizardStep::Snapshot, .. }));
    }

    #[test]
    fn snapshot_is_locked_after_first_step() {
        let s = at_pain_points();
        let err = wizard()
            .apply(&s, SessionCommand::UpdateSnapshot { patch: SnapshotPatch::default() })
            .unwrap_err();
        assert!(matches!(err, WizardError::StepLocked { allowed: WizardStep::Snapshot, .. }));
    }

    #[test]
    fn pain_point_guard_needs_two_selected_and_hours() {
        let w = wizard();
        let one = w
            .apply(&at_pain_points(), SessionCommand::TogglePainPoint { id: pid("scheduling") })
            .unwrap();
        assert!(w.apply(&one, SessionCommand::advance()).is_err());

        let two = w
            .apply(&one, SessionCommand::TogglePainPoint { id: pid("reporting") })
            .unwrap();
        assert!(w.apply(&two, SessionCommand::advance()).is_err());

        let with_hours = w
            .apply(&two, SessionCommand::SetPainPointHours { id: pid("reporting"), hours: Some(2.0) })
            .unwrap();
        let advanced = w.apply(&with_hours, SessionCommand::advance()).unwrap();
        assert_eq!(advanced.current_step(), WizardStep::ValueMapping);
    }

    #[test]
    fn toggling_maintains_contiguous_ranks() {
        let w = wizard();
        let s = w
            .apply_all(
                &at_pain_points(),
                [
                    SessionCommand::TogglePainPoint { id: pid("scheduling") },
                    SessionCommand::TogglePainPoint { id: pid("invoicing") },
                    SessionCommand::TogglePainPoint { id: pid("reporting") },
                    SessionCommand::TogglePainPoint { id: pid("scheduling") },
                ],
            )
            .unwrap();
        let order: Vec<&str> = s.ranked_pain_points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["invoicing", "reporting"]);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn custom_pain_points_append_and_only_they_can_be_removed() {
        let w = wizard();
        let s = w
            .apply_all(
                &at_pain_points(),
                [
                    SessionCommand::TogglePainPoint { id: pid("scheduling") },
                    SessionCommand::AddCustomPainPoint { id: pid("permits"), label: " Permit tracking ".into() },
                ],
            )
            .unwrap();
        let custom = s.pain_points().iter().find(|p| p.id == pid("permits")).unwrap();
        assert_eq!(custom.label, "Permit tracking");
        assert_eq!(custom.rank, Some(1));

        assert!(matches!(
            w.apply(&s, SessionCommand::RemovePainPoint { id: pid("scheduling") }),
            Err(WizardError::NotCustom(_))
        ));
        let removed = w.apply(&s, SessionCommand::RemovePainPoint { id: pid("permits") }).unwrap();
        assert_eq!(removed.pain_points().len(), 6);
        assert!(removed.check_invariants().is_ok());
    }

    #[test]
    fn blank_custom_label_is_rejected() {
        let err = wizard()
            .apply(&at_pain_points(), SessionCommand::add_custom_pain_point("   "))
            .unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
    }

    #[test]
    fn hours_outside_week_are_rejected() {
        let err = wizard()
            .apply(
                &at_pain_points(),
                SessionCommand::SetPainPointHours { id: pid("scheduling"), hours: Some(169.0) },
            )
            .unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
    }

    #[test]
    fn value_map_uses_snapshot_rate_and_hours_order() {
        let s = at_value_mapping();
        let ids: Vec<&str> = s.value_map().iter().map(|v| v.pain_point_id.as_str()).collect();
        assert_eq!(ids, vec!["scheduling", "invoicing", "lead-response"]);
        assert_eq!(s.value_map()[0].hourly_rate, 35);
        assert_eq!(s.value_map()[0].annual_cost, 28_392);
        assert_eq!(s.value_map()[0].customer_impact, CustomerImpact::Medium);
    }

    #[test]
    fn unselecting_removes_value_map_entry() {
        let w = wizard();
        let s = w
            .apply_all(
                &at_value_mapping(),
                [SessionCommand::Back, SessionCommand::TogglePainPoint { id: pid("invoicing") }],
            )
            .unwrap();
        assert!(s.value_map().iter().all(|v| v.pain_point_id != pid("invoicing")));
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn rate_override_recomputes_cost() {
        let s = wizard()
            .apply(
                &at_value_mapping(),
                SessionCommand::OverrideHourlyRate { pain_point_id: pid("invoicing"), hourly_rate: 50 },
            )
            .unwrap();
        let item = s.value_map().iter().find(|v| v.pain_point_id == pid("invoicing")).unwrap();
        assert_eq!(item.annual_cost, 17_940);
        assert_eq!(item.customer_impact, CustomerImpact::Low);
    }

    #[test]
    fn override_on_missing_entry_fails() {
        let err = wizard()
            .apply(
                &at_value_mapping(),
                SessionCommand::OverrideImpact { pain_point_id: pid("reporting"), impact: CustomerImpact::High },
            )
            .unwrap_err();
        assert!(matches!(err, WizardError::ValueMapItemNotFound(_)));
    }

    #[test]
    fn opportunities_generate_once_on_entering_automation() {
        let w = wizard();
        let s = w.apply(&at_value_mapping(), SessionCommand::advance()).unwrap();
        assert_eq!(s.current_step(), WizardStep::Automation);
        assert_eq!(s.automation_opportunities().len(), 3);
        assert_eq!(s.automation_opportunities()[0].title, "Smart Scheduling Coordinator");

        let first_ids: Vec<_> = s.automation_opportunities().iter().map(|o| o.id).collect();
        let again = w
            .apply_all(
                &s,
                [
                    SessionCommand::Back,
                    SessionCommand::OverrideHourlyRate { pain_point_id: pid("lead-response"), hourly_rate: 500 },
                    SessionCommand::advance(),
                ],
            )
            .unwrap();
        let ids: Vec<_> = again.automation_opportunities().iter().map(|o| o.id).collect();
        assert_eq!(ids, first_ids);
    }

    #[test]
    fn short_fresh_ids_still_yield_top_three() {
        use crate::domain::discovery::command::FreshIds;
        use crate::domain::foundation::OpportunityId;

        let given = OpportunityId::new();
        let s = wizard()
            .apply(
                &at_value_mapping(),
                SessionCommand::Advance {
                    fresh: FreshIds { opportunities: vec![given], metrics: vec![] },
                },
            )
            .unwrap();
        assert_eq!(s.value_map().len(), 3);
        assert_eq!(s.automation_opportunities().len(), 3);
        assert_eq!(s.automation_opportunities()[0].id, given);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn opportunity_is_pruned_when_its_pain_point_leaves() {
        let w = wizard();
        let s = w
            .apply_all(
                &at_value_mapping(),
                [
                    SessionCommand::advance(),
                    SessionCommand::Back,
                    SessionCommand::Back,
                    SessionCommand::SetPainPointHours { id: pid("invoicing"), hours: Some(0.0) },
                ],
            )
            .unwrap();
        assert_eq!(s.automation_opportunities().len(), 2);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn metrics_generate_on_entering_metrics_step() {
        let w = wizard();
        let s = w
            .apply_all(&at_value_mapping(), [SessionCommand::advance(), SessionCommand::advance()])
            .unwrap();
        let names: Vec<&str> = s.agreement().metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Scheduling Time Saved",
                "Invoice & Follow-Up Agent - Hours Saved",
                "Lead Response Time",
                "Lead Conversion Rate",
            ]
        );
    }

    #[test]
    fn metrics_guard_needs_a_named_metric() {
        let w = wizard();
        let s = w
            .apply_all(&at_value_mapping(), [SessionCommand::advance(), SessionCommand::advance()])
            .unwrap();
        let ids: Vec<_> = s.agreement().metrics.iter().map(|m| m.id).collect();
        let cleared = w
            .apply_all(&s, ids.into_iter().map(|id| SessionCommand::RemoveMetric { id }))
            .unwrap();
        assert!(w.apply(&cleared, SessionCommand::advance()).is_err());

        let id = crate::domain::foundation::MetricId::new();
        let named = w
            .apply_all(
                &cleared,
                [
                    SessionCommand::AddMetric { id },
                    SessionCommand::UpdateMetric { id, patch: MetricPatch::default().name("Tenant NPS") },
                ],
            )
            .unwrap();
        assert_eq!(
            w.apply(&named, SessionCommand::advance()).unwrap().current_step(),
            WizardStep::Agreement
        );
    }

    #[test]
    fn value_share_is_bounded() {
        let w = wizard();
        let s = w
            .apply_all(&at_value_mapping(), [SessionCommand::advance(), SessionCommand::advance()])
            .unwrap();
        assert!(w.apply(&s, SessionCommand::SetValueShare { percent: 26 }).is_err());
        assert!(w.apply(&s, SessionCommand::SetBaselineDays { days: 0 }).is_err());
        let updated = w.apply(&s, SessionCommand::SetValueShare { percent: 20 }).unwrap();
        assert_eq!(updated.agreement().value_share_percent.value(), 20);
    }

    #[test]
    fn agree_requires_signer_and_stamps_once() {
        let w = wizard();
        let s = at_agreement();
        assert!(matches!(
            w.apply(&s, SessionCommand::agree()),
            Err(WizardError::SignerIncomplete)
        ));

        let first = Timestamp::now();
        let signed = w
            .apply_all(
                &s,
                [
                    SessionCommand::SetClientName { name: "Dana Reyes".into() },
                    SessionCommand::SetClientEmail { email: "dana@coastal.example".into() },
                    SessionCommand::Agree { at: first },
                ],
            )
            .unwrap();
        assert_eq!(signed.agreement().agreed_at, Some(first));

        let again = w.apply(&signed, SessionCommand::agree()).unwrap();
        assert_eq!(again.agreement().agreed_at, Some(first));
    }

    #[test]
    fn signed_session_is_frozen_except_navigation() {
        let w = wizard();
        let signed = w
            .apply_all(
                &at_agreement(),
                [
                    SessionCommand::SetClientName { name: "Dana".into() },
                    SessionCommand::SetClientEmail { email: "dana@example.com".into() },
                    SessionCommand::agree(),
                ],
            )
            .unwrap();
        assert!(matches!(
            w.apply(&signed, SessionCommand::SetClientName { name: "Eve".into() }),
            Err(WizardError::AgreementFrozen)
        ));
        let back = w.apply(&signed, SessionCommand::Back).unwrap();
        assert_eq!(back.current_step(), WizardStep::Metrics);
        assert!(matches!(
            w.apply(&back, SessionCommand::SetValueShare { percent: 10 }),
            Err(WizardError::AgreementFrozen)
        ));
    }

    #[test]
    fn agreeing_again_off_the_agreement_step_is_a_no_op() {
        let w = wizard();
        let first = Timestamp::now();
        let back = w
            .apply_all(
                &at_agreement(),
                [
                    SessionCommand::SetClientName { name: "Dana".into() },
                    SessionCommand::SetClientEmail { email: "dana@example.com".into() },
                    SessionCommand::Agree { at: first },
                    SessionCommand::Back,
                ],
            )
            .unwrap();

        let again = w.apply(&back, SessionCommand::agree()).unwrap();
        assert_eq!(again, back);
        assert_eq!(again.agreement().agreed_at, Some(first));

        let unsigned = w.apply(&at_value_mapping(), SessionCommand::agree());
        assert!(matches!(unsigned, Err(WizardError::StepLocked { .. })));
    }

    #[test]
    fn value_split_uses_share() {
        let s = at_agreement();
        let split = s.value_split();
        assert_eq!(split.total_savings, s.total_savings());
        assert_eq!(split.our_share, (s.total_savings() as f64 * 0.12).round() as u64);
        assert_eq!(split.our_share + split.their_share, split.total_savings);
    }

    #[test]
    fn reset_restores_defaults_and_keeps_id() {
        let w = wizard();
        let s = at_agreement();
        let reset = w.apply(&s, SessionCommand::reset()).unwrap();
        assert_eq!(reset.id(), s.id());
        assert_eq!(reset.current_step(), WizardStep::Snapshot);
        assert!(reset.value_map().is_empty());
        assert!(reset.automation_opportunities().is_empty());
        assert_eq!(reset.pain_points(), w.catalog().default_pain_points().as_slice());
        assert!(reset.agreement().agreed_at.is_none());
    }

    #[test]
    fn back_before_first_step_fails() {
        let w = wizard();
        let s = w.new_session(SessionId::new(), Timestamp::now());
        assert!(matches!(
            w.apply(&s, SessionCommand::Back),
            Err(WizardError::NoSuchStep { .. })
        ));
    }

    fn pain_point_command() -> impl Strategy<Value = SessionCommand> {
        let ids = prop_oneof![
            Just("lead-response"),
            Just("scheduling"),
            Just("data-entry"),
            Just("client-comms"),
            Just("invoicing"),
            Just("reporting"),
        ];
        (ids.clone(), ids, 0u8..4, proptest::option::of(0.0f64..30.0)).prop_map(
            |(a, b, kind, hours)| match kind {
                0 => SessionCommand::TogglePainPoint { id: pid(a) },
                1 => SessionCommand::SetPainPointHours { id: pid(a), hours },
                2 => SessionCommand::ReorderPainPoint { moved: pid(a), target: pid(b) },
                _ => SessionCommand::add_custom_pain_point(format!("Custom {}", b)),
            },
        )
    }

    proptest! {
        #[test]
        fn invariants_hold_under_any_pain_point_edits(
            commands in proptest::collection::vec(pain_point_command(), 0..25)
        ) {
            let w = wizard();
            let mut session = at_pain_points();
            for command in commands {
                if let Ok(next) = w.apply(&session, command) {
                    session = next;
                }
                prop_assert!(session.check_invariants().is_ok(), "{:?}", session.check_invariants());
            }
        }
    }
}
