//! Discovery session aggregate.
//!
//! The unit of persistence for the wizard. Fields are private; state only
//! changes through [`DiscoveryWizard::apply`](super::DiscoveryWizard::apply),
//! which works on a clone and hands back the new snapshot.

use serde::{Deserialize, Serialize};

use super::agreement::{self, Agreement, ValueSplit};
use super::catalog::WizardCatalog;
use super::command::FreshIds;
use super::errors::WizardError;
use super::metrics::{self, MetricPatch, SuccessMetric};
use super::opportunity::{self, AutomationOpportunity, MAX_OPPORTUNITIES};
use super::pain_point::{self, PainPoint};
use super::snapshot::{BusinessSnapshot, SnapshotPatch};
use super::step::WizardStep;
use super::value_map::{self, CustomerImpact, ValueMapItem};
use crate::domain::foundation::{MetricId, OpportunityId, PainPointId, SessionId, Timestamp};

/// Storage key for a session's wizard state.
pub fn storage_key(id: &SessionId) -> String {
    format!("discovery-session-{}", id)
}

/// Wizard aggregate.
///
/// # Invariants
///
/// - `value_map` holds exactly the selected pain points with hours > 0
/// - `automation_opportunities` has at most 3 entries, each referencing a
///   value-map entry
/// - selected pain points hold ranks `0..n`; unselected ones hold none
/// - `agreement.agreed_at` is set at most once, cleared only by reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySession {
    id: SessionId,
    created_at: Timestamp,
    current_step: WizardStep,
    business_snapshot: BusinessSnapshot,
    pain_points: Vec<PainPoint>,
    value_map: Vec<ValueMapItem>,
    automation_opportunities: Vec<AutomationOpportunity>,
    agreement: Agreement,
}

impl DiscoverySession {
    /// Creates a session with all-default values.
    pub fn new(id: SessionId, catalog: &WizardCatalog, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            current_step: WizardStep::Snapshot,
            business_snapshot: BusinessSnapshot::default(),
            pain_points: catalog.default_pain_points(),
            value_map: Vec::new(),
            automation_opportunities: Vec::new(),
            agreement: Agreement::default(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn business_snapshot(&self) -> &BusinessSnapshot {
        &self.business_snapshot
    }

    pub fn pain_points(&self) -> &[PainPoint] {
        &self.pain_points
    }

    pub fn value_map(&self) -> &[ValueMapItem] {
        &self.value_map
    }

    pub fn automation_opportunities(&self) -> &[AutomationOpportunity] {
        &self.automation_opportunities
    }

    pub fn agreement(&self) -> &Agreement {
        &self.agreement
    }

    // ─── Derived figures ─────────────────────────────────────────────

    /// Default hourly rate implied by the snapshot's buckets.
    pub fn hourly_rate(&self, catalog: &WizardCatalog) -> u32 {
        catalog.rates.hourly_rate(
            self.business_snapshot.revenue_range,
            self.business_snapshot.team_size,
        )
    }

    /// Selected pain points in rank order.
    pub fn ranked_pain_points(&self) -> Vec<&PainPoint> {
        pain_point::ranked(&self.pain_points)
    }

    pub fn total_annual_cost(&self) -> u64 {
        value_map::total_annual_cost(&self.value_map)
    }

    pub fn total_hours_per_week(&self) -> f64 {
        value_map::total_hours_per_week(&self.value_map)
    }

    pub fn total_savings(&self) -> u64 {
        opportunity::total_savings(&self.automation_opportunities)
    }

    pub fn value_split(&self) -> ValueSplit {
        self.agreement.value_split(self.total_savings())
    }

    pub fn is_agreed(&self) -> bool {
        self.agreement.is_agreed()
    }

    /// Why the current step cannot be left forward, if it cannot.
    pub fn advance_blocker(&self) -> Option<String> {
        match self.current_step {
            WizardStep::Snapshot => {
                let missing = self.business_snapshot.missing_fields();
                (!missing.is_empty()).then(|| format!("missing {}", missing.join(", ")))
            }
            WizardStep::PainPoints => {
                let selected: Vec<&PainPoint> =
                    self.pain_points.iter().filter(|p| p.selected).collect();
                if selected.len() < 2 {
                    Some("select at least 2 pain points".to_string())
                } else if !selected.iter().any(|p| p.effective_hours() > 0.0) {
                    Some("estimate hours for at least one selected pain point".to_string())
                } else {
                    None
                }
            }
            WizardStep::ValueMapping => self
                .value_map
                .is_empty()
                .then(|| "value map is empty".to_string()),
            WizardStep::Automation => None,
            WizardStep::Metrics => (!self.agreement.metrics.iter().any(SuccessMetric::has_name))
                .then(|| "name at least one success metric".to_string()),
            WizardStep::Agreement => Some("already on the final step".to_string()),
        }
    }

    /// Checks the aggregate invariants, describing the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        let valued: Vec<&PainPointId> = self
            .pain_points
            .iter()
            .filter(|p| p.is_valued())
            .map(|p| &p.id)
            .collect();
        if self.value_map.len() != valued.len()
            || !self.value_map.iter().all(|v| valued.contains(&&v.pain_point_id))
        {
            return Err("value map does not match valued pain points".to_string());
        }
        if self.automation_opportunities.len() > MAX_OPPORTUNITIES
            || self.automation_opportunities.len() > self.value_map.len()
        {
            return Err("too many automation opportunities".to_string());
        }
        if !self
            .automation_opportunities
            .iter()
            .all(|o| self.value_map.iter().any(|v| v.pain_point_id == o.pain_point_id))
        {
            return Err("opportunity references a pain point outside the value map".to_string());
        }
        if self.pain_points.iter().any(|p| p.selected != p.rank.is_some()) {
            return Err("rank set on an unselected pain point or missing on a selected one".to_string());
        }
        let mut ranks: Vec<u32> = self.pain_points.iter().filter_map(|p| p.rank).collect();
        ranks.sort_unstable();
        if ranks.iter().enumerate().any(|(i, r)| *r != i as u32) {
            return Err("ranks are not contiguous".to_string());
        }
        Ok(())
    }

    // ─── Mutations (used by the wizard on a private clone) ──────────

    pub(super) fn ensure_not_frozen(&self) -> Result<(), WizardError> {
        if self.is_agreed() {
            return Err(WizardError::AgreementFrozen);
        }
        Ok(())
    }

    pub(super) fn ensure_step(&self, command: &'static str, allowed: WizardStep) -> Result<(), WizardError> {
        if self.current_step != allowed {
            return Err(WizardError::StepLocked {
                command,
                allowed,
                current: self.current_step,
            });
        }
        Ok(())
    }

    pub(super) fn update_snapshot(&mut self, patch: SnapshotPatch, catalog: &WizardCatalog) {
        if self.business_snapshot.apply(patch) {
            self.refresh_derived(catalog);
        }
    }

    fn pain_point_mut(&mut self, id: &PainPointId) -> Result<&mut PainPoint, WizardError> {
        self.pain_points
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| WizardError::PainPointNotFound(id.clone()))
    }

    pub(super) fn toggle_pain_point(&mut self, id: &PainPointId, catalog: &WizardCatalog) -> Result<(), WizardError> {
        let point = self.pain_point_mut(id)?;
        point.selected = !point.selected;
        point.rank = None;
        self.refresh_derived(catalog);
        Ok(())
    }

    pub(super) fn add_custom_pain_point(
        &mut self,
        id: PainPointId,
        label: &str,
        catalog: &WizardCatalog,
    ) -> Result<(), WizardError> {
        let point = PainPoint::custom(id, label)?;
        self.pain_points.push(point);
        self.refresh_derived(catalog);
        Ok(())
    }

    pub(super) fn remove_pain_point(&mut self, id: &PainPointId, catalog: &WizardCatalog) -> Result<(), WizardError> {
        let index = self
            .pain_points
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| WizardError::PainPointNotFound(id.clone()))?;
        if !self.pain_points[index].is_custom {
            return Err(WizardError::NotCustom(id.clone()));
        }
        self.pain_points.remove(index);
        self.refresh_derived(catalog);
        Ok(())
    }

    pub(super) fn set_pain_point_hours(
        &mut self,
        id: &PainPointId,
        hours: Option<f64>,
        catalog: &WizardCatalog,
    ) -> Result<(), WizardError> {
        let hours = pain_point::validate_hours(hours)?;
        self.pain_point_mut(id)?.hours_per_week = hours;
        self.refresh_derived(catalog);
        Ok(())
    }

    pub(super) fn set_pain_point_consequence(&mut self, id: &PainPointId, consequence: String) -> Result<(), WizardError> {
        self.pain_point_mut(id)?.consequence = consequence;
        Ok(())
    }

    pub(super) fn reorder_pain_point(&mut self, moved: &PainPointId, target: &PainPointId) -> Result<(), WizardError> {
        for id in [moved, target] {
            if !self.pain_points.iter().any(|p| &p.id == id && p.selected) {
                return Err(WizardError::PainPointNotFound(id.clone()));
            }
        }
        pain_point::reorder(&mut self.pain_points, moved, target);
        Ok(())
    }

    fn value_map_item_mut(&mut self, id: &PainPointId) -> Result<&mut ValueMapItem, WizardError> {
        self.value_map
            .iter_mut()
            .find(|v| &v.pain_point_id == id)
            .ok_or_else(|| WizardError::ValueMapItemNotFound(id.clone()))
    }

    pub(super) fn override_hourly_rate(&mut self, id: &PainPointId, rate: u32) -> Result<(), WizardError> {
        self.value_map_item_mut(id)?.override_rate(rate);
        Ok(())
    }

    pub(super) fn override_impact(&mut self, id: &PainPointId, impact: CustomerImpact) -> Result<(), WizardError> {
        self.value_map_item_mut(id)?.override_impact(impact);
        Ok(())
    }

    fn metric_mut(&mut self, id: &MetricId) -> Result<&mut SuccessMetric, WizardError> {
        self.agreement
            .metrics
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or(WizardError::MetricNotFound(*id))
    }

    pub(super) fn add_metric(&mut self, id: MetricId, catalog: &WizardCatalog) {
        self.agreement
            .metrics
            .push(SuccessMetric::blank(id, catalog.metric_baseline_period.clone()));
    }

    pub(super) fn update_metric(&mut self, id: &MetricId, patch: MetricPatch) -> Result<(), WizardError> {
        self.metric_mut(id)?.apply(patch);
        Ok(())
    }

    pub(super) fn remove_metric(&mut self, id: &MetricId) -> Result<(), WizardError> {
        let before = self.agreement.metrics.len();
        self.agreement.metrics.retain(|m| &m.id != id);
        if self.agreement.metrics.len() == before {
            return Err(WizardError::MetricNotFound(*id));
        }
        Ok(())
    }

    pub(super) fn set_value_share(&mut self, percent: u8) -> Result<(), WizardError> {
        self.agreement.value_share_percent = agreement::validate_value_share(percent)?;
        Ok(())
    }

    pub(super) fn set_baseline_days(&mut self, days: u32) -> Result<(), WizardError> {
        self.agreement.baseline_days = agreement::validate_period_days("baselineDays", days)?;
        Ok(())
    }

    pub(super) fn set_measurement_days(&mut self, days: u32) -> Result<(), WizardError> {
        self.agreement.measurement_days = agreement::validate_period_days("measurementDays", days)?;
        Ok(())
    }

    pub(super) fn set_client_name(&mut self, name: String) {
        self.agreement.client_name = name;
    }

    pub(super) fn set_client_email(&mut self, email: String) {
        self.agreement.client_email = email;
    }

    /// Stamps `agreed_at` on the first call; later calls change nothing.
    pub(super) fn agree(&mut self, at: Timestamp) -> Result<(), WizardError> {
        if self.is_agreed() {
            return Ok(());
        }
        if !self.agreement.signer_complete() {
            return Err(WizardError::SignerIncomplete);
        }
        self.agreement.agreed_at = Some(at);
        Ok(())
    }

    /// Moves one step forward if the current step's guard passes, populating
    /// generate-once data on entry.
    pub(super) fn advance(&mut self, catalog: &WizardCatalog, fresh: FreshIds) -> Result<(), WizardError> {
        let next = self.current_step.next().ok_or(WizardError::NoSuchStep {
            direction: "after",
            current: self.current_step,
        })?;
        if let Some(reason) = self.advance_blocker() {
            return Err(WizardError::guard(self.current_step, reason));
        }
        self.current_step = next;

        if self.is_agreed() {
            return Ok(());
        }
        match next {
            WizardStep::Automation
                if self.automation_opportunities.is_empty() && !self.value_map.is_empty() =>
            {
                let mut ids = fresh
                    .opportunities
                    .into_iter()
                    .chain(std::iter::repeat_with(OpportunityId::new));
                self.automation_opportunities =
                    opportunity::generate_opportunities(&self.value_map, catalog, &mut ids);
            }
            WizardStep::Metrics
                if self.agreement.metrics.is_empty() && !self.automation_opportunities.is_empty() =>
            {
                let mut ids = fresh.metrics.into_iter().chain(std::iter::repeat_with(MetricId::new));
                self.agreement.metrics =
                    metrics::generate_metrics(&self.automation_opportunities, catalog, &mut ids);
            }
            _ => {}
        }
        Ok(())
    }

    /// Moves one step back without discarding anything.
    pub(super) fn back(&mut self) -> Result<(), WizardError> {
        self.current_step = self.current_step.previous().ok_or(WizardError::NoSuchStep {
            direction: "before",
            current: self.current_step,
        })?;
        Ok(())
    }

    /// Restores derived invariants after pain points or rate inputs change.
    fn refresh_derived(&mut self, catalog: &WizardCatalog) {
        pain_point::normalize_ranks(&mut self.pain_points);
        let rate = self.hourly_rate(catalog);
        self.value_map = value_map::build_value_map(&self.pain_points, rate, &self.value_map);
        let value_map = &self.value_map;
        self.automation_opportunities
            .retain(|o| value_map.iter().any(|v| v.pain_point_id == o.pain_point_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_defaults() {
        let catalog = WizardCatalog::standard();
        let session = DiscoverySession::new(SessionId::new(), &catalog, Timestamp::now());
        assert_eq!(session.current_step(), WizardStep::Snapshot);
        assert_eq!(session.pain_points().len(), 6);
        assert!(session.value_map().is_empty());
        assert!(session.automation_opportunities().is_empty());
        assert_eq!(session.agreement(), &Agreement::default());
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn storage_key_is_prefixed() {
        let id = SessionId::new();
        assert_eq!(storage_key(&id), format!("discovery-session-{}", id));
    }

    #[test]
    fn serializes_with_camel_case_keys_and_ordinal_step() {
        let catalog = WizardCatalog::standard();
        let session = DiscoverySession::new(SessionId::new(), &catalog, Timestamp::now());
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["currentStep"], 0);
        assert!(json["businessSnapshot"].is_object());
        assert!(json["automationOpportunities"].as_array().unwrap().is_empty());
        assert_eq!(json["agreement"]["baselineDays"], 30);

        let back: DiscoverySession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn blocker_reports_missing_snapshot_fields() {
        let catalog = WizardCatalog::standard();
        let session = DiscoverySession::new(SessionId::new(), &catalog, Timestamp::now());
        let reason = session.advance_blocker().unwrap();
        assert!(reason.contains("businessName"));
        assert!(reason.contains("typicalDay"));
    }
}
