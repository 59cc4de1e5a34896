//! Success metrics the value share is measured against.

use serde::{Deserialize, Serialize};

use super::catalog::WizardCatalog;
use super::opportunity::AutomationOpportunity;
use crate::domain::foundation::MetricId;

/// A measurable outcome agreed with the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessMetric {
    pub id: MetricId,
    pub name: String,
    pub description: String,
    pub data_source: String,
    pub baseline_period: String,
    pub target_improvement: String,
}

impl SuccessMetric {
    /// A blank metric the client fills in.
    pub fn blank(id: MetricId, baseline_period: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            data_source: String::new(),
            baseline_period: baseline_period.into(),
            target_improvement: String::new(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub(crate) fn apply(&mut self, patch: MetricPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(data_source) = patch.data_source {
            self.data_source = data_source;
        }
        if let Some(baseline_period) = patch.baseline_period {
            self.baseline_period = baseline_period;
        }
        if let Some(target) = patch.target_improvement {
            self.target_improvement = target;
        }
    }
}

/// Partial update of a metric; absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_improvement: Option<String>,
}

impl MetricPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target_improvement(mut self, target: impl Into<String>) -> Self {
        self.target_improvement = Some(target.into());
        self
    }
}

/// Default metrics for a set of opportunities.
///
/// Each opportunity contributes the metrics of the first matching template,
/// or a single "hours saved" metric built from its title and savings
/// estimate. Ids are drawn from `ids` in order.
pub fn generate_metrics(
    opportunities: &[AutomationOpportunity],
    catalog: &WizardCatalog,
    ids: &mut impl Iterator<Item = MetricId>,
) -> Vec<SuccessMetric> {
    let baseline = &catalog.metric_baseline_period;
    let mut metrics = Vec::new();

    for opp in opportunities {
        match catalog.metric_template(&opp.pain_point_id, &opp.title) {
            Some(template) => {
                for spec in &template.metrics {
                    metrics.push(SuccessMetric {
                        id: ids.next().unwrap_or_default(),
                        name: spec.name.clone(),
                        description: spec.description.clone(),
                        data_source: spec.data_source.clone(),
                        baseline_period: baseline.clone(),
                        target_improvement: spec.target_improvement.clone(),
                    });
                }
            }
            None => metrics.push(SuccessMetric {
                id: ids.next().unwrap_or_default(),
                name: format!("{} - Hours Saved", opp.title),
                description: format!("Weekly hours spent on {} tasks", opp.title.to_lowercase()),
                data_source: "Time tracking / self-report".to_string(),
                baseline_period: baseline.clone(),
                target_improvement: format!(
                    "{}%+ reduction",
                    opp.estimated_time_savings_percent.value()
                ),
            }),
        }
    }

    metrics
}
