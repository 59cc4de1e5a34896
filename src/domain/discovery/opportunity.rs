//! Automation opportunities proposed from the value map.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::WizardCatalog;
use super::value_map::ValueMapItem;
use crate::domain::foundation::{OpportunityId, PainPointId, Percentage};

/// Maximum number of proposed automations.
pub const MAX_OPPORTUNITIES: usize = 3;

/// Build difficulty of a proposed agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Simple => "simple",
            Difficulty::Moderate => "moderate",
            Difficulty::Complex => "complex",
        };
        f.write_str(s)
    }
}

/// A proposed AI agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationOpportunity {
    pub id: OpportunityId,
    pub pain_point_id: PainPointId,
    pub title: String,
    pub description: String,
    pub what_agent_does: Vec<String>,
    pub estimated_time_savings_percent: Percentage,
    pub estimated_revenue_impact: u64,
    pub difficulty: Difficulty,
}

impl AutomationOpportunity {
    /// Weekly hours this agent is expected to give back.
    pub fn hours_saved_per_week(&self, value_map: &[ValueMapItem]) -> u64 {
        value_map
            .iter()
            .find(|v| v.pain_point_id == self.pain_point_id)
            .map(|v| (v.hours_per_week * self.estimated_time_savings_percent.as_fraction()).round() as u64)
            .unwrap_or(0)
    }
}

/// Savings estimate as a step function of weekly hours.
pub fn savings_percent(hours_per_week: f64) -> Percentage {
    if hours_per_week > 10.0 {
        Percentage::new(70)
    } else if hours_per_week > 5.0 {
        Percentage::new(60)
    } else {
        Percentage::new(50)
    }
}

/// Proposes agents for the three most costly value-map entries.
///
/// `ids` supplies one fresh identifier per generated opportunity so the
/// caller controls id generation. It must not run dry before
/// `MAX_OPPORTUNITIES` items.
pub fn generate_opportunities(
    value_map: &[ValueMapItem],
    catalog: &WizardCatalog,
    ids: &mut impl Iterator<Item = OpportunityId>,
) -> Vec<AutomationOpportunity> {
    let mut by_cost: Vec<&ValueMapItem> = value_map.iter().collect();
    by_cost.sort_by(|a, b| b.annual_cost.cmp(&a.annual_cost));

    by_cost
        .into_iter()
        .take(MAX_OPPORTUNITIES)
        .zip(ids)
        .map(|(item, id)| {
            let template = catalog.agent_template(&item.pain_point_id, &item.label);
            let pct = savings_percent(item.hours_per_week);
            AutomationOpportunity {
                id,
                pain_point_id: item.pain_point_id.clone(),
                title: template.title,
                description: template.description,
                what_agent_does: template.what_agent_does,
                estimated_time_savings_percent: pct,
                estimated_revenue_impact: pct.of_dollars(item.annual_cost),
                difficulty: template.difficulty,
            }
        })
        .collect()
}

/// Sum of estimated revenue impact across opportunities.
pub fn total_savings(opportunities: &[AutomationOpportunity]) -> u64 {
    opportunities.iter().map(|o| o.estimated_revenue_impact).sum()
}
