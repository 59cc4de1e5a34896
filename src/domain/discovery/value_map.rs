//! Value mapping: annualized cost of each valued pain point.
//!
//! `labor = hours * 52 * rate`, plus a missed-opportunity surcharge on labor
//! (30% above 10 h/week, 15% above 5 h/week). Impact tiers bucket the
//! rounded annual cost at fixed thresholds.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::pain_point::PainPoint;
use crate::domain::foundation::PainPointId;

/// Weeks per year used by every annualized figure.
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Annual cost above which impact is critical.
pub const CRITICAL_THRESHOLD: u64 = 100_000;
/// Annual cost above which impact is high.
pub const HIGH_THRESHOLD: u64 = 50_000;
/// Annual cost above which impact is medium.
pub const MEDIUM_THRESHOLD: u64 = 20_000;

/// Four-level customer-impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerImpact {
    Low,
    Medium,
    High,
    Critical,
}

impl CustomerImpact {
    /// Buckets an annual cost. Thresholds are exclusive lower bounds.
    pub fn classify(annual_cost: u64) -> Self {
        if annual_cost > CRITICAL_THRESHOLD {
            CustomerImpact::Critical
        } else if annual_cost > HIGH_THRESHOLD {
            CustomerImpact::High
        } else if annual_cost > MEDIUM_THRESHOLD {
            CustomerImpact::Medium
        } else {
            CustomerImpact::Low
        }
    }

    /// Client-facing wording.
    pub fn label(&self) -> &'static str {
        match self {
            CustomerImpact::Low => "Minimal",
            CustomerImpact::Medium => "Noticeable",
            CustomerImpact::High => "Significant",
            CustomerImpact::Critical => "Severe",
        }
    }
}

impl fmt::Display for CustomerImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CustomerImpact::Low => "low",
            CustomerImpact::Medium => "medium",
            CustomerImpact::High => "high",
            CustomerImpact::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Cost breakdown for one pain point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub labor_cost: f64,
    pub revenue_lost: f64,
    pub annual_cost: u64,
}

/// Surcharge fraction applied to labor cost for missed opportunities.
pub fn revenue_lost_rate(hours_per_week: f64) -> f64 {
    if hours_per_week > 10.0 {
        0.30
    } else if hours_per_week > 5.0 {
        0.15
    } else {
        0.0
    }
}

/// Computes the annual cost of a pain point at a given hourly rate.
pub fn estimate_cost(hours_per_week: f64, hourly_rate: u32) -> CostEstimate {
    let labor_cost = hours_per_week * WEEKS_PER_YEAR * f64::from(hourly_rate);
    let revenue_lost = labor_cost * revenue_lost_rate(hours_per_week);
    CostEstimate {
        labor_cost,
        revenue_lost,
        annual_cost: (labor_cost + revenue_lost).round() as u64,
    }
}

/// One row of the value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMapItem {
    pub pain_point_id: PainPointId,
    pub label: String,
    pub hours_per_week: f64,
    pub hourly_rate: u32,
    pub revenue_lost_per_year: u64,
    pub customer_impact: CustomerImpact,
    pub annual_cost: u64,
    #[serde(default)]
    pub rate_overridden: bool,
    #[serde(default)]
    pub impact_overridden: bool,
}

impl ValueMapItem {
    /// Builds a row from a pain point at the given rate.
    pub fn new(pain_point: &PainPoint, hourly_rate: u32) -> Self {
        let mut item = Self {
            pain_point_id: pain_point.id.clone(),
            label: pain_point.label.clone(),
            hours_per_week: pain_point.effective_hours(),
            hourly_rate,
            revenue_lost_per_year: 0,
            customer_impact: CustomerImpact::Low,
            annual_cost: 0,
            rate_overridden: false,
            impact_overridden: false,
        };
        item.recompute();
        item
    }

    /// Recomputes cost figures from hours and rate. Impact follows the cost
    /// unless the user pinned it.
    pub(crate) fn recompute(&mut self) {
        let estimate = estimate_cost(self.hours_per_week, self.hourly_rate);
        self.revenue_lost_per_year = estimate.revenue_lost.round() as u64;
        self.annual_cost = estimate.annual_cost;
        if !self.impact_overridden {
            self.customer_impact = CustomerImpact::classify(self.annual_cost);
        }
    }

    /// Sets a user-chosen hourly rate and recomputes cost.
    pub(crate) fn override_rate(&mut self, hourly_rate: u32) {
        self.hourly_rate = hourly_rate;
        self.rate_overridden = true;
        self.recompute();
    }

    /// Pins the impact level.
    pub(crate) fn override_impact(&mut self, impact: CustomerImpact) {
        self.customer_impact = impact;
        self.impact_overridden = true;
    }

    /// Annual hours spent on this pain point.
    pub fn hours_per_year(&self) -> f64 {
        self.hours_per_week * WEEKS_PER_YEAR
    }
}

/// Rebuilds the value map from the pain points.
///
/// Contains exactly the selected pain points with positive hours, ordered by
/// hours per week descending (ties keep pain-point order). Overrides from
/// `previous` carry over for pain points that are still present.
pub fn build_value_map(
    pain_points: &[PainPoint],
    default_rate: u32,
    previous: &[ValueMapItem],
) -> Vec<ValueMapItem> {
    let mut valued: Vec<&PainPoint> = pain_points.iter().filter(|p| p.is_valued()).collect();
    valued.sort_by(|a, b| {
        b.effective_hours()
            .partial_cmp(&a.effective_hours())
            .unwrap_or(Ordering::Equal)
    });

    valued
        .into_iter()
        .map(|pain_point| {
            let mut item = ValueMapItem::new(pain_point, default_rate);
            if let Some(old) = previous.iter().find(|v| v.pain_point_id == pain_point.id) {
                if old.rate_overridden {
                    item.hourly_rate = old.hourly_rate;
                    item.rate_overridden = true;
                }
                if old.impact_overridden {
                    item.customer_impact = old.customer_impact;
                    item.impact_overridden = true;
                }
                item.recompute();
            }
            item
        })
        .collect()
}

/// Sum of annual cost across the value map.
pub fn total_annual_cost(items: &[ValueMapItem]) -> u64 {
    items.iter().map(|v| v.annual_cost).sum()
}

/// Sum of weekly hours across the value map.
pub fn total_hours_per_week(items: &[ValueMapItem]) -> f64 {
    items.iter().map(|v| v.hours_per_week).sum()
}
