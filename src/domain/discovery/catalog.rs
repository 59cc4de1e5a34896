//! Catalog data handed to the wizard at construction.
//!
//! Holds the canonical pain points, the hourly-rate table, the automation
//! agent templates and the success-metric templates. Nothing here is global:
//! a [`WizardCatalog`] is built once (usually [`WizardCatalog::standard`])
//! and shared by reference.

use std::collections::HashMap;

use super::opportunity::Difficulty;
use super::pain_point::PainPoint;
use super::snapshot::{RevenueRange, TeamSize};
use crate::domain::foundation::PainPointId;

/// Options offered for the industry field.
pub const INDUSTRY_OPTIONS: [&str; 9] = [
    "Property Management",
    "Construction / Trades",
    "Real Estate",
    "Professional Services",
    "Retail / E-commerce",
    "Healthcare",
    "Agriculture / Farming",
    "Nonprofit",
    "Other",
];

/// A canonical pain point offered to every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPainPoint {
    pub id: &'static str,
    pub label: &'static str,
}

/// Hourly-rate assumption keyed by revenue bucket with a team-size
/// multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base_rates: HashMap<RevenueRange, f64>,
    pub fallback_base: f64,
    pub team_multipliers: HashMap<TeamSize, f64>,
    pub fallback_multiplier: f64,
}

impl RateTable {
    /// `round(base[revenue] * multiplier[team])`, with fallbacks for
    /// unknown or undisclosed buckets.
    pub fn hourly_rate(&self, revenue: Option<RevenueRange>, team: Option<TeamSize>) -> u32 {
        let base = revenue
            .and_then(|r| self.base_rates.get(&r).copied())
            .unwrap_or(self.fallback_base);
        let multiplier = team
            .and_then(|t| self.team_multipliers.get(&t).copied())
            .unwrap_or(self.fallback_multiplier);
        (base * multiplier).round().max(0.0) as u32
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            base_rates: HashMap::from([
                (RevenueRange::Under100K, 25.0),
                (RevenueRange::From100KTo500K, 35.0),
                (RevenueRange::From500KTo1M, 50.0),
                (RevenueRange::From1MTo5M, 65.0),
                (RevenueRange::Over5M, 85.0),
            ]),
            fallback_base: 40.0,
            team_multipliers: HashMap::from([
                (TeamSize::JustMe, 1.2),
                (TeamSize::TwoToFive, 1.0),
                (TeamSize::SixToFifteen, 0.9),
                (TeamSize::SixteenToFifty, 0.85),
                (TeamSize::FiftyPlus, 0.8),
            ]),
            fallback_multiplier: 1.0,
        }
    }
}

/// Canned proposal for an AI agent addressing one pain point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTemplate {
    pub title: String,
    pub description: String,
    pub what_agent_does: Vec<String>,
    pub difficulty: Difficulty,
}

impl AgentTemplate {
    fn fixed(title: &str, description: &str, what_agent_does: [&str; 5], difficulty: Difficulty) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            what_agent_does: what_agent_does.iter().map(|s| s.to_string()).collect(),
            difficulty,
        }
    }

    /// Template used when no pain-point specific one exists.
    pub fn generic(label: &str) -> Self {
        let lower = label.to_lowercase();
        Self {
            title: format!("{} Automation Agent", label),
            description: format!(
                "An AI agent that automates the manual work involved in {}, saving your team significant time each week.",
                lower
            ),
            what_agent_does: vec![
                format!("Handles routine {} tasks automatically", lower),
                "Responds to incoming requests within minutes".to_string(),
                "Escalates complex situations to your team with context".to_string(),
                "Tracks all activity and generates weekly summaries".to_string(),
                "Learns and improves from your feedback over time".to_string(),
            ],
            difficulty: Difficulty::Moderate,
        }
    }
}

/// One success metric a template contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub description: String,
    pub data_source: String,
    pub target_improvement: String,
}

impl MetricSpec {
    fn new(name: &str, description: &str, data_source: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            data_source: data_source.to_string(),
            target_improvement: target.to_string(),
        }
    }
}

/// Metrics contributed by opportunities matching a pain point (or, when
/// `title_keyword` is set, any opportunity whose title contains it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTemplate {
    pub pain_point_id: String,
    pub title_keyword: Option<String>,
    pub metrics: Vec<MetricSpec>,
}

impl MetricTemplate {
    /// Whether an opportunity with this pain point and title uses the template.
    pub fn matches(&self, pain_point_id: &PainPointId, title: &str) -> bool {
        if pain_point_id.as_str() == self.pain_point_id {
            return true;
        }
        match &self.title_keyword {
            Some(keyword) => title.to_lowercase().contains(&keyword.to_lowercase()),
            None => false,
        }
    }
}

/// All reference data the wizard reads.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardCatalog {
    pub pain_points: Vec<CatalogPainPoint>,
    pub rates: RateTable,
    pub agent_templates: HashMap<String, AgentTemplate>,
    pub metric_templates: Vec<MetricTemplate>,
    /// Baseline period label stamped on every metric.
    pub metric_baseline_period: String,
}

impl WizardCatalog {
    /// The consultancy's standard catalog.
    pub fn standard() -> Self {
        let pain_points = vec![
            CatalogPainPoint { id: "lead-response", label: "Lead / inquiry response" },
            CatalogPainPoint { id: "scheduling", label: "Scheduling & coordination" },
            CatalogPainPoint { id: "data-entry", label: "Data entry & CRM updates" },
            CatalogPainPoint { id: "client-comms", label: "Client / tenant communication" },
            CatalogPainPoint { id: "invoicing", label: "Invoicing & follow-ups" },
            CatalogPainPoint { id: "reporting", label: "Reporting & compliance" },
        ];

        let agent_templates = HashMap::from([
            (
                "lead-response".to_string(),
                AgentTemplate::fixed(
                    "AI Lead Response Agent",
                    "An AI agent that monitors incoming inquiries and responds instantly with personalized messages, qualification questions, and scheduling links.",
                    [
                        "Monitors email, web forms, and texts for new inquiries",
                        "Sends a personalized response within 60 seconds",
                        "Asks qualifying questions and captures key info",
                        "Books meetings directly on your calendar",
                        "Hands off hot leads with context for your follow-up",
                    ],
                    Difficulty::Simple,
                ),
            ),
            (
                "scheduling".to_string(),
                AgentTemplate::fixed(
                    "Smart Scheduling Coordinator",
                    "An AI agent that handles the back-and-forth of scheduling, coordinates availability across your team, and sends reminders.",
                    [
                        "Manages your team's availability in real-time",
                        "Handles rescheduling requests automatically",
                        "Sends confirmation and reminder sequences",
                        "Coordinates multi-party meetings",
                        "Syncs with your existing calendar tools",
                    ],
                    Difficulty::Simple,
                ),
            ),
            (
                "data-entry".to_string(),
                AgentTemplate::fixed(
                    "Automated Data Capture Agent",
                    "An AI agent that extracts information from emails, forms, and documents, then updates your CRM and systems automatically.",
                    [
                        "Reads incoming emails and documents for key data",
                        "Updates CRM records automatically",
                        "Creates tasks and follow-ups from conversation context",
                        "Flags inconsistencies or missing information",
                        "Generates weekly data quality reports",
                    ],
                    Difficulty::Moderate,
                ),
            ),
            (
                "client-comms".to_string(),
                AgentTemplate::fixed(
                    "Client Communication Agent",
                    "An AI agent that handles routine client communications: status updates, responses to common questions, and proactive outreach.",
                    [
                        "Responds to routine questions with accurate, personalized answers",
                        "Sends proactive status updates and check-ins",
                        "Escalates complex issues to you with full context",
                        "Maintains communication logs and history",
                        "Generates monthly client communication summaries",
                    ],
                    Difficulty::Moderate,
                ),
            ),
            (
                "invoicing".to_string(),
                AgentTemplate::fixed(
                    "Invoice & Follow-Up Agent",
                    "An AI agent that generates invoices, sends reminders, tracks payments, and follows up on overdue accounts.",
                    [
                        "Generates invoices from completed work records",
                        "Sends payment reminders on a smart schedule",
                        "Follows up on overdue invoices with escalating urgency",
                        "Reconciles payments with records",
                        "Sends you a weekly AR summary",
                    ],
                    Difficulty::Simple,
                ),
            ),
            (
                "reporting".to_string(),
                AgentTemplate::fixed(
                    "Automated Reporting Agent",
                    "An AI agent that pulls data from your systems, generates reports, and flags important trends and anomalies.",
                    [
                        "Aggregates data from multiple sources automatically",
                        "Generates weekly and monthly reports",
                        "Highlights trends, anomalies, and action items",
                        "Distributes reports to the right stakeholders",
                        "Creates compliance-ready documentation",
                    ],
                    Difficulty::Moderate,
                ),
            ),
        ]);

        let metric_templates = vec![
            MetricTemplate {
                pain_point_id: "lead-response".to_string(),
                title_keyword: Some("lead".to_string()),
                metrics: vec![
                    MetricSpec::new(
                        "Lead Response Time",
                        "Average time from inquiry received to first response",
                        "Email/CRM timestamps",
                        "< 5 minutes (from current average)",
                    ),
                    MetricSpec::new(
                        "Lead Conversion Rate",
                        "Percentage of inquiries that become customers",
                        "CRM pipeline data",
                        "20%+ improvement over baseline",
                    ),
                ],
            },
            MetricTemplate {
                pain_point_id: "scheduling".to_string(),
                title_keyword: None,
                metrics: vec![MetricSpec::new(
                    "Scheduling Time Saved",
                    "Hours per week spent on scheduling coordination",
                    "Time tracking / self-report",
                    "60%+ reduction",
                )],
            },
            MetricTemplate {
                pain_point_id: "client-comms".to_string(),
                title_keyword: None,
                metrics: vec![MetricSpec::new(
                    "Client Response Time",
                    "Average time to respond to client inquiries",
                    "Communication platform logs",
                    "< 15 minutes for routine questions",
                )],
            },
        ];

        Self {
            pain_points,
            rates: RateTable::default(),
            agent_templates,
            metric_templates,
            metric_baseline_period: "30 days".to_string(),
        }
    }

    /// Fresh, unselected pain points for a new session.
    pub fn default_pain_points(&self) -> Vec<PainPoint> {
        self.pain_points
            .iter()
            .filter_map(|entry| {
                PainPointId::new(entry.id)
                    .ok()
                    .map(|id| PainPoint::from_catalog(id, entry.label))
            })
            .collect()
    }

    /// Agent template for a pain point, falling back to the generic one.
    pub fn agent_template(&self, pain_point_id: &PainPointId, label: &str) -> AgentTemplate {
        self.agent_templates
            .get(pain_point_id.as_str())
            .cloned()
            .unwrap_or_else(|| AgentTemplate::generic(label))
    }

    /// First metric template matching an opportunity, if any.
    pub fn metric_template(&self, pain_point_id: &PainPointId, title: &str) -> Option<&MetricTemplate> {
        self.metric_templates
            .iter()
            .find(|t| t.matches(pain_point_id, title))
    }
}

impl Default for WizardCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
