//! Discovery wizard domain module.
//!
//! Six ordered steps accumulate a [`DiscoverySession`]: business snapshot,
//! pain points, value mapping, automation opportunities, metrics and terms,
//! agreement. Later steps are derived from earlier ones by the pure
//! calculators in this module; [`DiscoveryWizard::apply`] is the only way a
//! session changes.

mod agreement;
mod catalog;
mod command;
mod errors;
mod metrics;
mod opportunity;
mod pain_point;
mod session;
mod snapshot;
mod step;
mod value_map;
mod wizard;

pub use agreement::{
    Agreement, ValueSplit, DEFAULT_PERIOD_DAYS, DEFAULT_VALUE_SHARE, MAX_VALUE_SHARE,
    MIN_VALUE_SHARE,
};
pub use catalog::{
    AgentTemplate, CatalogPainPoint, MetricSpec, MetricTemplate, RateTable, WizardCatalog,
    INDUSTRY_OPTIONS,
};
pub use command::{FreshIds, SessionCommand};
pub use errors::WizardError;
pub use metrics::{generate_metrics, MetricPatch, SuccessMetric};
pub use opportunity::{
    generate_opportunities, savings_percent, AutomationOpportunity, Difficulty, MAX_OPPORTUNITIES,
};
pub use pain_point::{PainPoint, MAX_HOURS_PER_WEEK};
pub use session::{storage_key, DiscoverySession};
pub use snapshot::{BusinessSnapshot, RevenueRange, SnapshotPatch, TeamSize};
pub use step::WizardStep;
pub use value_map::{build_value_map, estimate_cost, CostEstimate, CustomerImpact, ValueMapItem};
pub use wizard::DiscoveryWizard;
