//! Business snapshot collected in the first wizard step.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Minimum trimmed length the typical-day narrative must exceed.
pub const MIN_TYPICAL_DAY_CHARS: usize = 10;

/// Team-size bucket chosen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSize {
    #[serde(rename = "Just me")]
    JustMe,
    #[serde(rename = "2-5 people")]
    TwoToFive,
    #[serde(rename = "6-15 people")]
    SixToFifteen,
    #[serde(rename = "16-50 people")]
    SixteenToFifty,
    #[serde(rename = "50+ people")]
    FiftyPlus,
}

impl TeamSize {
    /// All buckets in display order.
    pub const ALL: [TeamSize; 5] = [
        TeamSize::JustMe,
        TeamSize::TwoToFive,
        TeamSize::SixToFifteen,
        TeamSize::SixteenToFifty,
        TeamSize::FiftyPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TeamSize::JustMe => "Just me",
            TeamSize::TwoToFive => "2-5 people",
            TeamSize::SixToFifteen => "6-15 people",
            TeamSize::SixteenToFifty => "16-50 people",
            TeamSize::FiftyPlus => "50+ people",
        }
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annual revenue bucket chosen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevenueRange {
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
    #[serde(rename = "Under $100K")]
    Under100K,
    #[serde(rename = "$100K - $500K")]
    From100KTo500K,
    #[serde(rename = "$500K - $1M")]
    From500KTo1M,
    #[serde(rename = "$1M - $5M")]
    From1MTo5M,
    #[serde(rename = "$5M+")]
    Over5M,
}

impl RevenueRange {
    /// All buckets in display order.
    pub const ALL: [RevenueRange; 6] = [
        RevenueRange::PreferNotToSay,
        RevenueRange::Under100K,
        RevenueRange::From100KTo500K,
        RevenueRange::From500KTo1M,
        RevenueRange::From1MTo5M,
        RevenueRange::Over5M,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RevenueRange::PreferNotToSay => "Prefer not to say",
            RevenueRange::Under100K => "Under $100K",
            RevenueRange::From100KTo500K => "$100K - $500K",
            RevenueRange::From500KTo1M => "$500K - $1M",
            RevenueRange::From1MTo5M => "$1M - $5M",
            RevenueRange::Over5M => "$5M+",
        }
    }

    /// Whether the bucket should be printed on exported documents.
    pub fn is_disclosed(&self) -> bool {
        !matches!(self, RevenueRange::PreferNotToSay)
    }
}

impl fmt::Display for RevenueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-form business profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSnapshot {
    pub business_name: String,
    pub industry: String,
    pub team_size: Option<TeamSize>,
    pub revenue_range: Option<RevenueRange>,
    pub typical_day: String,
}

impl BusinessSnapshot {
    /// Returns the list of fields still blocking the Snapshot step.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.business_name.trim().is_empty() {
            missing.push("businessName");
        }
        if self.industry.is_empty() {
            missing.push("industry");
        }
        if self.team_size.is_none() {
            missing.push("teamSize");
        }
        if self.typical_day.trim().chars().count() <= MIN_TYPICAL_DAY_CHARS {
            missing.push("typicalDay");
        }
        missing
    }

    /// Applies a partial update. Returns true when a field feeding the
    /// hourly rate changed.
    pub(crate) fn apply(&mut self, patch: SnapshotPatch) -> bool {
        let mut rate_inputs_changed = false;
        if let Some(name) = patch.business_name {
            self.business_name = name;
        }
        if let Some(industry) = patch.industry {
            self.industry = industry;
        }
        if let Some(team_size) = patch.team_size {
            rate_inputs_changed |= self.team_size != team_size;
            self.team_size = team_size;
        }
        if let Some(revenue_range) = patch.revenue_range {
            rate_inputs_changed |= self.revenue_range != revenue_range;
            self.revenue_range = revenue_range;
        }
        if let Some(typical_day) = patch.typical_day {
            self.typical_day = typical_day;
        }
        rate_inputs_changed
    }
}

/// Partial update of the business snapshot.
///
/// Absent fields are left alone. For the bucket fields, `Some(None)` clears
/// the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub team_size: Option<Option<TeamSize>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub revenue_range: Option<Option<RevenueRange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_day: Option<String>,
}

// An explicit `null` clears the field; an absent key leaves it untouched.
fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SnapshotPatch {
    pub fn business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = Some(name.into());
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn team_size(mut self, team_size: TeamSize) -> Self {
        self.team_size = Some(Some(team_size));
        self
    }

    pub fn revenue_range(mut self, revenue_range: RevenueRange) -> Self {
        self.revenue_range = Some(Some(revenue_range));
        self
    }

    pub fn typical_day(mut self, typical_day: impl Into<String>) -> Self {
        self.typical_day = Some(typical_day.into());
        self
    }
}
