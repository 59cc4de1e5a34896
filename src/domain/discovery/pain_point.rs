//! Pain points and their ranking.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PainPointId, ValidationError};

/// Upper bound for a weekly-hours estimate.
pub const MAX_HOURS_PER_WEEK: f64 = 168.0;

/// A recurring manual task the client loses time or money to.
///
/// # Invariants
///
/// - `rank` is `Some` iff `selected`
/// - `hours_per_week`, when set, lies in `0..=168`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    pub id: PainPointId,
    pub label: String,
    pub is_custom: bool,
    pub selected: bool,
    pub rank: Option<u32>,
    pub hours_per_week: Option<f64>,
    pub consequence: String,
}

impl PainPoint {
    /// An unselected catalog entry.
    pub fn from_catalog(id: PainPointId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_custom: false,
            selected: false,
            rank: None,
            hours_per_week: None,
            consequence: String::new(),
        }
    }

    /// A user-authored entry, selected on creation.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the trimmed label is empty
    pub fn custom(id: PainPointId, label: &str) -> Result<Self, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::empty_field("label"));
        }
        Ok(Self {
            id,
            label: label.to_string(),
            is_custom: true,
            selected: true,
            rank: None,
            hours_per_week: None,
            consequence: String::new(),
        })
    }

    /// Hours that count toward the value map (zero when unset).
    pub fn effective_hours(&self) -> f64 {
        self.hours_per_week.unwrap_or(0.0)
    }

    /// Whether this pain point belongs in the value map.
    pub fn is_valued(&self) -> bool {
        self.selected && self.effective_hours() > 0.0
    }
}

/// Validates a weekly-hours estimate.
pub fn validate_hours(hours: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match hours {
        None => Ok(None),
        Some(h) if !h.is_finite() => Err(ValidationError::invalid_format(
            "hoursPerWeek",
            "must be a finite number",
        )),
        Some(h) if !(0.0..=MAX_HOURS_PER_WEEK).contains(&h) => Err(ValidationError::out_of_range(
            "hoursPerWeek",
            0,
            MAX_HOURS_PER_WEEK as i64,
            h.round() as i64,
        )),
        Some(h) => Ok(Some(h)),
    }
}

/// Reassigns ranks so selected pain points hold `0..n` in their current
/// rank order and unselected ones hold none.
///
/// Newly selected entries without a rank go to the end, in list order.
pub fn normalize_ranks(points: &mut [PainPoint]) {
    let mut order: Vec<usize> = (0..points.len()).filter(|&i| points[i].selected).collect();
    // Stable: ranked first by rank, unranked after in list order.
    order.sort_by_key(|&i| (points[i].rank.is_none(), points[i].rank.unwrap_or(0)));
    for point in points.iter_mut() {
        point.rank = None;
    }
    for (rank, i) in order.into_iter().enumerate() {
        points[i].rank = Some(rank as u32);
    }
}

/// Selected pain points in rank order.
pub fn ranked(points: &[PainPoint]) -> Vec<&PainPoint> {
    let mut selected: Vec<&PainPoint> = points.iter().filter(|p| p.selected).collect();
    selected.sort_by_key(|p| p.rank.unwrap_or(u32::MAX));
    selected
}

/// Moves `moved` to the rank currently held by `target` among the selected
/// items, shifting the ones in between (array-move semantics).
///
/// Returns false when either id is not a selected pain point.
pub fn reorder(points: &mut [PainPoint], moved: &PainPointId, target: &PainPointId) -> bool {
    let mut ids: Vec<PainPointId> = ranked(points).into_iter().map(|p| p.id.clone()).collect();
    let Some(from) = ids.iter().position(|id| id == moved) else {
        return false;
    };
    let Some(to) = ids.iter().position(|id| id == target) else {
        return false;
    };
    if from == to {
        return true;
    }
    let id = ids.remove(from);
    ids.insert(to, id);
    for point in points.iter_mut() {
        if let Some(rank) = ids.iter().position(|id| *id == point.id) {
            point.rank = Some(rank as u32);
        }
    }
    true
}
