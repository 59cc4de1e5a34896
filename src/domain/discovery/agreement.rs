//! Agreement terms and the value split.

use serde::{Deserialize, Serialize};

use super::metrics::SuccessMetric;
use crate::domain::foundation::{Percentage, Timestamp, ValidationError};

/// Smallest value share the consultancy offers.
pub const MIN_VALUE_SHARE: u8 = 5;
/// Largest value share the consultancy offers.
pub const MAX_VALUE_SHARE: u8 = 25;
/// Value share proposed to every new session.
pub const DEFAULT_VALUE_SHARE: u8 = 12;
/// Default length of the baseline and measurement windows.
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// Final-stage bundle of terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub metrics: Vec<SuccessMetric>,
    pub value_share_percent: Percentage,
    pub baseline_days: u32,
    pub measurement_days: u32,
    pub agreed_at: Option<Timestamp>,
    pub client_name: String,
    pub client_email: String,
}

impl Default for Agreement {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            value_share_percent: Percentage::new(DEFAULT_VALUE_SHARE),
            baseline_days: DEFAULT_PERIOD_DAYS,
            measurement_days: DEFAULT_PERIOD_DAYS,
            agreed_at: None,
            client_name: String::new(),
            client_email: String::new(),
        }
    }
}

impl Agreement {
    pub fn is_agreed(&self) -> bool {
        self.agreed_at.is_some()
    }

    /// Day on which the first invoice can be issued.
    pub fn first_invoice_day(&self) -> u32 {
        self.baseline_days + self.measurement_days
    }

    /// Splits measured savings between the consultancy and the client.
    pub fn value_split(&self, total_savings: u64) -> ValueSplit {
        let our_share = self.value_share_percent.of_dollars(total_savings);
        ValueSplit {
            total_savings,
            our_share,
            their_share: total_savings.saturating_sub(our_share),
        }
    }

    /// Whether the signer details required to agree are present.
    pub fn signer_complete(&self) -> bool {
        !self.client_name.trim().is_empty() && !self.client_email.trim().is_empty()
    }
}

/// Validates a value share against the offered band.
pub fn validate_value_share(percent: u8) -> Result<Percentage, ValidationError> {
    if !(MIN_VALUE_SHARE..=MAX_VALUE_SHARE).contains(&percent) {
        return Err(ValidationError::out_of_range(
            "valueSharePercent",
            i64::from(MIN_VALUE_SHARE),
            i64::from(MAX_VALUE_SHARE),
            i64::from(percent),
        ));
    }
    Ok(Percentage::new(percent))
}

/// Validates a baseline or measurement period.
pub fn validate_period_days(field: &str, days: u32) -> Result<u32, ValidationError> {
    if days == 0 {
        return Err(ValidationError::out_of_range(field, 1, i64::from(u32::MAX), 0));
    }
    Ok(days)
}

/// How measured savings are divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSplit {
    pub total_savings: u64,
    pub our_share: u64,
    pub their_share: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_offer() {
        let agreement = Agreement::default();
        assert_eq!(agreement.value_share_percent.value(), 12);
        assert_eq!(agreement.baseline_days, 30);
        assert_eq!(agreement.measurement_days, 30);
        assert_eq!(agreement.first_invoice_day(), 60);
        assert!(!agreement.is_agreed());
    }

    #[test]
    fn value_split_rounds_our_share() {
        let agreement = Agreement::default();
        let split = agreement.value_split(50_001);
        assert_eq!(split.our_share, 6_000);
        assert_eq!(split.their_share, 44_001);
        assert_eq!(split.our_share + split.their_share, split.total_savings);
    }

    #[test]
    fn value_share_band_is_inclusive() {
        assert!(validate_value_share(4).is_err());
        assert!(validate_value_share(5).is_ok());
        assert!(validate_value_share(25).is_ok());
        assert!(validate_value_share(26).is_err());
    }

    #[test]
    fn zero_day_period_is_rejected() {
        assert!(validate_period_days("baselineDays", 0).is_err());
        assert_eq!(validate_period_days("baselineDays", 14).unwrap(), 14);
    }

    #[test]
    fn signer_requires_name_and_email() {
        let mut agreement = Agreement::default();
        agreement.client_name = "Dana".to_string();
        assert!(!agreement.signer_complete());
        agreement.client_email = " ".to_string();
        assert!(!agreement.signer_complete());
        agreement.client_email = "dana@example.com".to_string();
        assert!(agreement.signer_complete());
    }

    #[test]
    fn serializes_agreed_at_as_null_until_signed() {
        let json = serde_json::to_value(Agreement::default()).unwrap();
        assert!(json["agreedAt"].is_null());
        assert_eq!(json["valueSharePercent"], 12);
    }
}
