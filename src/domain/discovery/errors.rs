//! Wizard-specific error types.

use thiserror::Error;

use super::step::WizardStep;
use crate::domain::foundation::{DomainError, ErrorCode, MetricId, PainPointId, ValidationError};

/// Reasons a command is rejected by the wizard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// The current step's advance guard is not satisfied.
    #[error("Cannot leave {step}: {reason}")]
    GuardFailed { step: WizardStep, reason: String },

    /// The command belongs to a different step.
    #[error("{command} is only available on the {allowed} step (currently on {current})")]
    StepLocked {
        command: &'static str,
        allowed: WizardStep,
        current: WizardStep,
    },

    /// Advance past the last step or back before the first.
    #[error("No step {direction} {current}")]
    NoSuchStep {
        direction: &'static str,
        current: WizardStep,
    },

    /// The agreement was signed; only navigation and reset remain.
    #[error("Agreement already signed; the session is read-only")]
    AgreementFrozen,

    #[error("Pain point not found: {0}")]
    PainPointNotFound(PainPointId),

    #[error("Only custom pain points can be removed: {0}")]
    NotCustom(PainPointId),

    #[error("Pain point is not part of the value map: {0}")]
    ValueMapItemNotFound(PainPointId),

    #[error("Metric not found: {0}")]
    MetricNotFound(MetricId),

    #[error("Signer name and email are required to agree")]
    SignerIncomplete,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WizardError {
    pub fn guard(step: WizardStep, reason: impl Into<String>) -> Self {
        WizardError::GuardFailed {
            step,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WizardError::GuardFailed { .. } => ErrorCode::StepGuardFailed,
            WizardError::StepLocked { .. } => ErrorCode::StepLocked,
            WizardError::NoSuchStep { .. } => ErrorCode::InvalidStateTransition,
            WizardError::AgreementFrozen => ErrorCode::AgreementFrozen,
            WizardError::PainPointNotFound(_) | WizardError::NotCustom(_) => {
                ErrorCode::PainPointNotFound
            }
            WizardError::ValueMapItemNotFound(_) => ErrorCode::ValueMapItemNotFound,
            WizardError::MetricNotFound(_) => ErrorCode::MetricNotFound,
            WizardError::SignerIncomplete => ErrorCode::ValidationFailed,
            WizardError::Validation(err) => DomainError::from(err.clone()).code,
        }
    }
}

impl From<WizardError> for DomainError {
    fn from(err: WizardError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
