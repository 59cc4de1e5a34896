//! JSON error bodies shared by the HTTP adapters.

use serde::Serialize;

use crate::domain::foundation::ErrorCode;

/// `{"error": "...", "code": "..."}`. The code is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_error_has_no_code() {
        let json = serde_json::to_value(ErrorResponse::new("No text provided")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No text provided"}));
    }

    #[test]
    fn coded_error_uses_screaming_snake() {
        let json =
            serde_json::to_value(ErrorResponse::with_code("locked", ErrorCode::StepLocked)).unwrap();
        assert_eq!(json["code"], "STEP_LOCKED");
    }
}
