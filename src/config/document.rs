//! Agreement document configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::document::PageLayout;

/// Branding and page geometry for exported agreements.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Consultancy name used in titles, file names and the persona
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    #[serde(default = "default_margin")]
    pub margin_mm: f64,

    #[serde(default = "default_column_width")]
    pub column_width_mm: f64,

    /// Lowest y position before a new page starts
    #[serde(default = "default_page_limit")]
    pub page_limit_mm: f64,
}

impl DocumentConfig {
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            margin: self.margin_mm,
            column_width: self.column_width_mm,
            page_limit: self.page_limit_mm,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.brand_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DOCUMENT__BRAND_NAME"));
        }
        if self.column_width_mm <= 0.0 {
            return Err(ValidationError::invalid("document.column_width_mm", "must be positive"));
        }
        if self.page_limit_mm <= self.margin_mm {
            return Err(ValidationError::invalid(
                "document.page_limit_mm",
                "must be below the top margin",
            ));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            brand_name: default_brand_name(),
            margin_mm: default_margin(),
            column_width_mm: default_column_width(),
            page_limit_mm: default_page_limit(),
        }
    }
}

fn default_brand_name() -> String {
    "11-8 AI".to_string()
}

fn default_margin() -> f64 {
    20.0
}

fn default_column_width() -> f64 {
    170.0
}

fn default_page_limit() -> f64 {
    275.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_a4_portrait() {
        assert_eq!(DocumentConfig::default().layout(), PageLayout::default());
    }

    #[test]
    fn page_limit_must_clear_margin() {
        let config = DocumentConfig {
            page_limit_mm: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
