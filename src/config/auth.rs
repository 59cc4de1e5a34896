//! Shared-password authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Password that unlocks the app. Unset means nobody can sign in.
    pub app_password: Option<Secret<String>>,

    /// Key for session tokens. Falls back to a fixed development key.
    pub session_secret: Option<Secret<String>>,

    /// Session cookie lifetime in seconds
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age_secs: u64,
}

impl AuthConfig {
    pub fn has_password(&self) -> bool {
        self.app_password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }

    fn has_session_secret(&self) -> bool {
        self.session_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Validate authentication configuration
    ///
    /// Production requires both the password and a real session secret.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.cookie_max_age_secs == 0 {
            return Err(ValidationError::invalid("cookie_max_age_secs", "must be positive"));
        }
        if *environment == Environment::Production {
            if !self.has_password() {
                return Err(ValidationError::MissingRequired("APP_PASSWORD"));
            }
            if !self.has_session_secret() {
                return Err(ValidationError::MissingRequired("SESSION_SECRET"));
            }
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            app_password: None,
            session_secret: None,
            cookie_max_age_secs: default_cookie_max_age(),
        }
    }
}

fn default_cookie_max_age() -> u64 {
    // 7 days
    60 * 60 * 24 * 7
}
