//! Shared-password session authentication.
//!
//! The session token is the hex HMAC-SHA256 of the configured password,
//! keyed by the session secret. Validation recomputes it and compares in
//! constant time. With no password configured, nobody can sign in and
//! every token is rejected.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "11-8-session";

/// Secret used when none is configured.
pub const FALLBACK_SECRET: &str = "fallback-secret";

#[derive(Debug, Clone)]
pub struct SharedSecretAuth {
    password: Option<Secret<String>>,
    session_secret: Secret<String>,
}

impl SharedSecretAuth {
    pub fn new(password: Option<Secret<String>>, session_secret: Option<Secret<String>>) -> Self {
        Self {
            password: password.filter(|p| !p.expose_secret().is_empty()),
            session_secret: session_secret
                .unwrap_or_else(|| Secret::new(FALLBACK_SECRET.to_string())),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password.is_some()
    }

    /// Hex HMAC-SHA256 of `password` keyed by the session secret.
    pub fn make_token(&self, password: &str) -> String {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac = match HmacSha256::new_from_slice(self.session_secret.expose_secret().as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(password.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a sign-in attempt. Returns the session token on success.
    pub fn sign_in(&self, attempt: &str) -> Option<String> {
        let password = self.password.as_ref()?;
        let expected = password.expose_secret().as_bytes();
        if bool::from(attempt.as_bytes().ct_eq(expected)) {
            Some(self.make_token(attempt))
        } else {
            None
        }
    }

    pub fn validate_token(&self, token: &str) -> bool {
        let Some(password) = &self.password else {
            return false;
        };
        let expected = self.make_token(password.expose_secret());
        !expected.is_empty() && bool::from(token.as_bytes().ct_eq(expected.as_bytes()))
    }
}
