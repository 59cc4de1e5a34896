//! Session-cookie gate for every non-public route.
//!
//! ```text
//! Request ──public prefix?──▶ handler
//!    │
//!    └─valid 11-8-session cookie?──yes──▶ handler
//!                                  no───▶ 307 /login?from={path}
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::adapters::auth::{SharedSecretAuth, SESSION_COOKIE};

/// Path prefixes reachable without a session.
pub const PUBLIC_PREFIXES: &[&str] = &["/login", "/api/auth", "/_next", "/favicon", "/health"];

/// Gate state - the shared-secret checker.
pub type GateState = Arc<SharedSecretAuth>;

pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Value of the named cookie, if the request carries it.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Redirects unauthenticated requests to the login page.
pub async fn auth_gate(State(auth): State<GateState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_public(&path) {
        return next.run(request).await;
    }

    let authorized = cookie_value(request.headers(), SESSION_COOKIE)
        .is_some_and(|token| auth.validate_token(token));
    if authorized {
        return next.run(request).await;
    }

    tracing::debug!(path = %path, "Redirecting unauthenticated request to login");
    let location = format!("/login?from={}", urlencoding::encode(&path));
    Redirect::temporary(&location).into_response()
}
