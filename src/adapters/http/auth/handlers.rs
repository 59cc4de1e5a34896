//! HTTP handlers for sign-in and sign-out.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::auth::{SharedSecretAuth, SESSION_COOKIE};
use crate::adapters::http::ErrorResponse;

use super::dto::{SignInQuery, SignInRequest, SignInResponse, SignOutResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AuthHandlers {
    auth: Arc<SharedSecretAuth>,
    cookie_max_age_secs: u64,
    secure_cookies: bool,
}

impl AuthHandlers {
    pub fn new(auth: Arc<SharedSecretAuth>, cookie_max_age_secs: u64, secure_cookies: bool) -> Self {
        Self {
            auth,
            cookie_max_age_secs,
            secure_cookies,
        }
    }

    fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, self.cookie_max_age_secs
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn expired_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            SESSION_COOKIE
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/auth - Exchange the shared password for a session cookie
pub async fn sign_in(
    State(handlers): State<AuthHandlers>,
    Query(query): Query<SignInQuery>,
    Json(req): Json<SignInRequest>,
) -> Response {
    let Some(token) = handlers.auth.sign_in(&req.password) else {
        tracing::info!("Rejected sign-in attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Incorrect password")),
        )
            .into_response();
    };

    let response = SignInResponse {
        ok: true,
        redirect_to: query.from.unwrap_or_else(|| "/".to_string()),
    };
    (
        StatusCode::OK,
        [(header::SET_COOKIE, handlers.session_cookie(&token))],
        Json(response),
    )
        .into_response()
}

/// DELETE /api/auth - Expire the session cookie
pub async fn sign_out(State(handlers): State<AuthHandlers>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, handlers.expired_cookie())],
        Json(SignOutResponse { ok: true }),
    )
        .into_response()
}
