//! HTTP routes for sign-in.

use axum::{routing::post, Router};

use super::handlers::{sign_in, sign_out, AuthHandlers};

/// `POST`/`DELETE` on `/api/auth`.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/api/auth", post(sign_in).delete(sign_out))
        .with_state(handlers)
}
