//! Application router: every HTTP adapter behind the auth gate.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::auth::{auth_routes, AuthHandlers};
use super::discovery::{discovery_routes, DiscoveryHandlers};
use super::middleware::auth_gate;
use super::voice::{voice_routes, VoiceHandlers};
use crate::adapters::auth::SharedSecretAuth;

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<SharedSecretAuth>,
    pub auth_handlers: AuthHandlers,
    pub discovery: DiscoveryHandlers,
    pub voice: VoiceHandlers,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the application router.
///
/// The request timeout does not apply to the voice socket, which lives for
/// the whole call.
pub fn app_router(state: AppState) -> Router {
    let http_routes = Router::new()
        .merge(auth_routes(state.auth_handlers))
        .merge(discovery_routes(state.discovery))
        .layer(TimeoutLayer::new(state.request_timeout));

    let mut router = Router::new()
        .route("/health", get(health))
        .merge(http_routes)
        .merge(voice_routes(state.voice))
        .layer(middleware::from_fn_with_state(state.auth, auth_gate))
        .layer(TraceLayer::new_for_http());

    if !state.cors_origins.is_empty() {
        let origins = state
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect::<Vec<http::HeaderValue>>();
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_credentials(true)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
                .allow_headers([http::header::CONTENT_TYPE]),
        );
    }

    router
}
