//! HTTP routes for discovery endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{apply_command, chat, export_agreement, get_session, tts, DiscoveryHandlers};

/// Agent turns, speech synthesis and the wizard session API.
pub fn discovery_routes(handlers: DiscoveryHandlers) -> Router {
    Router::new()
        .route("/api/discover/chat", post(chat))
        .route("/api/tts", post(tts))
        .route("/api/discover/sessions/:id", get(get_session))
        .route("/api/discover/sessions/:id/commands", post(apply_command))
        .route("/api/discover/sessions/:id/export", post(export_agreement))
        .with_state(handlers)
}
