//! HTTP route for the voice socket.

use axum::{routing::get, Router};

use super::ws_handler::{voice_ws_handler, VoiceHandlers};

pub fn voice_routes(handlers: VoiceHandlers) -> Router {
    Router::new()
        .route("/api/discover/voice/:session_id/ws", get(voice_ws_handler))
        .with_state(handlers)
}
