//! Voice socket HTTP adapter.

mod routes;
mod ws_handler;

pub use routes::voice_routes;
pub use ws_handler::{voice_ws_handler, VoiceConnectParams, VoiceHandlers};
