//! Discovery HTTP adapter.
//!
//! - `POST /api/discover/chat` - agent turn
//! - `POST /api/tts` - speech synthesis
//! - `/api/discover/sessions/:id` - wizard state, commands and export

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ExportResponse, TtsRequest};
pub use handlers::DiscoveryHandlers;
pub use routes::discovery_routes;
