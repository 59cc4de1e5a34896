//! HTTP adapters - REST and WebSocket endpoints.
//!
//! - `auth` - shared-password sign-in
//! - `discovery` - agent turns, speech synthesis, wizard sessions
//! - `voice` - the voice socket
//! - `middleware` - the session-cookie gate

pub mod auth;
pub mod discovery;
pub mod middleware;
pub mod voice;

mod error;
mod router;

pub use error::ErrorResponse;
pub use router::{app_router, AppState};
