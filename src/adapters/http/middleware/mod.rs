//! HTTP middleware.
//!
//! - `auth_gate` - Session-cookie gate with login redirect

mod auth_gate;

pub use auth_gate::{auth_gate, cookie_value, is_public, GateState, PUBLIC_PREFIXES};
