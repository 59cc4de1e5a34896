//! Authentication adapters.
//!
//! - `SharedSecretAuth` - Single shared password with HMAC session tokens

mod shared_secret;

pub use shared_secret::{SharedSecretAuth, FALLBACK_SECRET, SESSION_COOKIE};
