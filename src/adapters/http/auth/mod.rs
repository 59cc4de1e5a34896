//! Sign-in HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{SignInQuery, SignInRequest, SignInResponse, SignOutResponse};
pub use handlers::{sign_in, sign_out, AuthHandlers};
pub use routes::auth_routes;
