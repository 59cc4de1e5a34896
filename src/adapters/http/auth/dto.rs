//! HTTP DTOs for the sign-in endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub password: String,
}

/// Query of `POST /api/auth`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInQuery {
    pub from: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub ok: bool,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignOutResponse {
    pub ok: bool,
}
