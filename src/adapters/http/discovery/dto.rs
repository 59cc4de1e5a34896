//! HTTP DTOs for discovery endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::voice::ChatMessage;
use crate::ports::ExportedDocument;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/discover/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /api/tts`.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Where an exported agreement was written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub file_name: String,
    pub location: String,
    pub bytes_written: usize,
}

impl From<ExportedDocument> for ExportResponse {
    fn from(doc: ExportedDocument) -> Self {
        Self {
            file_name: doc.file_name,
            location: doc.location,
            bytes_written: doc.bytes_written,
        }
    }
}
