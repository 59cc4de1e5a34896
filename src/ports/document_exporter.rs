//! Document Exporter Port - Writes rendered agreement documents.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::document::RenderedDocument;

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, document: &RenderedDocument) -> Result<ExportedDocument, ExportError>;
}

/// Where an export landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub location: String,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("I/O error: {0}")]
    Io(String),
}
