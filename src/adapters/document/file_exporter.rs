//! File Document Exporter - Writes rendered documents as UTF-8 text.
//!
//! Pages are separated by form feeds. Files are written to
//! `{base_path}/{file_name}.txt` via a temp file and rename.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::domain::document::RenderedDocument;
use crate::ports::{DocumentExporter, ExportError, ExportedDocument};

#[derive(Debug, Clone)]
pub struct FileDocumentExporter {
    base_path: PathBuf,
}

impl FileDocumentExporter {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn check_file_name(name: &str) -> Result<(), ExportError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ExportError::InvalidFileName(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentExporter for FileDocumentExporter {
    async fn export(&self, document: &RenderedDocument) -> Result<ExportedDocument, ExportError> {
        Self::check_file_name(&document.file_name)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ExportError::Io(e.to_string()))?;

        let file_name = format!("{}.txt", document.file_name);
        let path = self.base_path.join(&file_name);
        let temp = self.base_path.join(format!("{}.tmp", file_name));
        let content = document.to_text();

        fs::write(&temp, &content)
            .await
            .map_err(|e| ExportError::Io(e.to_string()))?;
        fs::rename(&temp, &path)
            .await
            .map_err(|e| ExportError::Io(e.to_string()))?;

        info!(path = %path.display(), pages = document.page_count(), "Exported agreement");
        Ok(ExportedDocument {
            file_name,
            location: path.display().to_string(),
            bytes_written: content.len(),
        })
    }
}
