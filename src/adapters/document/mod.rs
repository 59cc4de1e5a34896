//! Document Adapters
//!
//! - `FileDocumentExporter` - Writes rendered agreements as text files

mod file_exporter;

pub use file_exporter::FileDocumentExporter;
