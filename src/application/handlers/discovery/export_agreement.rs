//! ExportAgreementHandler - Renders and writes the agreement document.

use std::sync::Arc;

use super::errors::DiscoveryError;
use super::session_store::DiscoverySessionStore;
use crate::domain::document::{render_agreement, PageLayout};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{DocumentExporter, ExportedDocument};

/// Command to export a session's agreement.
#[derive(Debug, Clone)]
pub struct ExportAgreementCommand {
    pub session_id: SessionId,
}

/// Renders the agreement and hands it to the exporter.
///
/// Works before signing too, as a preview. The document is dated with the
/// signing time once there is one.
pub struct ExportAgreementHandler {
    sessions: DiscoverySessionStore,
    exporter: Arc<dyn DocumentExporter>,
    brand: String,
    layout: PageLayout,
}

impl ExportAgreementHandler {
    pub fn new(
        sessions: DiscoverySessionStore,
        exporter: Arc<dyn DocumentExporter>,
        brand: impl Into<String>,
        layout: PageLayout,
    ) -> Self {
        Self {
            sessions,
            exporter,
            brand: brand.into(),
            layout,
        }
    }

    pub async fn handle(&self, cmd: ExportAgreementCommand) -> Result<ExportedDocument, DiscoveryError> {
        let session = self
            .sessions
            .load(&cmd.session_id)
            .await?
            .ok_or(DiscoveryError::NotFound(cmd.session_id))?;

        let date = session.agreement().agreed_at.unwrap_or_else(Timestamp::now);
        let document = render_agreement(&session, &self.brand, &date, self.layout);
        Ok(self.exporter.export(&document).await?)
    }
}
