//! Integration tests for the discovery wizard through its handlers.
//!
//! Sessions are persisted with the file-backed local store so a flow can be
//! resumed by a second set of handlers, the way a page reload would.

use std::sync::Arc;

use tempfile::TempDir;

use discovery_desk::adapters::document::FileDocumentExporter;
use discovery_desk::adapters::storage::FileLocalStore;
use discovery_desk::application::handlers::discovery::{
    ApplyCommandCommand, ApplyCommandHandler, DiscoveryError, DiscoverySessionStore,
    ExportAgreementCommand, ExportAgreementHandler, LoadSessionHandler, LoadSessionQuery,
};
use discovery_desk::domain::discovery::{
    DiscoverySession, DiscoveryWizard, MetricPatch, RevenueRange, SessionCommand, SnapshotPatch,
    TeamSize, WizardError, WizardStep,
};
use discovery_desk::domain::document::PageLayout;
use discovery_desk::domain::foundation::{PainPointId, SessionId, Timestamp};
use discovery_desk::domain::{discovery, voice};
use discovery_desk::ports::LocalStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Desk {
    load: LoadSessionHandler,
    apply: ApplyCommandHandler,
    export: ExportAgreementHandler,
}

impl Desk {
    fn open(data: &TempDir) -> Self {
        let wizard = Arc::new(DiscoveryWizard::default());
        let sessions = DiscoverySessionStore::new(Arc::new(FileLocalStore::new(data.path().join("store"))));
        Self {
            load: LoadSessionHandler::new(wizard.clone(), sessions.clone()),
            apply: ApplyCommandHandler::new(wizard, sessions.clone()),
            export: ExportAgreementHandler::new(
                sessions,
                Arc::new(FileDocumentExporter::new(data.path().join("exports"))),
                "11-8 AI",
                PageLayout::default(),
            ),
        }
    }

    async fn run(&self, id: SessionId, command: SessionCommand) -> Result<DiscoverySession, DiscoveryError> {
        self.apply
            .handle(ApplyCommandCommand { session_id: id, command })
            .await
    }

    async fn run_all(&self, id: SessionId, commands: Vec<SessionCommand>) -> DiscoverySession {
        let mut last = None;
        for command in commands {
            let name = command.name();
            last = Some(
                self.run(id, command)
                    .await
                    .unwrap_or_else(|e| panic!("{name} failed: {e}")),
            );
        }
        last.expect("at least one command")
    }
}

fn pid(id: &str) -> PainPointId {
    PainPointId::new(id).unwrap()
}

fn snapshot() -> SessionCommand {
    SessionCommand::UpdateSnapshot {
        patch: SnapshotPatch::default()
            .business_name("Acme Plumbing Co")
            .industry("Home Services")
            .team_size(TeamSize::SixToFifteen)
            .revenue_range(RevenueRange::From100KTo500K)
            .typical_day("Dispatching crews, quoting jobs and chasing unpaid invoices"),
    }
}

fn pain_points() -> Vec<SessionCommand> {
    vec![
        SessionCommand::TogglePainPoint { id: pid("scheduling") },
        SessionCommand::TogglePainPoint { id: pid("invoicing") },
        SessionCommand::SetPainPointHours { id: pid("scheduling"), hours: Some(10.0) },
        SessionCommand::SetPainPointHours { id: pid("invoicing"), hours: Some(6.0) },
        SessionCommand::SetPainPointConsequence {
            id: pid("invoicing"),
            consequence: "Cash flow gaps every month".into(),
        },
    ]
}

/// Drives a session from a blank start to the agreement step.
async fn walk_to_agreement(desk: &Desk, id: SessionId) -> DiscoverySession {
    let mut commands = vec![snapshot(), SessionCommand::advance()];
    commands.extend(pain_points());
    commands.extend([
        SessionCommand::advance(), // value mapping
        SessionCommand::advance(), // automation
        SessionCommand::advance(), // metrics
        SessionCommand::SetValueShare { percent: 15 },
        SessionCommand::advance(), // agreement
    ]);
    desk.run_all(id, commands).await
}

// =============================================================================
// Full flow
// =============================================================================

#[tokio::test]
async fn walks_all_six_steps_and_signs() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();

    let session = walk_to_agreement(&desk, id).await;
    assert_eq!(session.current_step(), WizardStep::Agreement);
    assert_eq!(session.value_map().len(), 2);
    assert!(!session.automation_opportunities().is_empty());
    assert!(!session.agreement().metrics.is_empty());
    assert_eq!(session.agreement().value_share_percent.value(), 15);
    assert!(session.total_annual_cost() > 0);

    let signed = desk
        .run_all(
            id,
            vec![
                SessionCommand::SetClientName { name: "Jordan Avery".into() },
                SessionCommand::SetClientEmail { email: "jordan@acme.example".into() },
                SessionCommand::agree(),
            ],
        )
        .await;
    assert!(signed.is_agreed());
    assert!(signed.check_invariants().is_ok());

    let split = signed.value_split();
    assert_eq!(split.our_share + split.their_share, split.total_savings);
}

#[tokio::test]
async fn progress_survives_a_reload() {
    let data = TempDir::new().unwrap();
    let id = SessionId::new();
    {
        let desk = Desk::open(&data);
        desk.run_all(id, vec![snapshot(), SessionCommand::advance()]).await;
        desk.run_all(id, pain_points()).await;
    }

    let desk = Desk::open(&data);
    let resumed = desk.load.handle(LoadSessionQuery { session_id: id }).await.unwrap();
    assert_eq!(resumed.current_step(), WizardStep::PainPoints);
    assert_eq!(resumed.business_snapshot().business_name, "Acme Plumbing Co");
    let selected: Vec<&str> = resumed
        .ranked_pain_points()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(selected, vec!["scheduling", "invoicing"]);
}

#[tokio::test]
async fn unknown_session_loads_blank() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);

    let session = desk
        .load
        .handle(LoadSessionQuery { session_id: SessionId::new() })
        .await
        .unwrap();
    assert_eq!(session.current_step(), WizardStep::Snapshot);
    assert!(session.business_snapshot().business_name.is_empty());
}

// =============================================================================
// Guards and freezing
// =============================================================================

#[tokio::test]
async fn rejected_command_leaves_stored_session_unchanged() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();
    desk.run(id, snapshot()).await.unwrap();

    let err = desk
        .run(id, SessionCommand::TogglePainPoint { id: pid("scheduling") })
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Wizard(WizardError::StepLocked { .. })));

    let stored = desk.load.handle(LoadSessionQuery { session_id: id }).await.unwrap();
    assert!(stored.pain_points().iter().all(|p| !p.selected));
}

#[tokio::test]
async fn incomplete_snapshot_blocks_advance() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();

    let err = desk.run(id, SessionCommand::advance()).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Wizard(WizardError::GuardFailed { step: WizardStep::Snapshot, .. })));
}

#[tokio::test]
async fn signed_agreement_is_read_only_but_navigable() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();
    walk_to_agreement(&desk, id).await;
    desk.run_all(
        id,
        vec![
            SessionCommand::SetClientName { name: "Jordan Avery".into() },
            SessionCommand::SetClientEmail { email: "jordan@acme.example".into() },
            SessionCommand::agree(),
        ],
    )
    .await;

    let err = desk
        .run(id, SessionCommand::SetClientName { name: "Someone Else".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Wizard(WizardError::AgreementFrozen)));

    let back = desk.run(id, SessionCommand::Back).await.unwrap();
    assert_eq!(back.current_step(), WizardStep::Metrics);
    let metric = back.agreement().metrics[0].id;
    let err = desk
        .run(
            id,
            SessionCommand::UpdateMetric { id: metric, patch: MetricPatch::default().name("Changed") },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Wizard(WizardError::AgreementFrozen)));
}

#[tokio::test]
async fn reset_starts_over_under_the_same_id() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();
    walk_to_agreement(&desk, id).await;

    let fresh = desk
        .run(id, SessionCommand::Reset { created_at: Timestamp::now() })
        .await
        .unwrap();
    assert_eq!(fresh.id(), &id);
    assert_eq!(fresh.current_step(), WizardStep::Snapshot);
    assert!(fresh.value_map().is_empty());
    assert!(fresh.agreement().metrics.is_empty());
}

#[tokio::test]
async fn reset_removes_both_stored_entries() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();
    walk_to_agreement(&desk, id).await;

    let store = FileLocalStore::new(data.path().join("store"));
    store
        .set(&voice::storage_key(&id), r#"{"sessionId":"x"}"#.to_string())
        .await
        .unwrap();
    assert!(store.get(&discovery::storage_key(&id)).await.unwrap().is_some());

    desk.run(id, SessionCommand::Reset { created_at: Timestamp::now() })
        .await
        .unwrap();

    assert_eq!(store.get(&discovery::storage_key(&id)).await.unwrap(), None);
    assert_eq!(store.get(&voice::storage_key(&id)).await.unwrap(), None);

    let reloaded = desk.load.handle(LoadSessionQuery { session_id: id }).await.unwrap();
    assert_eq!(reloaded.current_step(), WizardStep::Snapshot);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn signed_agreement_exports_to_the_data_directory() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();
    walk_to_agreement(&desk, id).await;
    desk.run_all(
        id,
        vec![
            SessionCommand::SetClientName { name: "Jordan Avery".into() },
            SessionCommand::SetClientEmail { email: "jordan@acme.example".into() },
            SessionCommand::agree(),
        ],
    )
    .await;

    let exported = desk
        .export
        .handle(ExportAgreementCommand { session_id: id })
        .await
        .unwrap();

    assert_eq!(exported.file_name, "11-8-AI-Agreement-Acme-Plumbing-Co.txt");
    let text = std::fs::read_to_string(data.path().join("exports").join(&exported.file_name)).unwrap();
    assert_eq!(exported.bytes_written, text.len());
    assert!(text.starts_with("11-8 AI - Discovery Agreement"));
    assert!(text.contains("Prepared for: Acme Plumbing Co"));
    assert!(text.contains("Value-share: 15% of measurable value created"));
    assert!(text.contains("Client: Jordan Avery"));
}

#[tokio::test]
async fn exporting_an_unknown_session_is_not_found() {
    let data = TempDir::new().unwrap();
    let desk = Desk::open(&data);
    let id = SessionId::new();

    let err = desk
        .export
        .handle(ExportAgreementCommand { session_id: id })
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::NotFound(id));
}
