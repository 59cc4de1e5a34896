//! Discovery Desk server binary.
//!
//! Loads configuration from the environment, wires adapters to the
//! application handlers and serves the HTTP and voice socket API with
//! graceful shutdown on SIGTERM/SIGINT.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use discovery_desk::adapters::auth::SharedSecretAuth;
use discovery_desk::adapters::http::auth::AuthHandlers;
use discovery_desk::adapters::http::discovery::DiscoveryHandlers;
use discovery_desk::adapters::http::voice::VoiceHandlers;
use discovery_desk::adapters::http::{app_router, AppState};
use discovery_desk::adapters::{
    ElevenLabsConfig, ElevenLabsSynthesizer, FileDocumentExporter, FileLocalStore, GroqConfig,
    GroqProvider,
};
use discovery_desk::application::handlers::{
    AgentTurnHandler, ApplyCommandHandler, DiscoverySessionStore, ExportAgreementHandler,
    LoadSessionHandler,
};
use discovery_desk::config::AppConfig;
use discovery_desk::domain::discovery::DiscoveryWizard;
use discovery_desk::ports::{LocalStore, ReasoningService, SpeechSynthesizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate()?;
    let addr = config.server.socket_addr()?;

    if !config.auth.has_password() {
        tracing::warn!("No app password configured; sign-in is disabled");
    }
    if !config.ai.has_groq() {
        tracing::warn!("No Groq API key configured; agent turns will fail");
    }
    if !config.tts.has_elevenlabs() {
        tracing::warn!("No ElevenLabs API key configured; voice falls back to on-device speech");
    }

    let state = build_state(&config);
    let app = app_router(state);

    tracing::info!(%addr, environment = ?config.server.environment, "Starting discovery desk");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Discovery desk shut down");
    Ok(())
}

fn build_state(config: &AppConfig) -> AppState {
    let brand = config.document.brand_name.clone();

    // Ports
    let groq_key = config
        .ai
        .groq_api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let reasoning: Arc<dyn ReasoningService> = Arc::new(GroqProvider::new(
        GroqConfig::new(groq_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_max_tokens(config.ai.max_tokens)
            .with_timeout(config.ai.timeout())
            .with_brand(brand.clone()),
    ));
    let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(ElevenLabsSynthesizer::new(
        ElevenLabsConfig::new(config.tts.elevenlabs_api_key.clone())
            .with_voice_id(config.tts.voice_id.clone())
            .with_model_id(config.tts.model_id.clone())
            .with_base_url(config.tts.base_url.clone())
            .with_timeout(config.tts.timeout()),
    ));
    let store: Arc<dyn LocalStore> = Arc::new(FileLocalStore::new(config.storage.store_dir()));
    let exporter = Arc::new(FileDocumentExporter::new(config.storage.export_dir()));

    // Application handlers
    let wizard = Arc::new(DiscoveryWizard::default());
    let sessions = DiscoverySessionStore::new(store.clone());
    let discovery = DiscoveryHandlers::new(
        Arc::new(AgentTurnHandler::new(reasoning.clone())),
        synthesizer.clone(),
        Arc::new(LoadSessionHandler::new(wizard.clone(), sessions.clone())),
        Arc::new(ApplyCommandHandler::new(wizard, sessions.clone())),
        Arc::new(ExportAgreementHandler::new(
            sessions,
            exporter,
            brand,
            config.document.layout(),
        )),
    );

    let auth = Arc::new(SharedSecretAuth::new(
        config.auth.app_password.clone(),
        config.auth.session_secret.clone(),
    ));

    AppState {
        auth_handlers: AuthHandlers::new(
            auth.clone(),
            config.auth.cookie_max_age_secs,
            config.is_production(),
        ),
        auth,
        discovery,
        voice: VoiceHandlers::new(reasoning, synthesizer, store, config.voice.timings()),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        cors_origins: config.server.cors_origins_list(),
    }
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
