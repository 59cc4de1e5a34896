//! HTTP handlers for discovery endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::ErrorResponse;
use crate::application::handlers::conversation::{AgentTurnCommand, AgentTurnHandler};
use crate::application::handlers::discovery::{
    ApplyCommandCommand, ApplyCommandHandler, DiscoveryError, ExportAgreementCommand,
    ExportAgreementHandler, LoadSessionHandler, LoadSessionQuery,
};
use crate::domain::discovery::{SessionCommand, WizardError};
use crate::domain::foundation::SessionId;
use crate::ports::{SpeechSynthesizer, SynthesisError};

use super::dto::{ChatRequest, ExportResponse, TtsRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DiscoveryHandlers {
    agent_turn: Arc<AgentTurnHandler>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    load_session: Arc<LoadSessionHandler>,
    apply_command: Arc<ApplyCommandHandler>,
    export_agreement: Arc<ExportAgreementHandler>,
}

impl DiscoveryHandlers {
    pub fn new(
        agent_turn: Arc<AgentTurnHandler>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        load_session: Arc<LoadSessionHandler>,
        apply_command: Arc<ApplyCommandHandler>,
        export_agreement: Arc<ExportAgreementHandler>,
    ) -> Self {
        Self {
            agent_turn,
            synthesizer,
            load_session,
            apply_command,
            export_agreement,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/discover/chat - One agent turn
pub async fn chat(
    State(handlers): State<DiscoveryHandlers>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let cmd = AgentTurnCommand {
        messages: req.messages,
        business_name: req.business_name,
        notes: req.notes,
    };

    match handlers.agent_turn.handle(cmd).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to get agent response")),
        )
            .into_response(),
    }
}

/// POST /api/tts - Synthesize speech as audio/mpeg
pub async fn tts(
    State(handlers): State<DiscoveryHandlers>,
    Json(req): Json<TtsRequest>,
) -> Response {
    let text = match req.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("No text provided")),
            )
                .into_response()
        }
    };

    match handlers.synthesizer.synthesize(&text).await {
        Ok(audio) => {
            let length = audio.len().to_string();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, audio.content_type.clone()),
                    (header::CONTENT_LENGTH, length),
                ],
                audio.bytes,
            )
                .into_response()
        }
        Err(SynthesisError::NotConfigured) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("ElevenLabs API key not configured")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Speech synthesis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("TTS failed")),
            )
                .into_response()
        }
    }
}

/// GET /api/discover/sessions/:id - Current wizard state
pub async fn get_session(
    State(handlers): State<DiscoveryHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .load_session
        .handle(LoadSessionQuery { session_id })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => handle_discovery_error(e),
    }
}

/// POST /api/discover/sessions/:id/commands - Apply one wizard command
pub async fn apply_command(
    State(handlers): State<DiscoveryHandlers>,
    Path(session_id): Path<String>,
    Json(command): Json<SessionCommand>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .apply_command
        .handle(ApplyCommandCommand { session_id, command })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => handle_discovery_error(e),
    }
}

/// POST /api/discover/sessions/:id/export - Write the agreement document
pub async fn export_agreement(
    State(handlers): State<DiscoveryHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .export_agreement
        .handle(ExportAgreementCommand { session_id })
        .await
    {
        Ok(exported) => (StatusCode::CREATED, Json(ExportResponse::from(exported))).into_response(),
        Err(e) => handle_discovery_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid session ID")),
        )
            .into_response()
    })
}

fn handle_discovery_error(error: DiscoveryError) -> Response {
    let status = match &error {
        DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
        DiscoveryError::Wizard(WizardError::GuardFailed { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        DiscoveryError::Wizard(
            WizardError::StepLocked { .. }
            | WizardError::AgreementFrozen
            | WizardError::NoSuchStep { .. },
        ) => StatusCode::CONFLICT,
        DiscoveryError::Wizard(
            WizardError::PainPointNotFound(_)
            | WizardError::ValueMapItemNotFound(_)
            | WizardError::MetricNotFound(_),
        ) => StatusCode::NOT_FOUND,
        DiscoveryError::Wizard(_) => StatusCode::BAD_REQUEST,
        DiscoveryError::Store(_) | DiscoveryError::Export(_) | DiscoveryError::Serialization(_) => {
            tracing::error!(error = %error, "Discovery request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse::with_code(error.to_string(), error.code())),
    )
        .into_response()
}
