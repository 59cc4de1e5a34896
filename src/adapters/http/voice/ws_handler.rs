//! WebSocket bridge between a browser and a voice turn controller.
//!
//! # Connection Flow
//! 1. Client upgrades at `/api/discover/voice/{sessionId}/ws?businessName=...`
//! 2. Server spawns a `VoiceTurnController` whose recognizer, player and
//!    on-device voice are the browser itself
//! 3. Client sends `hello` with its capabilities, then `start`
//! 4. Server pushes `snapshot`s and speech instructions; client reports
//!    recognition events and playback completion
//! 5. On disconnect the controller is shut down

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;

use crate::adapters::http::ErrorResponse;
use crate::adapters::speech::{BrowserClient, ClientMessage, Outbound, ServerMessage};
use crate::application::voice::{
    VoicePorts, VoiceSessionContext, VoiceSessionHandle, VoiceTimings, VoiceTurnController,
};
use crate::domain::foundation::SessionId;
use crate::domain::voice::VoiceError;
use crate::ports::{LocalStore, ReasoningService, SpeechSynthesizer};

// ════════════════════════════════════════════════════════════════════════════════
// WebSocket State
// ════════════════════════════════════════════════════════════════════════════════

/// Server-side ports shared by every voice connection.
#[derive(Clone)]
pub struct VoiceHandlers {
    pub reasoning: Arc<dyn ReasoningService>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub store: Arc<dyn LocalStore>,
    pub timings: VoiceTimings,
}

impl VoiceHandlers {
    pub fn new(
        reasoning: Arc<dyn ReasoningService>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn LocalStore>,
        timings: VoiceTimings,
    ) -> Self {
        Self {
            reasoning,
            synthesizer,
            store,
            timings,
        }
    }

    fn ports_for(&self, client: &BrowserClient) -> VoicePorts {
        VoicePorts {
            reasoning: self.reasoning.clone(),
            synthesizer: self.synthesizer.clone(),
            recognizer: Arc::new(client.clone()),
            player: Arc::new(client.clone()),
            local_speech: Arc::new(client.clone()),
            store: self.store.clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Parameters
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConnectParams {
    #[serde(default)]
    pub business_name: String,
    pub notes: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// WebSocket Upgrade Handler
// ════════════════════════════════════════════════════════════════════════════════

/// Route: `GET /api/discover/voice/{session_id}/ws`
pub async fn voice_ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    Query(params): Query<VoiceConnectParams>,
    State(state): State<VoiceHandlers>,
) -> Response {
    let session_id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid session ID")),
            )
                .into_response();
        }
    };

    let context = VoiceSessionContext {
        session_id,
        business_name: params.business_name,
        notes: params.notes.filter(|n| !n.trim().is_empty()),
    };

    ws.on_upgrade(move |socket| handle_voice_socket(socket, context, state))
}

// ════════════════════════════════════════════════════════════════════════════════
// WebSocket Connection Handler
// ════════════════════════════════════════════════════════════════════════════════

type SocketSender = SplitSink<WebSocket, Message>;

async fn handle_voice_socket(socket: WebSocket, context: VoiceSessionContext, state: VoiceHandlers) {
    let (mut sender, mut receiver) = socket.split();
    let session_id = context.session_id;

    let (client, mut outbound) = BrowserClient::new();
    let handle = VoiceTurnController::spawn(context, state.ports_for(&client), state.timings.clone());
    let mut snapshots = handle.subscribe();

    tracing::info!(session_id = %session_id, "Voice socket connected");

    let connected = ServerMessage::Connected {
        session_id: session_id.to_string(),
    };
    if send_server_message(&mut sender, &connected).await.is_ok() {
        loop {
            tokio::select! {
                Some(frame) = outbound.recv() => {
                    if send_frame(&mut sender, frame).await.is_err() {
                        break;
                    }
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if send_server_message(&mut sender, &ServerMessage::Snapshot { snapshot }).await.is_err() {
                        break;
                    }
                }
                incoming = receiver.next() => {
                    let text = match incoming {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::debug!(session_id = %session_id, error = %e, "Voice socket read failed");
                            break;
                        }
                    };

                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => handle_client_message(message, &client, &handle).await,
                        Err(e) => Some(ServerMessage::Error {
                            code: "INVALID_MESSAGE".to_string(),
                            message: e.to_string(),
                        }),
                    };
                    if let Some(reply) = reply {
                        if send_server_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    client.disconnect();
    handle.shutdown().await;
    tracing::info!(session_id = %session_id, "Voice socket closed");
}

/// Applies one client message. Returns a direct reply, if any.
async fn handle_client_message(
    message: ClientMessage,
    client: &BrowserClient,
    handle: &VoiceSessionHandle,
) -> Option<ServerMessage> {
    match message {
        ClientMessage::Hello {
            speech_recognition,
            voices,
        } => {
            tracing::debug!(speech_recognition, voices = voices.len(), "Client capabilities");
            client.set_capabilities(speech_recognition, voices);
            None
        }
        ClientMessage::Start => handle.start().await.err().map(voice_error),
        ClientMessage::ToggleMute => handle.toggle_mute().await.err().map(voice_error),
        ClientMessage::Reset => handle.reset().await.err().map(voice_error),
        ClientMessage::Recognition { stream_id, event } => {
            client.route_recognition(stream_id, event);
            None
        }
        ClientMessage::PlaybackEnded { playback_id, error } => {
            client.playback_ended(playback_id, error);
            None
        }
        ClientMessage::SpeechEnded { utterance_id } => {
            client.speech_ended(utterance_id);
            None
        }
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

fn voice_error(error: VoiceError) -> ServerMessage {
    ServerMessage::Error {
        code: error.code().to_string(),
        message: error.to_string(),
    }
}

async fn send_frame(sender: &mut SocketSender, frame: Outbound) -> Result<(), axum::Error> {
    match frame {
        Outbound::Message(message) => send_server_message(sender, &message).await,
        Outbound::Audio(bytes) => sender.send(Message::Binary(bytes)).await,
    }
}

async fn send_server_message(
    sender: &mut SocketSender,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize voice message");
            return Ok(());
        }
    };
    sender.send(Message::Text(json)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn voice_errors_carry_codes() {
        let ServerMessage::Error { code, message } = voice_error(VoiceError::UnsupportedBrowser) else {
            panic!("expected error message");
        };
        assert_eq!(code, ErrorCode::UnsupportedBrowser.to_string());
        assert!(message.contains("Chrome"));
    }

    #[test]
    fn connect_params_default_business_name() {
        let params: VoiceConnectParams = serde_json::from_str(r#"{"notes":"HVAC"}"#).unwrap();
        assert_eq!(params.business_name, "");
        assert_eq!(params.notes.as_deref(), Some("HVAC"));
    }
}
