//! Browser-backed speech adapters.
//!
//! One [`BrowserClient`] per voice socket. It implements the recognizer,
//! audio player and on-device voice ports by sending [`ServerMessage`]s
//! to the browser and routing the browser's replies back to whichever
//! call is waiting on them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

use super::protocol::{ClientRecognitionEvent, ServerMessage};
use crate::domain::voice::VoiceInfo;
use crate::ports::{
    AudioPlayer, LocalSpeech, LocalUtterance, PlaybackError, RecognitionError, RecognitionEvent,
    RecognitionStream, SpeechRecognizer, SynthesizedAudio,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A frame queued for the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(ServerMessage),
    Audio(Vec<u8>),
}

#[derive(Default)]
struct BridgeInner {
    speech_recognition: bool,
    voices: Vec<VoiceInfo>,
    next_id: u64,
    recognition: Option<(u64, mpsc::UnboundedSender<RecognitionEvent>)>,
    playbacks: HashMap<u64, oneshot::Sender<Result<(), PlaybackError>>>,
    utterances: HashMap<u64, oneshot::Sender<()>>,
    disconnected: bool,
}

impl BridgeInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Speech ports backed by a connected browser.
#[derive(Clone)]
pub struct BrowserClient {
    outbound: mpsc::UnboundedSender<Outbound>,
    inner: Arc<Mutex<BridgeInner>>,
}

impl BrowserClient {
    /// Creates a client and the receiver the socket writer drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let client = Self {
            outbound,
            inner: Arc::new(Mutex::new(BridgeInner::default())),
        };
        (client, rx)
    }

    /// Records what the browser reported it can do.
    pub fn set_capabilities(&self, speech_recognition: bool, voices: Vec<VoiceInfo>) {
        let mut inner = lock(&self.inner);
        inner.speech_recognition = speech_recognition;
        inner.voices = voices;
    }

    /// Routes a recognition callback to the live stream.
    ///
    /// Events for a stream that was already aborted are dropped.
    pub fn route_recognition(&self, stream_id: u64, event: ClientRecognitionEvent) {
        let inner = lock(&self.inner);
        let Some((live_id, tx)) = inner.recognition.as_ref() else {
            return;
        };
        if *live_id != stream_id {
            tracing::debug!(stream_id, live_id, "Dropping event for stale recognition stream");
            return;
        }
        let event = match event {
            ClientRecognitionEvent::Interim { text } => RecognitionEvent::Interim(text),
            ClientRecognitionEvent::Final { text } => RecognitionEvent::Final(text),
            ClientRecognitionEvent::Error { error } => RecognitionEvent::Error(error),
            ClientRecognitionEvent::End => RecognitionEvent::Ended,
        };
        let _ = tx.send(event);
    }

    /// Completes a pending `play` call.
    pub fn playback_ended(&self, playback_id: u64, error: Option<String>) {
        let waiter = lock(&self.inner).playbacks.remove(&playback_id);
        if let Some(waiter) = waiter {
            let result = match error {
                Some(message) => Err(PlaybackError::Failed(message)),
                None => Ok(()),
            };
            let _ = waiter.send(result);
        }
    }

    /// Completes a pending `speak` call.
    pub fn speech_ended(&self, utterance_id: u64) {
        let waiter = lock(&self.inner).utterances.remove(&utterance_id);
        if let Some(waiter) = waiter {
            let _ = waiter.send(());
        }
    }

    /// Fails everything still waiting on the browser.
    pub fn disconnect(&self) {
        let mut inner = lock(&self.inner);
        inner.disconnected = true;
        inner.recognition = None;
        // Dropping the senders resolves waiters with `Disconnected`.
        inner.playbacks.clear();
        inner.utterances.clear();
    }

    fn send(&self, message: ServerMessage) {
        let _ = self.outbound.send(Outbound::Message(message));
    }
}

#[async_trait]
impl SpeechRecognizer for BrowserClient {
    fn is_supported(&self) -> bool {
        lock(&self.inner).speech_recognition
    }

    async fn start(&self) -> Result<Box<dyn RecognitionStream>, RecognitionError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let stream_id = {
            let mut inner = lock(&self.inner);
            if !inner.speech_recognition {
                return Err(RecognitionError::Unsupported);
            }
            if inner.disconnected {
                return Err(RecognitionError::StartFailed("client disconnected".into()));
            }
            let id = inner.next_id();
            inner.recognition = Some((id, tx));
            id
        };
        self.send(ServerMessage::StartRecognition { stream_id });
        Ok(Box::new(BrowserRecognitionStream {
            stream_id,
            events: rx,
            client: self.clone(),
            closed: false,
        }))
    }
}

#[async_trait]
impl AudioPlayer for BrowserClient {
    async fn play(&self, audio: SynthesizedAudio) -> Result<(), PlaybackError> {
        let (tx, rx) = oneshot::channel();
        let playback_id = {
            let mut inner = lock(&self.inner);
            if inner.disconnected {
                return Err(PlaybackError::Disconnected);
            }
            let id = inner.next_id();
            inner.playbacks.insert(id, tx);
            id
        };
        self.send(ServerMessage::PlayAudio {
            playback_id,
            content_type: audio.content_type,
            byte_length: audio.bytes.len(),
        });
        let _ = self.outbound.send(Outbound::Audio(audio.bytes));

        rx.await.unwrap_or(Err(PlaybackError::Disconnected))
    }

    fn stop(&self) {
        let waiters: Vec<_> = lock(&self.inner).playbacks.drain().map(|(_, w)| w).collect();
        self.send(ServerMessage::StopAudio);
        for waiter in waiters {
            let _ = waiter.send(Ok(()));
        }
    }
}

#[async_trait]
impl LocalSpeech for BrowserClient {
    async fn voices(&self) -> Vec<VoiceInfo> {
        lock(&self.inner).voices.clone()
    }

    async fn speak(&self, utterance: LocalUtterance) -> Result<(), PlaybackError> {
        let (tx, rx) = oneshot::channel();
        let utterance_id = {
            let mut inner = lock(&self.inner);
            if inner.disconnected {
                return Err(PlaybackError::Disconnected);
            }
            let id = inner.next_id();
            inner.utterances.insert(id, tx);
            id
        };
        self.send(ServerMessage::Speak {
            utterance_id,
            text: utterance.text,
            voice: utterance.voice,
            rate: utterance.rate,
            pitch: utterance.pitch,
        });

        rx.await.map_err(|_| PlaybackError::Disconnected)
    }

    fn cancel(&self) {
        let waiters: Vec<_> = lock(&self.inner).utterances.drain().map(|(_, w)| w).collect();
        self.send(ServerMessage::CancelSpeech);
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }
}

/// Recognition stream fed by browser callbacks.
struct BrowserRecognitionStream {
    stream_id: u64,
    events: mpsc::UnboundedReceiver<RecognitionEvent>,
    client: BrowserClient,
    closed: bool,
}

impl BrowserRecognitionStream {
    fn release(&mut self) {
        let mut inner = lock(&self.client.inner);
        if matches!(inner.recognition, Some((id, _)) if id == self.stream_id) {
            inner.recognition = None;
        }
    }
}

#[async_trait]
impl RecognitionStream for BrowserRecognitionStream {
    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        if self.closed {
            return None;
        }
        let event = self.events.recv().await;
        if matches!(event, None | Some(RecognitionEvent::Ended)) {
            self.closed = true;
            self.release();
        }
        event
    }

    fn abort(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.release();
        self.client.send(ServerMessage::StopRecognition {
            stream_id: self.stream_id,
        });
    }
}

impl Drop for BrowserRecognitionStream {
    fn drop(&mut self) {
        self.abort();
    }
}
