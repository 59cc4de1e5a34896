//! VoiceTurnController - Turn-taking actor for one voice session.
//!
//! A single tokio task owns every piece of mutable state: the turn state,
//! the transcript, the pending utterance, the live recognition stream and
//! the in-flight reasoning and speech tasks. Everything that can wake the
//! controller (control commands, recognizer events, timers, task
//! completions) is multiplexed with `tokio::select!`, so no two handlers
//! ever run at once.
//!
//! ```text
//!  idle ──Start──▶ processing ──reply──▶ speaking ──done──▶ listening
//!                     ▲   │                  │                 │
//!                     │   └─failure (400ms)──┼────────────────▶│
//!                     │                      └─agreed──▶ idle  │
//!                     └────────silence (1500ms)────────────────┘
//! ```

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::domain::foundation::{SessionId, StateMachine, Timestamp};
use crate::domain::voice::{
    select_voice, storage_key, AgentReply, InsightPayload, PendingUtterance, TranscriptEntry,
    VoiceError, VoiceState, VoiceTranscript, DEFAULT_VOICE_PRIORITY,
};
use crate::ports::{
    AudioPlayer, LocalSpeech, LocalStore, LocalUtterance, ReasoningError, ReasoningRequest,
    ReasoningService, RecognitionEvent, RecognitionStream, SpeechRecognizer, SpeechSynthesizer,
};

/// Delays and delivery settings for a voice session.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTimings {
    /// Quiet time after the last final fragment before the turn is sent.
    pub silence: Duration,
    /// Pause before listening again after a turn.
    pub settle: Duration,
    /// Stand-in for speech while muted.
    pub mute_delay: Duration,
    pub restart_after_end: Duration,
    pub restart_after_error: Duration,
    pub fallback_rate: f32,
    pub voice_priority: Vec<String>,
}

impl Default for VoiceTimings {
    fn default() -> Self {
        Self {
            silence: Duration::from_millis(1500),
            settle: Duration::from_millis(400),
            mute_delay: Duration::from_millis(300),
            restart_after_end: Duration::from_millis(300),
            restart_after_error: Duration::from_millis(500),
            fallback_rate: 0.88,
            voice_priority: DEFAULT_VOICE_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Who the call is with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSessionContext {
    pub session_id: SessionId,
    pub business_name: String,
    pub notes: Option<String>,
}

/// Everything the controller talks to.
#[derive(Clone)]
pub struct VoicePorts {
    pub reasoning: Arc<dyn ReasoningService>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub player: Arc<dyn AudioPlayer>,
    pub local_speech: Arc<dyn LocalSpeech>,
    pub store: Arc<dyn LocalStore>,
}

/// What the client sees, published after every handled event.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSnapshot {
    pub state: VoiceState,
    pub interim_text: String,
    pub transcript: Vec<TranscriptEntry>,
    pub insights: InsightPayload,
    pub muted: bool,
    pub started: bool,
    pub finished: bool,
}

impl VoiceSnapshot {
    pub fn status_label(&self) -> &'static str {
        self.state.label()
    }
}

enum Control {
    Start(oneshot::Sender<Result<(), VoiceError>>),
    ToggleMute(oneshot::Sender<bool>),
    Reset(oneshot::Sender<()>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenTimer {
    /// After a turn. Always starts listening.
    Relisten,
    /// After the recognizer ended or failed. Only while still listening.
    Restart,
}

/// Client-side handle to a running controller.
///
/// Dropping every handle shuts the controller down.
pub struct VoiceSessionHandle {
    session_id: SessionId,
    commands: mpsc::Sender<Control>,
    snapshots: watch::Receiver<VoiceSnapshot>,
    task: JoinHandle<()>,
}

impl VoiceSessionHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Begins the call with the agent's opening turn.
    ///
    /// # Errors
    ///
    /// - `UnsupportedBrowser` if the client cannot recognize speech
    /// - `AlreadyStarted` if the call is already under way
    pub async fn start(&self) -> Result<(), VoiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(Control::Start(tx)).await?;
        rx.await.map_err(|_| VoiceError::ControllerStopped)?
    }

    /// Flips agent mute. Returns the new mute state.
    pub async fn toggle_mute(&self) -> Result<bool, VoiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(Control::ToggleMute(tx)).await?;
        rx.await.map_err(|_| VoiceError::ControllerStopped)
    }

    /// Clears the call and returns to idle.
    pub async fn reset(&self) -> Result<(), VoiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(Control::Reset(tx)).await?;
        rx.await.map_err(|_| VoiceError::ControllerStopped)
    }

    /// Stops capture and output and waits for the controller to exit.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Control::Shutdown).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "Voice controller task failed");
        }
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VoiceSnapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, command: Control) -> Result<(), VoiceError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| VoiceError::ControllerStopped)
    }
}

/// The actor. Construct with [`VoiceTurnController::spawn`].
pub struct VoiceTurnController {
    context: VoiceSessionContext,
    ports: VoicePorts,
    timings: VoiceTimings,
    state: VoiceState,
    voice: VoiceTranscript,
    pending: PendingUtterance,
    interim: String,
    muted: bool,
    started: bool,
    finished: bool,
    recognition: Option<Box<dyn RecognitionStream>>,
    silence_deadline: Option<Instant>,
    listen_timer: Option<(Instant, ListenTimer)>,
    reasoning: Option<JoinHandle<Result<AgentReply, ReasoningError>>>,
    speech: Option<JoinHandle<()>>,
    snapshots: watch::Sender<VoiceSnapshot>,
}

impl VoiceTurnController {
    pub fn spawn(
        context: VoiceSessionContext,
        ports: VoicePorts,
        timings: VoiceTimings,
    ) -> VoiceSessionHandle {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (snapshots_tx, snapshots_rx) = watch::channel(VoiceSnapshot::default());
        let session_id = context.session_id;

        let controller = Self {
            context,
            ports,
            timings,
            state: VoiceState::Idle,
            voice: VoiceTranscript::default(),
            pending: PendingUtterance::new(),
            interim: String::new(),
            muted: false,
            started: false,
            finished: false,
            recognition: None,
            silence_deadline: None,
            listen_timer: None,
            reasoning: None,
            speech: None,
            snapshots: snapshots_tx,
        };
        let task = tokio::spawn(controller.run(commands_rx));

        VoiceSessionHandle {
            session_id,
            commands: commands_tx,
            snapshots: snapshots_rx,
            task,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Control>) {
        info!(session_id = %self.context.session_id, "Voice controller running");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(Control::Shutdown) => break,
                    Some(command) => self.handle_control(command).await,
                },
                event = next_recognition(&mut self.recognition) => self.on_recognition(event),
                _ = wait_until(self.silence_deadline) => self.on_silence().await,
                _ = wait_until(self.listen_timer.map(|(at, _)| at)) => self.on_listen_timer().await,
                reply = join(&mut self.reasoning) => self.on_reply(reply).await,
                _ = join(&mut self.speech) => self.on_speech_done(),
            }
            self.publish();
        }

        self.teardown();
        self.publish();
        info!(session_id = %self.context.session_id, "Voice controller stopped");
    }

    async fn handle_control(&mut self, command: Control) {
        match command {
            Control::Start(reply) => {
                let result = self.start().await;
                let _ = reply.send(result);
            }
            Control::ToggleMute(reply) => {
                let muted = self.toggle_mute();
                let _ = reply.send(muted);
            }
            Control::Reset(reply) => {
                self.reset().await;
                let _ = reply.send(());
            }
            Control::Shutdown => {}
        }
    }

    async fn start(&mut self) -> Result<(), VoiceError> {
        if !self.ports.recognizer.is_supported() {
            return Err(VoiceError::UnsupportedBrowser);
        }
        if self.started {
            return Err(VoiceError::AlreadyStarted);
        }

        info!(
            session_id = %self.context.session_id,
            business = %self.context.business_name,
            "Voice session started"
        );
        self.started = true;
        self.set_state(VoiceState::Processing);
        self.begin_turn(None).await;
        Ok(())
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        debug!(muted = self.muted, "Toggled agent mute");

        if self.muted && self.speech.is_some() {
            self.stop_output();
            self.finish_turn();
        }
        self.muted
    }

    async fn reset(&mut self) {
        self.stop_recognition();
        self.stop_output();
        if self.reasoning.take().is_some() {
            debug!("Detached in-flight reasoning turn");
        }

        self.pending.clear();
        self.interim.clear();
        self.silence_deadline = None;
        self.listen_timer = None;
        self.voice = VoiceTranscript::default();
        self.started = false;
        self.finished = false;
        self.set_state(VoiceState::Idle);

        let store = self.ports.store.clone();
        if let Err(e) = store.remove(&storage_key(&self.context.session_id)).await {
            warn!(error = %e, "Failed to remove stored voice transcript");
        }
        info!(session_id = %self.context.session_id, "Voice session reset");
    }

    fn on_recognition(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Interim(text) => {
                if !text.is_empty() {
                    self.interim = text;
                }
            }
            RecognitionEvent::Final(text) => {
                self.pending.push_final(&text);
                self.interim.clear();
                self.silence_deadline = Some(Instant::now() + self.timings.silence);
            }
            event if event.is_self_abort() => {}
            RecognitionEvent::Error(kind) => {
                warn!(error = %kind, "Speech recognition error");
                self.stop_recognition();
                if self.state == VoiceState::Listening {
                    self.schedule_listen(self.timings.restart_after_error, ListenTimer::Restart);
                }
            }
            RecognitionEvent::Ended => {
                self.recognition = None;
                if self.state == VoiceState::Listening {
                    self.schedule_listen(self.timings.restart_after_end, ListenTimer::Restart);
                }
            }
        }
    }

    async fn on_silence(&mut self) {
        self.silence_deadline = None;
        let Some(text) = self.pending.take() else {
            return;
        };

        // Leave listening before the abort so nothing schedules a restart.
        self.set_state(VoiceState::Processing);
        self.listen_timer = None;
        self.stop_recognition();
        self.interim.clear();
        self.begin_turn(Some(text)).await;
    }

    async fn on_listen_timer(&mut self) {
        let Some((_, timer)) = self.listen_timer.take() else {
            return;
        };
        match timer {
            ListenTimer::Relisten => self.start_listening().await,
            ListenTimer::Restart if self.state == VoiceState::Listening => {
                self.start_listening().await
            }
            ListenTimer::Restart => {}
        }
    }

    async fn start_listening(&mut self) {
        self.stop_recognition();
        self.set_state(VoiceState::Listening);

        let recognizer = self.ports.recognizer.clone();
        match recognizer.start().await {
            Ok(stream) => {
                debug!("Recognizer started");
                self.recognition = Some(stream);
            }
            Err(e) => {
                warn!(error = %e, "Recognizer failed to start");
                self.schedule_listen(self.timings.restart_after_error, ListenTimer::Restart);
            }
        }
    }

    /// Records the client's words (if any) and sends the turn.
    async fn begin_turn(&mut self, user_text: Option<String>) {
        if let Some(text) = &user_text {
            self.voice.record_client(text, Timestamp::now());
            self.persist().await;
        }

        let mut request = ReasoningRequest::new(
            self.voice.messages.clone(),
            self.context.business_name.clone(),
        );
        if let Some(notes) = &self.context.notes {
            request = request.with_notes(notes.clone());
        }

        let reasoning = self.ports.reasoning.clone();
        self.reasoning = Some(tokio::spawn(async move { reasoning.reply(request).await }));
    }

    async fn on_reply(&mut self, result: Result<Result<AgentReply, ReasoningError>, JoinError>) {
        self.reasoning = None;

        match result {
            Ok(Ok(reply)) if reply.has_message() => {
                debug!(stage = ?reply.insights.stage, "Agent replied");
                self.voice
                    .record_agent(&reply.message, reply.insights, Timestamp::now());
                self.persist().await;
                self.speak(reply.message);
            }
            Ok(Ok(_)) => {
                warn!("Agent reply had no message");
                self.schedule_listen(self.timings.settle, ListenTimer::Relisten);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Agent turn failed");
                self.schedule_listen(self.timings.settle, ListenTimer::Relisten);
            }
            Err(e) => {
                warn!(error = %e, "Agent turn task failed");
                self.schedule_listen(self.timings.settle, ListenTimer::Relisten);
            }
        }
    }

    fn speak(&mut self, text: String) {
        self.stop_recognition();
        self.set_state(VoiceState::Speaking);

        let ports = self.ports.clone();
        let timings = self.timings.clone();
        let muted = self.muted;
        self.speech = Some(tokio::spawn(deliver_speech(ports, timings, text, muted)));
    }

    fn on_speech_done(&mut self) {
        self.speech = None;
        self.finish_turn();
    }

    fn finish_turn(&mut self) {
        if self.voice.insights.agreed_to_terms {
            self.finished = true;
            self.set_state(VoiceState::Idle);
            info!(session_id = %self.context.session_id, "Client agreed; voice session finished");
        } else {
            self.schedule_listen(self.timings.settle, ListenTimer::Relisten);
        }
    }

    fn schedule_listen(&mut self, delay: Duration, timer: ListenTimer) {
        self.listen_timer = Some((Instant::now() + delay, timer));
    }

    fn set_state(&mut self, next: VoiceState) {
        match self.state.transition_to(next) {
            Ok(state) => {
                debug!(from = %self.state, to = %state, "Voice state changed");
                self.state = state;
            }
            Err(e) => warn!(error = %e, "Ignoring invalid voice transition"),
        }
    }

    fn stop_recognition(&mut self) {
        if let Some(mut stream) = self.recognition.take() {
            stream.abort();
        }
    }

    fn stop_output(&mut self) {
        if let Some(task) = self.speech.take() {
            self.ports.player.stop();
            self.ports.local_speech.cancel();
            task.abort();
        }
    }

    fn teardown(&mut self) {
        self.stop_recognition();
        self.stop_output();
        self.reasoning = None;
        self.silence_deadline = None;
        self.listen_timer = None;
    }

    async fn persist(&mut self) {
        if self.voice.is_empty() {
            return;
        }
        let json = match serde_json::to_string(&self.voice) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize voice transcript");
                return;
            }
        };
        let store = self.ports.store.clone();
        if let Err(e) = store.set(&storage_key(&self.context.session_id), json).await {
            warn!(error = %e, "Failed to store voice transcript");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(VoiceSnapshot {
            state: self.state,
            interim_text: self.interim.clone(),
            transcript: self.voice.transcript.clone(),
            insights: self.voice.insights.clone(),
            muted: self.muted,
            started: self.started,
            finished: self.finished,
        });
    }
}

/// Remote synthesis and playback, falling back to the on-device voice.
async fn deliver_speech(ports: VoicePorts, timings: VoiceTimings, text: String, muted: bool) {
    if muted {
        sleep(timings.mute_delay).await;
        return;
    }

    match ports.synthesizer.synthesize(&text).await {
        Ok(audio) => match ports.player.play(audio).await {
            Ok(()) => return,
            Err(e) => warn!(error = %e, "Playback failed, using on-device voice"),
        },
        Err(e) => warn!(error = %e, "Speech synthesis failed, using on-device voice"),
    }

    ports.local_speech.cancel();
    let voices = ports.local_speech.voices().await;
    let voice = select_voice(&voices, timings.voice_priority.as_slice()).map(|v| v.name.clone());
    debug!(voice = voice.as_deref().unwrap_or("device default"), "Speaking on device");

    let utterance = LocalUtterance {
        text,
        voice,
        rate: timings.fallback_rate,
        pitch: 1.0,
    };
    if let Err(e) = ports.local_speech.speak(utterance).await {
        warn!(error = %e, "On-device speech failed");
    }
}

async fn next_recognition(stream: &mut Option<Box<dyn RecognitionStream>>) -> RecognitionEvent {
    match stream.as_mut() {
        Some(stream) => stream.next_event().await.unwrap_or(RecognitionEvent::Ended),
        None => pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

async fn join<T>(task: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match task.as_mut() {
        Some(handle) => handle.await,
        None => pending().await,
    }
}
