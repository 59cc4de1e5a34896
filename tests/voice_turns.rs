//! Integration tests for the voice turn controller.
//!
//! The controller runs against the mock client adapters on a paused tokio
//! clock, so every delay (playback, settle, silence) elapses instantly and
//! deterministically.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout, Instant};

use discovery_desk::adapters::ai::MockReasoningService;
use discovery_desk::adapters::speech::{
    MockAudioPlayer, MockLocalSpeech, MockSpeechRecognizer, ResourceLog,
};
use discovery_desk::adapters::storage::InMemoryLocalStore;
use discovery_desk::adapters::tts::MockSpeechSynthesizer;
use discovery_desk::application::voice::{
    VoicePorts, VoiceSessionContext, VoiceSessionHandle, VoiceSnapshot, VoiceTimings,
    VoiceTurnController,
};
use discovery_desk::domain::foundation::SessionId;
use discovery_desk::domain::voice::{
    storage_key, AgentReply, ChatMessage, ConversationStage, InsightPayload, Speaker, VoiceError,
    VoiceInfo, VoiceState, VoiceTranscript,
};
use discovery_desk::ports::{LocalStore, ReasoningError, RecognitionEvent, SynthesisError};

// =============================================================================
// Test Infrastructure
// =============================================================================

const OPENING: &str = "Hi! What does Acme Plumbing do day to day?";

struct Harness {
    session_id: SessionId,
    log: ResourceLog,
    reasoning: MockReasoningService,
    synthesizer: MockSpeechSynthesizer,
    recognizer: MockSpeechRecognizer,
    player: MockAudioPlayer,
    local: MockLocalSpeech,
    store: InMemoryLocalStore,
}

impl Harness {
    fn new(reasoning: MockReasoningService) -> Self {
        let log = ResourceLog::new();
        Self {
            session_id: SessionId::new(),
            reasoning,
            synthesizer: MockSpeechSynthesizer::new(),
            recognizer: MockSpeechRecognizer::new(log.clone()),
            player: MockAudioPlayer::new(log.clone()),
            local: MockLocalSpeech::new(log.clone()),
            store: InMemoryLocalStore::new(),
            log,
        }
    }

    fn spawn(&self) -> VoiceSessionHandle {
        self.spawn_with_notes(None)
    }

    fn spawn_with_notes(&self, notes: Option<&str>) -> VoiceSessionHandle {
        let context = VoiceSessionContext {
            session_id: self.session_id,
            business_name: "Acme Plumbing Co".to_string(),
            notes: notes.map(str::to_string),
        };
        let ports = VoicePorts {
            reasoning: Arc::new(self.reasoning.clone()),
            synthesizer: Arc::new(self.synthesizer.clone()),
            recognizer: Arc::new(self.recognizer.clone()),
            player: Arc::new(self.player.clone()),
            local_speech: Arc::new(self.local.clone()),
            store: Arc::new(self.store.clone()),
        };
        VoiceTurnController::spawn(context, ports, VoiceTimings::default())
    }

    async fn stored_transcript(&self) -> Option<VoiceTranscript> {
        self.store
            .get(&storage_key(&self.session_id))
            .await
            .unwrap()
            .map(|json| serde_json::from_str(&json).unwrap())
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<VoiceSnapshot>,
    predicate: impl Fn(&VoiceSnapshot) -> bool,
) -> VoiceSnapshot {
    timeout(Duration::from_secs(120), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if predicate(&snapshot) {
                    return snapshot.clone();
                }
            }
            rx.changed().await.expect("controller stopped");
        }
    })
    .await
    .expect("timed out waiting for voice snapshot")
}

fn listening(snapshot: &VoiceSnapshot) -> bool {
    snapshot.state == VoiceState::Listening
}

/// Starts the call and waits until the opening turn has been spoken.
async fn start_and_listen(handle: &VoiceSessionHandle) -> watch::Receiver<VoiceSnapshot> {
    let mut rx = handle.subscribe();
    handle.start().await.unwrap();
    wait_for(&mut rx, listening).await;
    rx
}

// =============================================================================
// Turn cycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn opening_turn_is_spoken_then_listening_begins() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    let rx = start_and_listen(&handle).await;

    let snapshot = rx.borrow().clone();
    assert!(snapshot.started);
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.transcript[0].speaker, Speaker::Agent);
    assert_eq!(snapshot.transcript[0].text, OPENING);

    // The opening request carries no history.
    let calls = harness.reasoning.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].messages.is_empty());
    assert_eq!(calls[0].business_name, "Acme Plumbing Co");

    assert_eq!(harness.synthesizer.texts(), vec![OPENING.to_string()]);
    assert_eq!(harness.player.played().len(), 1);
    assert!(harness.recognizer.is_listening());
}

#[tokio::test(start_paused = true)]
async fn full_turn_never_overlaps_capture_and_playback() {
    let harness = Harness::new(
        MockReasoningService::new()
            .with_message(OPENING)
            .with_message("Got it. How many hours a week go to scheduling?"),
    );
    let handle = harness.spawn();
    let mut rx = start_and_listen(&handle).await;

    assert!(harness.recognizer.emit(RecognitionEvent::Final("We fix pipes".into())));
    let snapshot = wait_for(&mut rx, |s| s.transcript.len() == 3 && listening(s)).await;

    assert_eq!(snapshot.transcript[1].speaker, Speaker::Client);
    assert_eq!(snapshot.transcript[1].text, "We fix pipes");
    assert_eq!(
        harness.log.events(),
        vec![
            "player.play",
            "recognizer.start",
            "recognizer.abort",
            "player.play",
            "recognizer.start",
        ]
    );
    assert_eq!(harness.log.max_active_recognizers(), 1);
    assert_eq!(harness.log.overlap_violations(), 0);

    let calls = harness.reasoning.get_calls();
    assert_eq!(
        calls[1].messages,
        vec![ChatMessage::assistant(OPENING), ChatMessage::user("We fix pipes")]
    );
}

#[tokio::test(start_paused = true)]
async fn notes_are_forwarded_with_every_turn() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn_with_notes(Some("Referred by the Hendersons"));
    start_and_listen(&handle).await;

    let calls = harness.reasoning.get_calls();
    assert_eq!(calls[0].notes.as_deref(), Some("Referred by the Hendersons"));
}

#[tokio::test(start_paused = true)]
async fn final_fragments_are_joined_until_silence() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Final("We run".into()));
    sleep(Duration::from_millis(1000)).await;
    harness.recognizer.emit(RecognitionEvent::Final("twelve trucks".into()));
    sleep(Duration::from_millis(1000)).await;

    // Each final fragment pushes the silence deadline out again.
    assert_eq!(harness.reasoning.call_count(), 1);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(harness.reasoning.call_count(), 2);
    let calls = harness.reasoning.get_calls();
    assert_eq!(calls[1].messages.last(), Some(&ChatMessage::user("We run twelve trucks")));
}

#[tokio::test(start_paused = true)]
async fn interim_text_is_shown_then_cleared_by_final() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    let mut rx = start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Interim("We run tw".into()));
    wait_for(&mut rx, |s| s.interim_text == "We run tw").await;

    harness.recognizer.emit(RecognitionEvent::Final("We run twelve trucks".into()));
    let snapshot = wait_for(&mut rx, |s| s.interim_text.is_empty()).await;
    assert_eq!(snapshot.state, VoiceState::Listening);
}

#[tokio::test(start_paused = true)]
async fn agreement_finishes_the_call_without_listening_again() {
    let closing = AgentReply {
        message: "Wonderful, welcome aboard!".to_string(),
        insights: InsightPayload {
            stage: ConversationStage::Complete,
            ready_for_agreement: true,
            agreed_to_terms: true,
            ..InsightPayload::default()
        },
    };
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING).with_reply(closing));
    let handle = harness.spawn();
    let mut rx = start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Final("Yes, let's do it".into()));
    let snapshot = wait_for(&mut rx, |s| s.finished).await;
    assert_eq!(snapshot.state, VoiceState::Idle);
    assert!(snapshot.insights.agreed_to_terms);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(harness.log.count("recognizer.start"), 1);
    assert!(!harness.recognizer.is_listening());

    let stored = harness.stored_transcript().await.unwrap();
    assert_eq!(
        stored.messages,
        vec![
            ChatMessage::assistant(OPENING),
            ChatMessage::user("Yes, let's do it"),
            ChatMessage::assistant("Wonderful, welcome aboard!"),
        ]
    );
    assert!(stored.insights.agreed_to_terms);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn reasoning_failure_listens_again() {
    let harness = Harness::new(
        MockReasoningService::new()
            .with_message(OPENING)
            .with_error(ReasoningError::Network("connection reset".into())),
    );
    let handle = harness.spawn();
    let mut rx = start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Final("We fix pipes".into()));
    let snapshot = wait_for(&mut rx, |s| s.transcript.len() == 2 && listening(s)).await;

    assert_eq!(snapshot.transcript[1].speaker, Speaker::Client);
    assert_eq!(harness.log.count("recognizer.start"), 2);
    assert_eq!(harness.log.count("player.play"), 1);
    assert!(harness.recognizer.is_listening());
}

#[tokio::test(start_paused = true)]
async fn blank_reply_is_not_spoken() {
    let harness = Harness::new(MockReasoningService::new().with_message("   "));
    let handle = harness.spawn();
    let rx = start_and_listen(&handle).await;

    assert!(rx.borrow().transcript.is_empty());
    assert!(harness.synthesizer.texts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn synthesis_failure_falls_back_to_device_voice() {
    let mut harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    harness.synthesizer = MockSpeechSynthesizer::failing(SynthesisError::NotConfigured);
    harness.local = MockLocalSpeech::new(harness.log.clone()).with_voices(vec![
        VoiceInfo::new("Google US English", "en-US", false),
        VoiceInfo::new("Samantha", "en-US", true),
    ]);
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    let spoken = harness.local.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].text, OPENING);
    assert_eq!(spoken[0].voice.as_deref(), Some("Samantha"));
    assert!((spoken[0].rate - 0.88).abs() < f32::EPSILON);
    assert!(harness.player.played().is_empty());

    let events = harness.log.events();
    assert_eq!(&events[..2], ["local.cancel", "local.speak"]);
    assert_eq!(harness.log.overlap_violations(), 0);
}

#[tokio::test(start_paused = true)]
async fn playback_failure_falls_back_to_device_voice() {
    let mut harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    harness.player = MockAudioPlayer::new(harness.log.clone()).failing();
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    assert_eq!(harness.log.count("player.failed"), 1);
    let spoken = harness.local.spoken();
    assert_eq!(spoken.len(), 1);
    // No English voices reported, so the device default is used.
    assert_eq!(spoken[0].voice, None);
}

// =============================================================================
// Recognizer lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn recognizer_end_restarts_capture() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Ended);
    sleep(Duration::from_millis(350)).await;

    assert_eq!(harness.log.count("recognizer.start"), 2);
    assert!(harness.recognizer.is_listening());
    assert_eq!(harness.log.max_active_recognizers(), 1);
}

#[tokio::test(start_paused = true)]
async fn recognizer_error_restarts_after_longer_delay() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Error("no-speech".into()));
    sleep(Duration::from_millis(400)).await;
    assert_eq!(harness.log.count("recognizer.start"), 1);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(harness.log.count("recognizer.start"), 2);
    assert!(harness.recognizer.is_listening());
}

#[tokio::test(start_paused = true)]
async fn self_inflicted_abort_is_ignored() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    let rx = start_and_listen(&handle).await;

    harness.recognizer.emit(RecognitionEvent::Error("aborted".into()));
    sleep(Duration::from_secs(2)).await;

    assert_eq!(harness.log.count("recognizer.start"), 1);
    assert!(harness.recognizer.is_listening());
    assert_eq!(rx.borrow().state, VoiceState::Listening);
}

#[tokio::test(start_paused = true)]
async fn failed_start_is_retried() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    harness.recognizer.fail_next_starts(1);
    let handle = harness.spawn();
    start_and_listen(&handle).await;
    assert!(!harness.recognizer.is_listening());

    sleep(Duration::from_millis(600)).await;
    assert_eq!(harness.log.count("recognizer.start_failed"), 1);
    assert_eq!(harness.log.count("recognizer.start"), 1);
    assert!(harness.recognizer.is_listening());
}

// =============================================================================
// Controls
// =============================================================================

#[tokio::test(start_paused = true)]
async fn unsupported_client_cannot_start() {
    let mut harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    harness.recognizer = MockSpeechRecognizer::unsupported(harness.log.clone());
    let handle = harness.spawn();

    let result = handle.start().await;
    assert!(matches!(result, Err(VoiceError::UnsupportedBrowser)));
    assert_eq!(harness.reasoning.call_count(), 0);
    assert!(!handle.snapshot().started);
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    assert!(matches!(handle.start().await, Err(VoiceError::AlreadyStarted)));
    assert_eq!(harness.reasoning.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn muted_agent_skips_synthesis_and_playback() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();

    assert!(handle.toggle_mute().await.unwrap());
    let rx = start_and_listen(&handle).await;

    assert!(rx.borrow().muted);
    assert_eq!(rx.borrow().transcript.len(), 1);
    assert!(harness.synthesizer.texts().is_empty());
    assert!(harness.player.played().is_empty());
    assert!(harness.local.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn muting_mid_speech_stops_output_and_listens() {
    let mut harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    harness.player = MockAudioPlayer::new(harness.log.clone()).with_duration(Duration::from_secs(10));
    let handle = harness.spawn();
    let mut rx = handle.subscribe();

    handle.start().await.unwrap();
    wait_for(&mut rx, |s| s.state == VoiceState::Speaking).await;
    let muted_at = Instant::now();

    assert!(handle.toggle_mute().await.unwrap());
    wait_for(&mut rx, listening).await;

    assert!(muted_at.elapsed() < Duration::from_secs(1));
    assert_eq!(harness.log.count("player.stop"), 1);
    assert_eq!(harness.log.overlap_violations(), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_clears_call_and_stored_transcript() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    let mut rx = start_and_listen(&handle).await;
    assert!(harness.store.contains(&storage_key(&harness.session_id)).await);

    handle.reset().await.unwrap();
    let snapshot = wait_for(&mut rx, |s| s.state == VoiceState::Idle).await;

    assert!(snapshot.transcript.is_empty());
    assert!(!snapshot.started);
    assert!(!snapshot.finished);
    assert!(!harness.recognizer.is_listening());
    assert!(!harness.store.contains(&storage_key(&harness.session_id)).await);

    // A fresh call starts from an empty history.
    handle.start().await.unwrap();
    wait_for(&mut rx, listening).await;
    let calls = harness.reasoning.get_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].messages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_reply() {
    let harness = Harness::new(
        MockReasoningService::new()
            .with_message(OPENING)
            .with_delay(Duration::from_secs(5)),
    );
    let handle = harness.spawn();
    let mut rx = handle.subscribe();

    handle.start().await.unwrap();
    handle.reset().await.unwrap();
    sleep(Duration::from_secs(10)).await;

    let snapshot = wait_for(&mut rx, |s| s.state == VoiceState::Idle).await;
    assert!(snapshot.transcript.is_empty());
    assert!(harness.synthesizer.texts().is_empty());
    assert!(harness.stored_transcript().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_the_microphone() {
    let harness = Harness::new(MockReasoningService::new().with_message(OPENING));
    let handle = harness.spawn();
    start_and_listen(&handle).await;

    handle.shutdown().await;
    assert!(!harness.recognizer.is_listening());
    assert_eq!(harness.log.active_recognizers(), 0);
}
