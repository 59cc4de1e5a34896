//! Mock client speech adapters with a shared resource log.
//!
//! The recognizer, audio player and on-device voice all write to one
//! [`ResourceLog`], which records the order of operations and counts
//! overlap between capture and playback.
//!
//! ```ignore
//! let log = ResourceLog::new();
//! let recognizer = MockSpeechRecognizer::new(log.clone());
//! let player = MockAudioPlayer::new(log.clone()).with_duration(Duration::from_secs(1));
//!
//! // ... drive a controller ...
//! recognizer.emit(RecognitionEvent::Final("We run twelve trucks".into()));
//! assert_eq!(log.overlap_violations(), 0);
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::sleep;

use crate::domain::voice::VoiceInfo;
use crate::ports::{
    AudioPlayer, LocalSpeech, LocalUtterance, PlaybackError, RecognitionError, RecognitionEvent,
    RecognitionStream, SpeechRecognizer, SynthesizedAudio,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct LogInner {
    events: Vec<String>,
    active_recognizers: usize,
    max_active_recognizers: usize,
    output_active: bool,
    overlap_violations: usize,
}

/// Ordered record of resource use across the mock adapters.
#[derive(Debug, Clone, Default)]
pub struct ResourceLog {
    inner: Arc<Mutex<LogInner>>,
}

impl ResourceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        lock(&self.inner).events.clone()
    }

    /// Number of events equal to `name`.
    pub fn count(&self, name: &str) -> usize {
        lock(&self.inner).events.iter().filter(|e| *e == name).count()
    }

    pub fn active_recognizers(&self) -> usize {
        lock(&self.inner).active_recognizers
    }

    pub fn max_active_recognizers(&self) -> usize {
        lock(&self.inner).max_active_recognizers
    }

    /// Times capture and output were live together.
    pub fn overlap_violations(&self) -> usize {
        lock(&self.inner).overlap_violations
    }

    fn record(&self, event: &str) {
        lock(&self.inner).events.push(event.to_string());
    }

    fn recognizer_started(&self) {
        let mut inner = lock(&self.inner);
        inner.events.push("recognizer.start".to_string());
        inner.active_recognizers += 1;
        inner.max_active_recognizers = inner.max_active_recognizers.max(inner.active_recognizers);
        if inner.output_active {
            inner.overlap_violations += 1;
        }
    }

    fn recognizer_stopped(&self) {
        let mut inner = lock(&self.inner);
        inner.active_recognizers = inner.active_recognizers.saturating_sub(1);
    }

    fn output_started(&self, event: &str) {
        let mut inner = lock(&self.inner);
        inner.events.push(event.to_string());
        if inner.active_recognizers > 0 {
            inner.overlap_violations += 1;
        }
        inner.output_active = true;
    }

    fn output_stopped(&self) {
        lock(&self.inner).output_active = false;
    }
}

/// Recognizer whose streams are fed by the test through [`emit`].
///
/// [`emit`]: MockSpeechRecognizer::emit
#[derive(Debug, Clone)]
pub struct MockSpeechRecognizer {
    log: ResourceLog,
    supported: bool,
    failing_starts: Arc<Mutex<usize>>,
    current: Arc<Mutex<Option<mpsc::UnboundedSender<RecognitionEvent>>>>,
}

impl MockSpeechRecognizer {
    pub fn new(log: ResourceLog) -> Self {
        Self {
            log,
            supported: true,
            failing_starts: Arc::new(Mutex::new(0)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// A client without speech recognition.
    pub fn unsupported(log: ResourceLog) -> Self {
        Self {
            supported: false,
            ..Self::new(log)
        }
    }

    /// The next `count` starts fail.
    pub fn fail_next_starts(&self, count: usize) {
        *lock(&self.failing_starts) = count;
    }

    /// Sends an event to the live stream. Returns false if none is live.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        lock(&self.current)
            .as_ref()
            .map(|tx| tx.send(event).is_ok())
            .unwrap_or(false)
    }

    pub fn is_listening(&self) -> bool {
        lock(&self.current).as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

#[async_trait]
impl SpeechRecognizer for MockSpeechRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn start(&self) -> Result<Box<dyn RecognitionStream>, RecognitionError> {
        if !self.supported {
            return Err(RecognitionError::Unsupported);
        }
        {
            let mut failing = lock(&self.failing_starts);
            if *failing > 0 {
                *failing -= 1;
                self.log.record("recognizer.start_failed");
                return Err(RecognitionError::StartFailed("device busy".to_string()));
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *lock(&self.current) = Some(tx);
        self.log.recognizer_started();
        Ok(Box::new(MockRecognitionStream {
            log: self.log.clone(),
            events: rx,
            live: true,
        }))
    }
}

struct MockRecognitionStream {
    log: ResourceLog,
    events: mpsc::UnboundedReceiver<RecognitionEvent>,
    live: bool,
}

impl MockRecognitionStream {
    fn release(&mut self) {
        if self.live {
            self.live = false;
            self.events.close();
            self.log.recognizer_stopped();
        }
    }
}

#[async_trait]
impl RecognitionStream for MockRecognitionStream {
    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        if !self.live {
            return None;
        }
        let event = self.events.recv().await;
        if matches!(event, None | Some(RecognitionEvent::Ended)) {
            self.release();
        }
        event
    }

    fn abort(&mut self) {
        if self.live {
            self.log.record("recognizer.abort");
        }
        self.release();
    }
}

impl Drop for MockRecognitionStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Player that "plays" for a fixed duration unless stopped.
#[derive(Debug, Clone)]
pub struct MockAudioPlayer {
    log: ResourceLog,
    duration: Duration,
    fail: bool,
    stopped: Arc<Notify>,
    played: Arc<Mutex<Vec<SynthesizedAudio>>>,
}

impl MockAudioPlayer {
    pub fn new(log: ResourceLog) -> Self {
        Self {
            log,
            duration: Duration::from_millis(500),
            fail: false,
            stopped: Arc::new(Notify::new()),
            played: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Every `play` fails immediately.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn played(&self) -> Vec<SynthesizedAudio> {
        lock(&self.played).clone()
    }
}

#[async_trait]
impl AudioPlayer for MockAudioPlayer {
    async fn play(&self, audio: SynthesizedAudio) -> Result<(), PlaybackError> {
        if self.fail {
            self.log.record("player.failed");
            return Err(PlaybackError::Failed("decode error".to_string()));
        }
        lock(&self.played).push(audio);
        self.log.output_started("player.play");
        tokio::select! {
            _ = sleep(self.duration) => {}
            _ = self.stopped.notified() => {}
        }
        self.log.output_stopped();
        Ok(())
    }

    fn stop(&self) {
        self.log.record("player.stop");
        self.log.output_stopped();
        self.stopped.notify_waiters();
    }
}

/// On-device voice with a configurable voice list.
#[derive(Debug, Clone)]
pub struct MockLocalSpeech {
    log: ResourceLog,
    voices: Vec<VoiceInfo>,
    duration: Duration,
    spoken: Arc<Mutex<Vec<LocalUtterance>>>,
}

impl MockLocalSpeech {
    pub fn new(log: ResourceLog) -> Self {
        Self {
            log,
            voices: Vec::new(),
            duration: Duration::from_millis(500),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_voices(mut self, voices: Vec<VoiceInfo>) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn spoken(&self) -> Vec<LocalUtterance> {
        lock(&self.spoken).clone()
    }
}

#[async_trait]
impl LocalSpeech for MockLocalSpeech {
    async fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: LocalUtterance) -> Result<(), PlaybackError> {
        lock(&self.spoken).push(utterance);
        self.log.output_started("local.speak");
        sleep(self.duration).await;
        self.log.output_stopped();
        Ok(())
    }

    fn cancel(&self) {
        self.log.record("local.cancel");
        self.log.output_stopped();
    }
}
