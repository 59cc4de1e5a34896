//! Mock speech synthesizer with call tracking.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};

/// Returns queued results in order, then echoes the text as audio bytes.
#[derive(Debug, Clone, Default)]
pub struct MockSpeechSynthesizer {
    results: Arc<Mutex<VecDeque<Result<SynthesizedAudio, SynthesisError>>>>,
    always_fail: Option<SynthesisError>,
    texts: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `error`.
    pub fn failing(error: SynthesisError) -> Self {
        Self {
            always_fail: Some(error),
            ..Self::default()
        }
    }

    pub fn with_error(self, error: SynthesisError) -> Self {
        lock(&self.results).push_back(Err(error));
        self
    }

    pub fn with_audio(self, bytes: Vec<u8>) -> Self {
        lock(&self.results).push_back(Ok(SynthesizedAudio::mpeg(bytes)));
        self
    }

    /// Texts requested so far.
    pub fn texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        lock(&self.texts).push(text.to_string());
        if let Some(err) = &self.always_fail {
            return Err(err.clone());
        }
        let next = lock(&self.results).pop_front();
        next.unwrap_or_else(|| Ok(SynthesizedAudio::mpeg(text.as_bytes().to_vec())))
    }
}
