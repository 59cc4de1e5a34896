//! Mock Reasoning Service for testing.
//!
//! Replies are consumed in order; when the queue is empty a generic
//! reply is returned. Every request is recorded.
//!
//! ```ignore
//! let service = MockReasoningService::new()
//!     .with_message("Hi! Tell me about your business.")
//!     .with_error(ReasoningError::Network("reset".into()));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::voice::{AgentReply, InsightPayload};
use crate::ports::{ReasoningError, ReasoningRequest, ReasoningService};

#[derive(Debug, Clone, Default)]
pub struct MockReasoningService {
    replies: Arc<Mutex<VecDeque<Result<AgentReply, ReasoningError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ReasoningRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockReasoningService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply with default insights.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with_reply(AgentReply {
            message: message.into(),
            insights: InsightPayload::default(),
        })
    }

    pub fn with_reply(self, reply: AgentReply) -> Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    pub fn with_error(self, error: ReasoningError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<ReasoningRequest> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ReasoningService for MockReasoningService {
    async fn reply(&self, request: ReasoningRequest) -> Result<AgentReply, ReasoningError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = lock(&self.replies).pop_front();
        next.unwrap_or_else(|| {
            Ok(AgentReply {
                message: "Mock reply".to_string(),
                insights: InsightPayload::default(),
            })
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let service = MockReasoningService::new()
            .with_message("first")
            .with_error(ReasoningError::AuthenticationFailed);

        let request = ReasoningRequest::new(vec![], "Acme");
        assert_eq!(service.reply(request.clone()).await.unwrap().message, "first");
        assert!(service.reply(request.clone()).await.is_err());
        assert_eq!(service.reply(request).await.unwrap().message, "Mock reply");
        assert_eq!(service.call_count(), 3);
    }
}
