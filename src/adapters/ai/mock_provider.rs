//! Mock Narrative Provider for testing.
//!
//! Configurable implementation of the NarrativeProvider port, allowing
//! tests to run without calling the real generative API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    FinishReason, GenerationRequest, GenerationResponse, NarrativeError, NarrativeProvider,
    ProviderInfo, TokenUsage,
};

/// Mock narrative provider for testing.
#[derive(Debug, Clone)]
pub struct MockNarrativeProvider {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a successful generation with this content.
    Success(String),
    /// Return an error.
    Error(MockFailure),
}

/// Mock failure modes for testing error handling.
#[derive(Debug, Clone)]
pub enum MockFailure {
    RateLimited { retry_after_secs: u32 },
    ContentBlocked { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockFailure> for NarrativeError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::RateLimited { retry_after_secs } => {
                NarrativeError::rate_limited(retry_after_secs)
            }
            MockFailure::ContentBlocked { reason } => NarrativeError::content_blocked(reason),
            MockFailure::Unavailable { message } => NarrativeError::unavailable(message),
            MockFailure::AuthenticationFailed => NarrativeError::AuthenticationFailed,
            MockFailure::Network { message } => NarrativeError::network(message),
            MockFailure::Timeout { timeout_secs } => NarrativeError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockNarrativeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNarrativeProvider {
    /// Creates a new mock provider with no queued replies.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(content.into()));
        self
    }

    /// Queues an error reply.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(failure));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn recorded_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next reply; an empty queue repeats a generic success.
    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Success("{}".to_string()))
    }
}

#[async_trait]
impl NarrativeProvider for MockNarrativeProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, NarrativeError> {
        self.calls.lock().unwrap().push(request);

        if self.delay > Duration::ZERO {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Success(content) => Ok(GenerationResponse {
                content,
                usage: TokenUsage::new(10, 20),
                model: "mock-model".to_string(),
                finish_reason: FinishReason::Stop,
            }),
            MockReply::Error(failure) => Err(failure.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}
