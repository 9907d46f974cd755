//! Narrative Provider Port - Interface for the generative text service.
//!
//! Abstracts the external model that turns raw opportunity context into
//! advisor-facing language. Implementations translate between this
//! provider-agnostic surface and a concrete API (Gemini in production, a
//! scripted mock in tests).
//!
//! The port is deliberately lean: the synthesizer needs exactly one
//! blocking, bounded-timeout round trip per opportunity, with the response
//! constrained to JSON. Streaming is not part of the contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for generative text completions.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate a single completion.
    ///
    /// Must honor the request's response format and return within the
    /// implementation's configured timeout.
    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationResponse, NarrativeError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Standing instructions that frame the model's behavior.
    pub system_instruction: Option<String>,
    /// The prompt for this call.
    pub prompt: String,
    /// Output constraint for the response body.
    pub response_format: ResponseFormat,
    /// Sampling temperature, provider default when unset.
    pub temperature: Option<f32>,
    /// Cap on generated tokens, provider default when unset.
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Creates a new plain-text generation request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
            response_format: ResponseFormat::Text,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Constrains the response to well-formed JSON.
    pub fn with_json_response(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the output token cap.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Output constraint for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text.
    Text,
    /// The provider must emit a single well-formed JSON document.
    Json,
}

/// Response from a generation call.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Generated content.
    pub content: String,
    /// Token usage for observability.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit the output token cap.
    Length,
    /// Content was blocked by the provider's safety layer.
    Safety,
    /// Any other provider-specific reason.
    Other,
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "mock").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Generative service errors.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was blocked by the provider's safety layer.
    #[error("content blocked: {reason}")]
    ContentBlocked {
        /// Reason for blocking.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl NarrativeError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content blocked error.
    pub fn content_blocked(reason: impl Into<String>) -> Self {
        Self::ContentBlocked {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NarrativeError::RateLimited { .. }
                | NarrativeError::Unavailable { .. }
                | NarrativeError::Network(_)
                | NarrativeError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_builder_works() {
        let request = GenerationRequest::new("Analyze this client")
            .with_system_instruction("You are a strategist")
            .with_json_response()
            .with_temperature(0.4)
            .with_max_output_tokens(512);

        assert_eq!(request.prompt, "Analyze this client");
        assert_eq!(
            request.system_instruction,
            Some("You are a strategist".to_string())
        );
        assert_eq!(request.response_format, ResponseFormat::Json);
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.max_output_tokens, Some(512));
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(120, 40);
        assert_eq!(usage.total_tokens, 160);
    }

    #[test]
    fn retryable_classification() {
        assert!(NarrativeError::rate_limited(30).is_retryable());
        assert!(NarrativeError::unavailable("down").is_retryable());
        assert!(NarrativeError::network("reset").is_retryable());
        assert!(NarrativeError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!NarrativeError::AuthenticationFailed.is_retryable());
        assert!(!NarrativeError::content_blocked("policy").is_retryable());
        assert!(!NarrativeError::parse("bad envelope").is_retryable());
        assert!(!NarrativeError::InvalidRequest("bad".into()).is_retryable());
    }

    #[test]
    fn errors_display_correctly() {
        assert_eq!(
            NarrativeError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(
            NarrativeError::Timeout { timeout_secs: 20 }.to_string(),
            "request timed out after 20s"
        );
    }
}
