//! Narrative synthesizer configuration
//!
//! Credentials and tuning for the generative service live in an explicit
//! configuration object owned by the caller; there is no process-wide
//! provider state.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generative service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfig {
    /// Gemini API key
    pub gemini_api_key: Option<Secret<String>>,

    /// Model handle
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries before falling back
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Worker pool size for batch synthesis
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl NarrativeConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate narrative configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.batch_concurrency == 0 {
            return Err(ValidationError::InvalidBatchConcurrency);
        }
        Ok(())
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}

fn default_batch_concurrency() -> usize {
    4
}
