//! Narrative Provider Adapters.
//!
//! Implementations of the NarrativeProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models via `generateContent`
//! - `MockNarrativeProvider` - Configurable mock for testing

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockFailure, MockNarrativeProvider, MockReply};
