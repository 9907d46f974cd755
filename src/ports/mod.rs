//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `RecordRepository` - read-only access to the four record collections
//! - `NarrativeProvider` - the external generative text service

mod narrative_provider;
mod record_repository;

pub use narrative_provider::{
    FinishReason, GenerationRequest, GenerationResponse, NarrativeError, NarrativeProvider,
    ProviderInfo, ResponseFormat, TokenUsage,
};
pub use record_repository::{RecordRepository, RepositoryError};
