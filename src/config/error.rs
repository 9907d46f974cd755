//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Result limit must be between 1 and 1000")]
    InvalidResultLimit,

    #[error("Batch concurrency must be at least 1")]
    InvalidBatchConcurrency,

    #[error("Rating cutoff must be between 0 and 5")]
    InvalidRatingCutoff,

    #[error("Concentration threshold must be between 0 and 100")]
    InvalidConcentrationThreshold,
}
