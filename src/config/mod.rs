//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `ADVISOR_RADAR` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use advisor_radar::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod detection;
mod error;
mod narrative;

pub use detection::DetectionConfig;
pub use error::{ConfigError, ValidationError};
pub use narrative::NarrativeConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Detector thresholds and result limits
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Generative service configuration
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `ADVISOR_RADAR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ADVISOR_RADAR__NARRATIVE__GEMINI_API_KEY=...` -> `narrative.gemini_api_key`
    /// - `ADVISOR_RADAR__DETECTION__RESULT_LIMIT=50` -> `detection.result_limit`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADVISOR_RADAR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.detection.validate()?;
        self.narrative.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ADVISOR_RADAR__NARRATIVE__GEMINI_API_KEY", "test-key");
    }

    fn clear_env() {
        env::remove_var("ADVISOR_RADAR__NARRATIVE__GEMINI_API_KEY");
        env::remove_var("ADVISOR_RADAR__NARRATIVE__MODEL");
        env::remove_var("ADVISOR_RADAR__DETECTION__RESULT_LIMIT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.narrative.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_detection_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.detection.result_limit, 100);
        assert_eq!(config.detection.sip.min_months, 12);
    }

    #[test]
    fn test_custom_model_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ADVISOR_RADAR__NARRATIVE__MODEL", "gemini-1.5-pro");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.narrative.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap_or_else(|_| AppConfig {
            detection: DetectionConfig::default(),
            narrative: NarrativeConfig::default(),
        });
        assert!(config.validate().is_err());
    }
}
