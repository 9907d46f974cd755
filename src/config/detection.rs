//! Detection threshold configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::detectors::{InsuranceThresholds, PortfolioThresholds, SipThresholds};

/// Detector configuration
///
/// Per-rule thresholds plus the default result-size limit applied to every
/// detector call. Defaults match the values the rules were tuned against.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Contribution plan rule thresholds
    #[serde(default)]
    pub sip: SipThresholds,

    /// Insurance rule thresholds
    #[serde(default)]
    pub insurance: InsuranceThresholds,

    /// Portfolio rule thresholds
    #[serde(default)]
    pub portfolio: PortfolioThresholds,

    /// Default result-size limit per detector call
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_result_limit() -> usize {
    100
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sip: SipThresholds::default(),
            insurance: InsuranceThresholds::default(),
            portfolio: PortfolioThresholds::default(),
            result_limit: default_result_limit(),
        }
    }
}

impl DetectionConfig {
    /// Validate detection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.result_limit == 0 || self.result_limit > 1000 {
            return Err(ValidationError::InvalidResultLimit);
        }
        if !(0.0..=5.0).contains(&self.portfolio.max_rating) {
            return Err(ValidationError::InvalidRatingCutoff);
        }
        if !(0.0..=100.0).contains(&self.portfolio.min_concentration) {
            return Err(ValidationError::InvalidConcentrationThreshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let config = DetectionConfig::default();
        assert_eq!(config.sip.min_months, 12);
        assert_eq!(config.sip.min_failed_amount, 5000.0);
        assert_eq!(config.sip.min_invested_amount, 100000.0);
        assert_eq!(config.sip.min_inactive_days, 60);
        assert_eq!(config.insurance.min_premium_gap, 10000.0);
        assert_eq!(config.insurance.min_opportunity_score, 0);
        assert_eq!(config.insurance.min_mf_value, 1000000.0);
        assert_eq!(config.portfolio.max_rating, 3.0);
        assert_eq!(config.portfolio.min_concentration, 25.0);
        assert_eq!(config.result_limit, 100);
    }

    #[test]
    fn default_config_validates() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_result_limit_is_rejected() {
        let config = DetectionConfig {
            result_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_result_limit_is_rejected() {
        let config = DetectionConfig {
            result_limit: 1001,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_rating_cutoff_is_rejected() {
        let mut config = DetectionConfig::default();
        config.portfolio.max_rating = 7.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_concentration_is_rejected() {
        let mut config = DetectionConfig::default();
        config.portfolio.min_concentration = 150.0;
        assert!(config.validate().is_err());
    }
}
