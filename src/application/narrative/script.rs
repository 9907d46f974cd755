//! Advisor script schema.
//!
//! The synthesizer's output contract: a fixed JSON shape, a closed category
//! set, urgency bands, and the deterministic manual-review fallback.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Headline used on the fallback path.
pub const FALLBACK_HEADLINE: &str = "Manual Review Required";
/// Talking point used on the fallback path.
pub const FALLBACK_TALKING_POINT: &str =
    "Data analysis incomplete. Please review client file manually.";
/// Action label used on the fallback path.
pub const FALLBACK_ACTION: &str = "Open Profile";

/// Closed set of script categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptCategory {
    #[serde(rename = "SIP_RECOVERY")]
    SipRecovery,
    #[serde(rename = "PORTFOLIO_OPTIMIZATION")]
    PortfolioOptimization,
    #[serde(rename = "PROTECTION_ENHANCEMENT")]
    ProtectionEnhancement,
}

/// Informational urgency buckets over the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyBand {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyBand {
    /// Buckets a score: >=90 critical, 75-89 high, 50-74 medium, else low.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 90 => UrgencyBand::Critical,
            75..=89 => UrgencyBand::High,
            50..=74 => UrgencyBand::Medium,
            _ => UrgencyBand::Low,
        }
    }
}

fn urgency_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    // The model is asked for an integer but occasionally quotes it.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom("urgency_score is not an integer"))?,
    };
    if !(0..=100).contains(&value) {
        return Err(serde::de::Error::custom("urgency_score out of range"));
    }
    Ok(value as u8)
}

/// A client-safe advisor script.
///
/// `client_id` and `opportunity_type` are required on the success path and
/// absent on the fallback path, which serializes to the fixed failure shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorScript {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(deserialize_with = "urgency_score")]
    pub urgency_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_type: Option<ScriptCategory>,
    pub headline: String,
    pub talking_point: String,
    pub suggested_action: String,
}

impl AdvisorScript {
    /// The deterministic safe object returned when synthesis fails.
    pub fn manual_review_fallback() -> Self {
        Self {
            client_id: String::new(),
            urgency_score: 0,
            opportunity_type: None,
            headline: FALLBACK_HEADLINE.to_string(),
            talking_point: FALLBACK_TALKING_POINT.to_string(),
            suggested_action: FALLBACK_ACTION.to_string(),
        }
    }

    /// Urgency bucket for this script.
    pub fn urgency_band(&self) -> UrgencyBand {
        UrgencyBand::from_score(self.urgency_score)
    }
}

/// Why a model response was rejected.
#[derive(Debug, Error)]
pub enum ScriptParseError {
    #[error("response is not valid JSON: {0}")]
    Json(String),

    #[error("schema violation: {0}")]
    Schema(&'static str),
}

/// Strips a surrounding markdown code fence, if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses and validates a model response into an advisor script.
///
/// The only repair attempted is stripping a markdown code fence; anything
/// else that fails the schema is rejected so the caller can fall back.
pub fn parse_script(content: &str) -> Result<AdvisorScript, ScriptParseError> {
    let body = strip_code_fence(content);
    let script: AdvisorScript =
        serde_json::from_str(body).map_err(|e| ScriptParseError::Json(e.to_string()))?;

    if script.client_id.trim().is_empty() {
        return Err(ScriptParseError::Schema("client_id missing or empty"));
    }
    if script.opportunity_type.is_none() {
        return Err(ScriptParseError::Schema("opportunity_type missing"));
    }
    if script.headline.trim().is_empty() {
        return Err(ScriptParseError::Schema("headline missing or empty"));
    }
    if script.talking_point.trim().is_empty() {
        return Err(ScriptParseError::Schema("talking_point missing or empty"));
    }
    if script.suggested_action.trim().is_empty() {
        return Err(ScriptParseError::Schema("suggested_action missing or empty"));
    }

    Ok(script)
}
