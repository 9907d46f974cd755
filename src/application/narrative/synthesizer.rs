//! Compliance-guarded narrative synthesis.
//!
//! Turns one raw opportunity record into a client-safe advisor script via
//! the generative provider. The entry point is total: every invocation
//! returns a schema-valid outcome, degrading to the fixed manual-review
//! fallback on provider failure, schema violation or compliance violation.

use std::fmt::Write as _;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use serde_json::json;
use tracing::{debug, warn};

use super::lexicon;
use super::script::{parse_script, AdvisorScript, ScriptParseError};
use crate::config::NarrativeConfig;
use crate::ports::{GenerationRequest, NarrativeError, NarrativeProvider};

/// Input to one synthesis call.
#[derive(Debug, Clone)]
pub struct NarrativeRequest {
    /// Client display name.
    pub client_name: String,
    /// Advisor-facing opportunity category label.
    pub opportunity_type: String,
    /// Arbitrary structured context handed to the model verbatim.
    pub raw_data: serde_json::Value,
}

impl NarrativeRequest {
    /// Creates a new synthesis request.
    pub fn new(
        client_name: impl Into<String>,
        opportunity_type: impl Into<String>,
        raw_data: serde_json::Value,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            opportunity_type: opportunity_type.into(),
            raw_data,
        }
    }
}

/// Result envelope for one synthesis call.
///
/// `error_details` is diagnostic only: populated on the fallback path and
/// never part of the advisor-facing script.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub script: AdvisorScript,
    pub error_details: Option<String>,
}

impl SynthesisOutcome {
    /// True when this outcome is the manual-review fallback.
    pub fn is_fallback(&self) -> bool {
        self.error_details.is_some()
    }
}

/// Why one synthesis attempt was discarded.
enum AttemptFailure {
    Provider(NarrativeError),
    Schema(ScriptParseError),
    Compliance(Vec<&'static str>),
}

impl AttemptFailure {
    /// Whether a fresh generation could plausibly fix the failure. Schema
    /// and compliance violations are sampling artifacts; provider errors
    /// defer to their own classification.
    fn worth_retrying(&self) -> bool {
        match self {
            AttemptFailure::Provider(err) => err.is_retryable(),
            AttemptFailure::Schema(_) | AttemptFailure::Compliance(_) => true,
        }
    }

    fn details(&self) -> String {
        match self {
            AttemptFailure::Provider(err) => format!("provider error: {}", err),
            AttemptFailure::Schema(err) => format!("schema error: {}", err),
            AttemptFailure::Compliance(terms) => {
                format!("compliance violation: banned terms [{}]", terms.join(", "))
            }
        }
    }
}

/// Standing model instructions: persona, lexicon, guardrails, scoring
/// rubric and output schema. Assembled once from the lexicon so the prompt
/// and the post-generation scan cannot drift apart.
static SYSTEM_INSTRUCTION: Lazy<String> = Lazy::new(|| {
    let mut text = String::from(
        "You are a Premier Wealth Strategist. Your goal is to analyze client portfolios and \
         identify \"Optimization Opportunities\" using sophisticated, compliant terminology.\n\n\
         ### 1. TERMINOLOGY STANDARDS (The \"Lexicon\"):\n",
    );
    for guidance in lexicon::TERMINOLOGY {
        let approved = guidance
            .approved
            .iter()
            .map(|phrase| format!("\"{}\"", phrase))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(text, "- **{}:** Use terms like {}.", guidance.concept, approved);
        if let Some(never) = guidance.never_say {
            let _ = write!(text, " (NEVER say \"{}\").", never);
        }
        text.push('\n');
    }

    let banned = lexicon::BANNED_TERMS
        .iter()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(", ");
    let required = lexicon::REQUIRED_VOCABULARY
        .iter()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        text,
        "\n### 2. COMPLIANCE GUARDRAILS (Strict AMFI Adherence):\n\
         - **BANNED:** {banned}.\n\
         - **REQUIRED:** {required}.\n\n\
         ### 3. SCORING LOGIC (0-100):\n\
         - **90+ (Critical):** SIP Stopped > 30 Days OR Portfolio Weight > 15% in Lagging Fund.\n\
         - **75-89 (High):** Large Protection Deficit OR Tax-Efficient Switch Opportunity (LTU > 80%).\n\
         - **50-74 (Medium):** Static SIPs (Stagnation) > 3 Years.\n\n\
         ### 4. OUTPUT SCHEMA (JSON):\n{schema}",
        banned = banned,
        required = required,
        schema = json!({
            "client_id": "string",
            "urgency_score": "integer",
            "opportunity_type": "SIP_RECOVERY | PORTFOLIO_OPTIMIZATION | PROTECTION_ENHANCEMENT",
            "headline": "Sophisticated 3-4 word title (e.g. 'Compounding Break Alert')",
            "talking_point": "Conversational, professional script focusing on long-term wealth impact. Max 2 sentences.",
            "suggested_action": "Professional Action Label (e.g. 'Restore Regularity', 'Review Allocation')"
        }),
    );
    text
});

/// Compliance-guarded narrative synthesizer.
///
/// Construct once with an explicit configuration and provider; the caller
/// owns both lifecycles.
pub struct NarrativeSynthesizer {
    config: NarrativeConfig,
    provider: Arc<dyn NarrativeProvider>,
}

impl NarrativeSynthesizer {
    /// Creates a new synthesizer.
    pub fn new(config: NarrativeConfig, provider: Arc<dyn NarrativeProvider>) -> Self {
        Self { config, provider }
    }

    /// Analyzes one opportunity into a client-safe script.
    ///
    /// Total over its input: provider failures, timeouts, schema violations
    /// and banned-term output all produce the manual-review fallback with
    /// diagnostics on the envelope. Never panics, never propagates.
    #[tracing::instrument(skip(self, request), fields(opportunity_type = %request.opportunity_type))]
    pub async fn analyze(&self, request: &NarrativeRequest) -> SynthesisOutcome {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let failure = match self.attempt(request).await {
                Ok(script) => {
                    return SynthesisOutcome {
                        script,
                        error_details: None,
                    }
                }
                Err(failure) => failure,
            };

            if attempt < max_attempts && failure.worth_retrying() {
                debug!(attempt, details = %failure.details(), "synthesis attempt discarded, retrying");
                continue;
            }

            warn!(attempt, details = %failure.details(), "synthesis failed, returning manual-review fallback");
            return SynthesisOutcome {
                script: AdvisorScript::manual_review_fallback(),
                error_details: Some(failure.details()),
            };
        }
    }

    /// Analyzes a batch with a bounded worker pool.
    ///
    /// Each call is independent; results come back in input order.
    pub async fn analyze_batch(&self, requests: &[NarrativeRequest]) -> Vec<SynthesisOutcome> {
        stream::iter(requests)
            .map(|request| self.analyze(request))
            .buffered(self.config.batch_concurrency.max(1))
            .collect()
            .await
    }

    async fn attempt(&self, request: &NarrativeRequest) -> Result<AdvisorScript, AttemptFailure> {
        let generation = GenerationRequest::new(build_prompt(request))
            .with_system_instruction(SYSTEM_INSTRUCTION.as_str())
            .with_json_response();

        let response = self
            .provider
            .generate(generation)
            .await
            .map_err(AttemptFailure::Provider)?;

        let script = parse_script(&response.content).map_err(AttemptFailure::Schema)?;

        let mut violations = Vec::new();
        for text in [&script.headline, &script.talking_point, &script.suggested_action] {
            for term in lexicon::banned_terms_in(text) {
                if !violations.contains(&term) {
                    violations.push(term);
                }
            }
        }
        if !violations.is_empty() {
            return Err(AttemptFailure::Compliance(violations));
        }

        if !lexicon::uses_required_vocabulary(&script.talking_point) {
            debug!("talking point carries none of the required vocabulary");
        }

        Ok(script)
    }
}

/// Builds the per-call prompt: the client payload the system instruction
/// asks the model to analyze.
fn build_prompt(request: &NarrativeRequest) -> String {
    format!(
        "### ANALYZE THIS CLIENT:\n\
         Client Name: {}\n\
         Opportunity Type: {}\n\
         Raw Data Context: {}",
        request.client_name, request.opportunity_type, request.raw_data
    )
}
