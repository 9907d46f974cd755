//! Narrative synthesis - compliance-guarded advisor scripts.

pub mod lexicon;
pub mod script;
mod synthesizer;

pub use script::{
    AdvisorScript, ScriptCategory, ScriptParseError, UrgencyBand, FALLBACK_ACTION,
    FALLBACK_HEADLINE, FALLBACK_TALKING_POINT,
};
pub use synthesizer::{NarrativeRequest, NarrativeSynthesizer, SynthesisOutcome};
