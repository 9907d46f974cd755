//! Compliance lexicon for advisor-facing language.
//!
//! Internal risk concepts must never surface in blunt phrasing: each one
//! maps to a fixed set of approved alternatives, a fixed ban-list must never
//! appear in output, and a required-vocabulary set should appear. The sets
//! are the compliance surface of the synthesizer and are deliberately
//! hard-coded rather than configurable.

use once_cell::sync::Lazy;

/// An internal concept and the approved phrases that may stand in for it.
#[derive(Debug, Clone, Copy)]
pub struct TermGuidance {
    /// Internal name of the concept.
    pub concept: &'static str,
    /// Approved advisor-facing phrases.
    pub approved: &'static [&'static str],
    /// A phrasing that must never be used for this concept, if any.
    pub never_say: Option<&'static str>,
}

/// Terminology standards: internal concept -> approved phrases.
pub const TERMINOLOGY: &[TermGuidance] = &[
    TermGuidance {
        concept: "SIP Stoppage",
        approved: &["Investment Interruption", "Compounding Break", "Discontinuity"],
        never_say: Some("Mandate Fail"),
    },
    TermGuidance {
        concept: "SIP Stagnation",
        approved: &["Inflation Drag", "Contribution Stagnation", "Static Allocation"],
        never_say: None,
    },
    TermGuidance {
        concept: "Portfolio Lag",
        approved: &["Performance Drag", "Consistency Gap", "Allocation Efficiency"],
        never_say: None,
    },
    TermGuidance {
        concept: "Insurance Gap",
        approved: &["Protection Deficit", "Coverage Alignment Gap"],
        never_say: None,
    },
];

/// Words that must never appear in advisor-facing output.
pub const BANNED_TERMS: &[&str] = &["buy", "sell", "profit", "guaranteed", "target", "mandate check"];

/// Vocabulary the output should lean on.
pub const REQUIRED_VOCABULARY: &[&str] =
    &["optimize", "rebalance", "review", "align", "allocate", "switch"];

static BANNED_LOWERCASE: Lazy<Vec<String>> =
    Lazy::new(|| BANNED_TERMS.iter().map(|t| t.to_lowercase()).collect());

static REQUIRED_LOWERCASE: Lazy<Vec<String>> =
    Lazy::new(|| REQUIRED_VOCABULARY.iter().map(|t| t.to_lowercase()).collect());

/// True when `needle` occurs in `haystack` as a whole word (both lowercase).
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut search_from = 0;
    while let Some(found) = haystack[search_from..].find(needle) {
        let start = search_from + found;
        let end = start + needle.len();
        let clear_before = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let clear_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if clear_before && clear_after {
            return true;
        }
        match haystack[start..].chars().next() {
            Some(c) => search_from = start + c.len_utf8(),
            None => break,
        }
    }
    false
}

/// Returns every banned term present in `text`, in ban-list order.
///
/// Matching is case-insensitive on whole words, so "rebuy" or "selling" do
/// not trip the ban on "buy"/"sell".
pub fn banned_terms_in(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    BANNED_TERMS
        .iter()
        .zip(BANNED_LOWERCASE.iter())
        .filter(|(_, lowered_term)| contains_word(&lowered, lowered_term))
        .map(|(term, _)| *term)
        .collect()
}

/// True when any required-vocabulary word appears in `text`.
///
/// Stems are matched loosely: "rebalancing" satisfies "rebalance".
pub fn uses_required_vocabulary(text: &str) -> bool {
    let lowered = text.to_lowercase();
    REQUIRED_LOWERCASE.iter().any(|term| lowered.contains(term.as_str()))
}
