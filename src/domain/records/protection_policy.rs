//! Protection (insurance) policy records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{parse, AdvisorId, ClientId};

/// An insurance transaction/policy row as reported by the upstream feed.
///
/// The baseline expected premium, premium gap and opportunity score arrive
/// precomputed on the record; the detectors only threshold and rank them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionPolicy {
    pub client_id: ClientId,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub advisor_id: Option<AdvisorId>,
    #[serde(default)]
    pub advisor_code: Option<String>,

    /// Coverage category: Health, Term, ULIP, Traditional, etc.
    #[serde(default)]
    pub insurance_type: Option<String>,
    #[serde(default)]
    pub insurer: Option<String>,
    #[serde(default, deserialize_with = "parse::amount")]
    pub premium: f64,

    // Client context carried on the record
    #[serde(default, deserialize_with = "parse::amount")]
    pub mf_current_value: f64,
    #[serde(default)]
    pub wealth_band: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,

    // Precomputed opportunity metrics
    #[serde(default, deserialize_with = "parse::amount")]
    pub baseline_expected_premium: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub premium_gap: f64,
    /// Priority ranking in [0, 100] assigned upstream.
    #[serde(default)]
    pub opportunity_score: i64,

    #[serde(default, deserialize_with = "parse::flag")]
    pub deleted: bool,
}
