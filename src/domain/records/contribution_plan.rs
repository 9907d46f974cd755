//! Systematic contribution plan ("SIP") records.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{parse, AdvisorId, ClientId};

/// How often a plan is configured to step up its contribution amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncrementPeriod {
    /// Steps up every six months (feed code "6M").
    SemiAnnual,
    /// Steps up every year (feed code "1Y").
    Annual,
}

impl IncrementPeriod {
    /// Parses the feed code for an increment period. Unknown codes read as
    /// None, which disables increment expectations for the plan.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "6M" => Some(IncrementPeriod::SemiAnnual),
            "1Y" => Some(IncrementPeriod::Annual),
            _ => None,
        }
    }

    /// Months between configured step-ups.
    pub fn months(&self) -> i64 {
        match self {
            IncrementPeriod::SemiAnnual => 6,
            IncrementPeriod::Annual => 12,
        }
    }

    /// Feed code for the period, used in advisor-facing descriptions.
    pub fn code(&self) -> &'static str {
        match self {
            IncrementPeriod::SemiAnnual => "6M",
            IncrementPeriod::Annual => "1Y",
        }
    }
}

fn optional_period<'de, D>(deserializer: D) -> Result<Option<IncrementPeriod>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(IncrementPeriod::from_code))
}

/// A recurring contribution plan as reported by the upstream feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub client_id: ClientId,
    #[serde(default)]
    pub advisor_id: Option<AdvisorId>,
    /// Externally visible advisor code carried alongside the internal id.
    #[serde(default)]
    pub advisor_code: Option<String>,
    #[serde(default)]
    pub scheme_name: Option<String>,

    /// Current per-installment contribution amount.
    #[serde(default, deserialize_with = "parse::amount")]
    pub amount: f64,

    // Increment configuration
    #[serde(default, deserialize_with = "parse::amount")]
    pub increment_percentage: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub increment_amount: f64,
    #[serde(default, deserialize_with = "optional_period")]
    pub increment_period: Option<IncrementPeriod>,

    // Status
    #[serde(default, deserialize_with = "parse::flag")]
    pub is_active: bool,
    /// Latest installment state as reported upstream ("Success" significant).
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default, deserialize_with = "parse::flag")]
    pub deleted: bool,

    // Dates
    #[serde(default, deserialize_with = "parse::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "parse::optional_date")]
    pub latest_success_date: Option<NaiveDate>,

    // Monetary tracking across the plan's lifetime
    #[serde(default, deserialize_with = "parse::amount")]
    pub success_amount: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub failed_amount: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub pending_amount: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub in_progress_amount: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub paused_amount: f64,
    #[serde(default)]
    pub success_count: i64,
}

impl ContributionPlan {
    /// True when the plan reports a "Success" installment state.
    pub fn is_in_success_state(&self) -> bool {
        self.current_status.as_deref() == Some("Success")
    }

    /// Total amount the plan has attempted to collect so far.
    pub fn total_attempted(&self) -> f64 {
        self.success_amount + self.failed_amount + self.pending_amount + self.in_progress_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_period_parses_feed_codes() {
        assert_eq!(IncrementPeriod::from_code("6M"), Some(IncrementPeriod::SemiAnnual));
        assert_eq!(IncrementPeriod::from_code("1Y"), Some(IncrementPeriod::Annual));
        assert_eq!(IncrementPeriod::from_code("3M"), None);
        assert_eq!(IncrementPeriod::from_code(""), None);
    }

    #[test]
    fn increment_period_months() {
        assert_eq!(IncrementPeriod::SemiAnnual.months(), 6);
        assert_eq!(IncrementPeriod::Annual.months(), 12);
    }

    #[test]
    fn deserializes_string_typed_feed_record() {
        let json = r#"{
            "client_id": "c-100",
            "advisor_id": "a-7",
            "advisor_code": "ADV007",
            "amount": "10,000",
            "increment_percentage": 10.0,
            "increment_period": "6M",
            "is_active": "true",
            "current_status": "Success",
            "deleted": "false",
            "start_date": "2023-04-01",
            "latest_success_date": "2024-01-15",
            "success_amount": "1,20,000",
            "failed_amount": 0
        }"#;

        let plan: ContributionPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.client_id.as_str(), "c-100");
        assert_eq!(plan.amount, 10000.0);
        assert_eq!(plan.increment_period, Some(IncrementPeriod::SemiAnnual));
        assert!(plan.is_active);
        assert!(!plan.deleted);
        assert!(plan.is_in_success_state());
        assert_eq!(plan.success_amount, 120000.0);
        assert_eq!(plan.latest_success_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn unknown_increment_period_reads_as_none() {
        let json = r#"{"client_id": "c-1", "increment_period": "2M"}"#;
        let plan: ContributionPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.increment_period, None);
    }

    #[test]
    fn total_attempted_sums_buckets() {
        let json = r#"{
            "client_id": "c-1",
            "success_amount": 4000,
            "failed_amount": 6000,
            "pending_amount": 500,
            "in_progress_amount": 250
        }"#;
        let plan: ContributionPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.total_attempted(), 10750.0);
    }
}
