//! Derived opportunity records.
//!
//! Opportunities are created fresh on every detection pass, exist only for
//! the duration of a response, and are never mutated after creation, only
//! ranked, filtered and serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::foundation::ClientId;

/// Advisor id placeholder for records with no advisor assigned.
pub const UNASSIGNED_ADVISOR_ID: &str = "0";
/// Advisor code placeholder for records with no advisor assigned.
pub const UNASSIGNED_ADVISOR_CODE: &str = "unassigned";

/// Which detection rule produced an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityKind {
    NoSipIncrease,
    FailedSipTransactions,
    HighValueInactive,
    InsuranceCoverageGap,
    NoInsuranceCoverage,
    UnderperformingFund,
    LowRatedFund,
    PortfolioConcentration,
}

impl OpportunityKind {
    /// Advisor-facing label for this opportunity category.
    pub fn label(&self) -> &'static str {
        match self {
            OpportunityKind::NoSipIncrease => "No SIP Increase",
            OpportunityKind::FailedSipTransactions => "Failed SIP Transactions",
            OpportunityKind::HighValueInactive => "High-Value Inactive Client",
            OpportunityKind::InsuranceCoverageGap => "Insurance Coverage Gap",
            OpportunityKind::NoInsuranceCoverage => "No Insurance Coverage",
            OpportunityKind::UnderperformingFund => "Underperforming Fund",
            OpportunityKind::LowRatedFund => "Low Rated Fund",
            OpportunityKind::PortfolioConcentration => "Portfolio Concentration",
        }
    }
}

/// The four coverage categories a fully protected client would hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceCategory {
    Health,
    Term,
    Ulip,
    Traditional,
}

impl InsuranceCategory {
    /// All categories, in canonical display order.
    pub const ALL: [InsuranceCategory; 4] = [
        InsuranceCategory::Health,
        InsuranceCategory::Term,
        InsuranceCategory::Ulip,
        InsuranceCategory::Traditional,
    ];

    /// Feed spelling of the category.
    pub fn label(&self) -> &'static str {
        match self {
            InsuranceCategory::Health => "Health",
            InsuranceCategory::Term => "Term",
            InsuranceCategory::Ulip => "ULIP",
            InsuranceCategory::Traditional => "Traditional",
        }
    }
}

/// A contribution-plan opportunity produced by one of the SIP rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub client_id: ClientId,
    pub advisor_id: String,
    pub advisor_code: String,
    pub kind: OpportunityKind,
    pub description: String,
    pub current_sip_amount: f64,
    /// Estimated additional book value if the advisor acts.
    pub potential_increase: f64,
    pub last_activity_date: Option<NaiveDate>,
    pub days_since_activity: Option<i64>,
    pub total_invested: f64,
    pub failed_amount: Option<f64>,
    /// Urgency in [0, 10].
    pub risk_score: f64,
    pub detected_at: DateTime<Utc>,
}

/// A protection opportunity produced by one of the insurance rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceOpportunity {
    pub client_id: ClientId,
    pub client_name: String,
    pub advisor_id: String,
    pub advisor_code: String,
    pub kind: OpportunityKind,
    pub description: String,
    pub wealth_band: String,
    pub age: Option<i64>,
    pub mf_current_value: f64,
    pub total_premium: f64,
    pub baseline_expected_premium: f64,
    pub premium_gap: f64,
    /// Priority ranking in [0, 100].
    pub opportunity_score: i64,
    pub missing_coverage_types: Vec<InsuranceCategory>,
    pub detected_at: DateTime<Utc>,
}

/// A fund-holding opportunity produced by one of the portfolio rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioOpportunity {
    pub client_id: ClientId,
    pub scheme_name: Option<String>,
    pub wpc: Option<String>,
    pub category: Option<String>,
    pub amc_name: Option<String>,
    pub current_value: f64,
    pub portfolio_weight: f64,
    pub kind: OpportunityKind,
    pub description: String,
    pub rating: Option<String>,
    pub xirr_performance: Option<f64>,
    pub three_year_alpha: Option<f64>,
    pub five_year_alpha: Option<f64>,
    pub rolling_12q_beat_percentage: Option<f64>,
    pub detected_at: DateTime<Utc>,
}

/// Formats a monetary amount for advisor-facing descriptions: rounded to
/// whole rupees with thousands grouping, e.g. `₹1,234,567`.
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}
