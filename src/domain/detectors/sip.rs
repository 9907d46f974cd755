//! Contribution plan ("SIP") opportunity rules.
//!
//! Three independent rules plus a combined view:
//!
//!   1. No-increase: active, successful plans with a configured step-up that
//!      has never been taken.
//!   2. Failed-transaction: plans with a significant failed amount to
//!      recover.
//!   3. High-value-inactive: large books with no recent installment.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{matches_advisor, ranking};
use crate::domain::foundation::{days_since, months_since, AdvisorId};
use crate::domain::opportunity::{
    format_rupees, Opportunity, OpportunityKind, UNASSIGNED_ADVISOR_CODE, UNASSIGNED_ADVISOR_ID,
};
use crate::domain::records::ContributionPlan;

/// Thresholds for the three SIP rules.
#[derive(Debug, Clone, Deserialize)]
pub struct SipThresholds {
    /// Minimum months since the last successful installment before a plan
    /// counts as stagnant.
    #[serde(default = "default_min_months")]
    pub min_months: i64,
    /// Minimum failed amount before a plan needs intervention.
    #[serde(default = "default_min_failed_amount")]
    pub min_failed_amount: f64,
    /// Minimum invested amount for the high-value rule.
    #[serde(default = "default_min_invested_amount")]
    pub min_invested_amount: f64,
    /// Minimum days without a successful installment for the high-value rule.
    #[serde(default = "default_min_inactive_days")]
    pub min_inactive_days: i64,
}

fn default_min_months() -> i64 {
    12
}

fn default_min_failed_amount() -> f64 {
    5000.0
}

fn default_min_invested_amount() -> f64 {
    100000.0
}

fn default_min_inactive_days() -> i64 {
    60
}

impl Default for SipThresholds {
    fn default() -> Self {
        Self {
            min_months: default_min_months(),
            min_failed_amount: default_min_failed_amount(),
            min_invested_amount: default_min_invested_amount(),
            min_inactive_days: default_min_inactive_days(),
        }
    }
}

fn advisor_fields(plan: &ContributionPlan) -> (String, String) {
    let advisor_id = plan
        .advisor_id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| UNASSIGNED_ADVISOR_ID.to_string());
    let advisor_code = plan
        .advisor_code
        .clone()
        .unwrap_or_else(|| UNASSIGNED_ADVISOR_CODE.to_string());
    (advisor_id, advisor_code)
}

/// Finds active plans whose configured step-up has never been taken.
///
/// Eligible plans are active, in a "Success" state, not soft-deleted, have a
/// known latest-success date and a positive increment percentage. A plan is
/// emitted only when its increment period implies at least one missed
/// step-up and the last success is at least `min_months` old.
pub fn no_increase_opportunities(
    plans: &[ContributionPlan],
    advisor: Option<&AdvisorId>,
    min_months: i64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for plan in plans {
        if !matches_advisor(plan.advisor_id.as_ref(), advisor) {
            continue;
        }
        if !plan.is_active || !plan.is_in_success_state() || plan.deleted {
            continue;
        }
        if plan.increment_percentage <= 0.0 {
            continue;
        }
        let (Some(last_success), Some(start)) = (plan.latest_success_date, plan.start_date) else {
            continue;
        };

        let months_since_last = months_since(last_success, as_of);
        let months_since_start = months_since(start, as_of);
        if months_since_last < min_months {
            continue;
        }

        let expected_increments = match plan.increment_period {
            Some(period) if months_since_start >= period.months() => {
                months_since_start / period.months()
            }
            _ => 0,
        };
        if expected_increments == 0 {
            continue;
        }
        // expected_increments > 0 implies the period is configured
        let period_code = plan.increment_period.map(|p| p.code()).unwrap_or("");

        let potential_increase = plan.amount * (plan.increment_percentage / 100.0);
        let (advisor_id, advisor_code) = advisor_fields(plan);

        opportunities.push(Opportunity {
            client_id: plan.client_id.clone(),
            advisor_id,
            advisor_code,
            kind: OpportunityKind::NoSipIncrease,
            description: format!(
                "Client hasn't increased SIP for {} months. Expected {} increments based on {} period.",
                months_since_last, expected_increments, period_code
            ),
            current_sip_amount: plan.amount,
            potential_increase,
            last_activity_date: Some(last_success),
            days_since_activity: Some(days_since(last_success, as_of)),
            total_invested: plan.success_amount,
            failed_amount: None,
            risk_score: (months_since_last as f64 / 6.0).min(10.0),
            detected_at: as_of,
        });
    }

    ranking::rank_desc(
        opportunities,
        limit,
        |o| o.potential_increase,
        |o| o.client_id.clone(),
    )
}

/// Finds plans with failed installments worth recovering.
pub fn failed_transaction_opportunities(
    plans: &[ContributionPlan],
    advisor: Option<&AdvisorId>,
    min_failed_amount: f64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for plan in plans {
        if !matches_advisor(plan.advisor_id.as_ref(), advisor) {
            continue;
        }
        if plan.deleted || plan.failed_amount < min_failed_amount {
            continue;
        }

        let total_attempted = plan.success_amount + plan.failed_amount;
        let failure_rate = if total_attempted > 0.0 {
            plan.failed_amount / total_attempted * 100.0
        } else {
            0.0
        };

        let (advisor_id, advisor_code) = advisor_fields(plan);

        opportunities.push(Opportunity {
            client_id: plan.client_id.clone(),
            advisor_id,
            advisor_code,
            kind: OpportunityKind::FailedSipTransactions,
            description: format!(
                "Failed amount: {} ({:.1}% failure rate). Status: {}. May need mandate renewal or payment issue resolution.",
                format_rupees(plan.failed_amount),
                failure_rate,
                plan.current_status.as_deref().unwrap_or("Unknown"),
            ),
            current_sip_amount: plan.amount,
            // Recovering the failed amount is the upside.
            potential_increase: plan.failed_amount,
            last_activity_date: plan.latest_success_date,
            days_since_activity: plan.latest_success_date.map(|d| days_since(d, as_of)),
            total_invested: plan.success_amount,
            failed_amount: Some(plan.failed_amount),
            risk_score: (failure_rate / 10.0).min(10.0),
            detected_at: as_of,
        });
    }

    ranking::rank_desc(
        opportunities,
        limit,
        |o| o.failed_amount.unwrap_or(0.0),
        |o| o.client_id.clone(),
    )
}

/// Finds high-value books with no recent successful installment.
pub fn high_value_inactive_opportunities(
    plans: &[ContributionPlan],
    advisor: Option<&AdvisorId>,
    min_invested_amount: f64,
    min_inactive_days: i64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for plan in plans {
        if !matches_advisor(plan.advisor_id.as_ref(), advisor) {
            continue;
        }
        if plan.deleted || plan.success_amount < min_invested_amount {
            continue;
        }
        let Some(last_success) = plan.latest_success_date else {
            continue;
        };
        let inactive_days = days_since(last_success, as_of);
        if inactive_days < min_inactive_days {
            continue;
        }

        let (advisor_id, advisor_code) = advisor_fields(plan);

        opportunities.push(Opportunity {
            client_id: plan.client_id.clone(),
            advisor_id,
            advisor_code,
            kind: OpportunityKind::HighValueInactive,
            description: format!(
                "High-value client ({} invested) inactive for {} days. Good candidate for portfolio review, additional products, or insurance cross-sell.",
                format_rupees(plan.success_amount),
                inactive_days,
            ),
            current_sip_amount: plan.amount,
            // Suggest a 50% step-up or a new product.
            potential_increase: plan.amount * 1.5,
            last_activity_date: Some(last_success),
            days_since_activity: Some(inactive_days),
            total_invested: plan.success_amount,
            failed_amount: None,
            risk_score: (inactive_days as f64 / 30.0).min(10.0),
            detected_at: as_of,
        });
    }

    ranking::rank_desc(
        opportunities,
        limit,
        |o| o.total_invested,
        |o| o.client_id.clone(),
    )
}

/// Combined SIP view: equal-size slices from the three rules, ranked by a
/// blend of urgency and monetary upside.
pub fn combined_opportunities(
    plans: &[ContributionPlan],
    advisor: Option<&AdvisorId>,
    thresholds: &SipThresholds,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<Opportunity> {
    let slice = ranking::combined_slice(limit);

    let mut all = no_increase_opportunities(plans, advisor, thresholds.min_months, slice, as_of);
    all.extend(failed_transaction_opportunities(
        plans,
        advisor,
        thresholds.min_failed_amount,
        slice,
        as_of,
    ));
    all.extend(high_value_inactive_opportunities(
        plans,
        advisor,
        thresholds.min_invested_amount,
        thresholds.min_inactive_days,
        slice,
        as_of,
    ));

    ranking::rank_desc(
        all,
        limit,
        |o| o.risk_score + o.potential_increase / 10000.0,
        |o| o.client_id.clone(),
    )
}
