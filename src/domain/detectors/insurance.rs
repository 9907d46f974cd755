//! Protection (insurance) opportunity rules.
//!
//! Two rules: coverage-gap over protection policies, and the
//! invested-but-uninsured join between contribution plans and policies.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{matches_advisor, ranking};
use crate::domain::foundation::{AdvisorId, ClientId};
use crate::domain::opportunity::{
    format_rupees, InsuranceCategory, InsuranceOpportunity, OpportunityKind,
    UNASSIGNED_ADVISOR_CODE, UNASSIGNED_ADVISOR_ID,
};
use crate::domain::records::{ContributionPlan, ProtectionPolicy};

/// Expected premium for an uninsured client: 2% of invested value, capped.
const EXPECTED_PREMIUM_RATE: f64 = 0.02;
const EXPECTED_PREMIUM_CAP: f64 = 100000.0;

/// Invested value at which the wealth band steps from "1Cr-5Cr" to "5Cr+".
const TOP_WEALTH_BAND_FLOOR: f64 = 5000000.0;

/// Thresholds for the insurance rules.
#[derive(Debug, Clone, Deserialize)]
pub struct InsuranceThresholds {
    /// Minimum shortfall against the baseline expected premium.
    #[serde(default = "default_min_premium_gap")]
    pub min_premium_gap: f64,
    /// Minimum upstream opportunity score.
    #[serde(default = "default_min_opportunity_score")]
    pub min_opportunity_score: i64,
    /// Minimum total fund investment for the no-coverage rule.
    #[serde(default = "default_min_mf_value")]
    pub min_mf_value: f64,
}

fn default_min_premium_gap() -> f64 {
    10000.0
}

fn default_min_opportunity_score() -> i64 {
    0
}

fn default_min_mf_value() -> f64 {
    1000000.0
}

impl Default for InsuranceThresholds {
    fn default() -> Self {
        Self {
            min_premium_gap: default_min_premium_gap(),
            min_opportunity_score: default_min_opportunity_score(),
            min_mf_value: default_min_mf_value(),
        }
    }
}

struct ClientCoverage<'a> {
    /// Highest-scored matching record for the client.
    representative: &'a ProtectionPolicy,
    held_types: BTreeSet<String>,
    total_premium: f64,
}

/// Finds clients paying materially less premium than their baseline.
///
/// Matching records are grouped per client: one opportunity per client, not
/// per policy, carrying the highest-scored underlying record's metadata.
pub fn coverage_gap_opportunities(
    policies: &[ProtectionPolicy],
    advisor: Option<&AdvisorId>,
    min_premium_gap: f64,
    min_opportunity_score: i64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<InsuranceOpportunity> {
    let matching: Vec<&ProtectionPolicy> = policies
        .iter()
        .filter(|p| {
            !p.deleted
                && p.premium_gap >= min_premium_gap
                && p.opportunity_score >= min_opportunity_score
                && matches_advisor(p.advisor_id.as_ref(), advisor)
        })
        .collect();

    // Score-descending order (stable, client id tie-break) so the first
    // record seen per client is its highest-scored one.
    let matching = ranking::rank_desc(
        matching,
        usize::MAX,
        |p| p.opportunity_score as f64,
        |p| p.client_id.clone(),
    );

    let mut by_client: BTreeMap<ClientId, ClientCoverage> = BTreeMap::new();
    for policy in matching {
        let entry = by_client
            .entry(policy.client_id.clone())
            .or_insert_with(|| ClientCoverage {
                representative: policy,
                held_types: BTreeSet::new(),
                total_premium: 0.0,
            });
        entry.held_types.insert(
            policy
                .insurance_type
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        );
        entry.total_premium += policy.premium;
    }

    let mut opportunities = Vec::new();
    for (client_id, coverage) in by_client {
        let record = coverage.representative;
        let missing: Vec<InsuranceCategory> = InsuranceCategory::ALL
            .into_iter()
            .filter(|category| !coverage.held_types.contains(category.label()))
            .collect();

        let held: Vec<&str> = coverage.held_types.iter().map(String::as_str).collect();
        let mut description = format!(
            "Client has {} premium gap. Current coverage: {}.",
            format_rupees(record.premium_gap),
            held.join(", "),
        );
        if !missing.is_empty() {
            let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
            description.push_str(&format!(" Consider adding: {}.", labels.join(", ")));
        }

        opportunities.push(InsuranceOpportunity {
            client_id,
            client_name: record
                .client_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            advisor_id: record
                .advisor_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| UNASSIGNED_ADVISOR_ID.to_string()),
            advisor_code: record
                .advisor_code
                .clone()
                .unwrap_or_else(|| UNASSIGNED_ADVISOR_CODE.to_string()),
            kind: OpportunityKind::InsuranceCoverageGap,
            description,
            wealth_band: record
                .wealth_band
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            age: record.age,
            mf_current_value: record.mf_current_value,
            total_premium: coverage.total_premium,
            baseline_expected_premium: record.baseline_expected_premium,
            premium_gap: record.premium_gap,
            opportunity_score: record.opportunity_score,
            missing_coverage_types: missing,
            detected_at: as_of,
        });
    }

    ranking::rank_desc(
        opportunities,
        limit,
        |o| o.opportunity_score as f64,
        |o| o.client_id.clone(),
    )
}

/// Finds heavily invested clients with no protection coverage at all.
///
/// Joins contribution plans against protection policies: clients whose
/// summed successful contributions reach `min_mf_value` and who hold no
/// non-deleted policy anywhere. Always top priority by construction.
pub fn no_coverage_opportunities(
    plans: &[ContributionPlan],
    policies: &[ProtectionPolicy],
    advisor: Option<&AdvisorId>,
    min_mf_value: f64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<InsuranceOpportunity> {
    let mut invested_totals: BTreeMap<ClientId, f64> = BTreeMap::new();
    let mut first_plan: BTreeMap<ClientId, &ContributionPlan> = BTreeMap::new();

    for plan in plans {
        if plan.deleted || !matches_advisor(plan.advisor_id.as_ref(), advisor) {
            continue;
        }
        *invested_totals.entry(plan.client_id.clone()).or_insert(0.0) += plan.success_amount;
        first_plan.entry(plan.client_id.clone()).or_insert(plan);
    }

    // Coverage anywhere excludes the client, regardless of advisor.
    let insured: HashSet<&ClientId> = policies
        .iter()
        .filter(|p| !p.deleted)
        .map(|p| &p.client_id)
        .collect();

    let mut opportunities = Vec::new();
    for (client_id, total_invested) in invested_totals {
        if total_invested < min_mf_value || insured.contains(&client_id) {
            continue;
        }
        let Some(plan) = first_plan.get(&client_id) else {
            continue;
        };

        let expected_premium = (total_invested * EXPECTED_PREMIUM_RATE).min(EXPECTED_PREMIUM_CAP);
        let wealth_band = if total_invested >= TOP_WEALTH_BAND_FLOOR {
            "5Cr+"
        } else {
            "1Cr-5Cr"
        };

        opportunities.push(InsuranceOpportunity {
            client_id,
            // Contribution plan records carry no client name.
            client_name: "Unknown".to_string(),
            advisor_id: plan
                .advisor_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| UNASSIGNED_ADVISOR_ID.to_string()),
            advisor_code: plan
                .advisor_code
                .clone()
                .unwrap_or_else(|| UNASSIGNED_ADVISOR_CODE.to_string()),
            kind: OpportunityKind::NoInsuranceCoverage,
            description: format!(
                "High-value client ({} MF investment) with NO insurance coverage. High-priority cross-sell opportunity.",
                format_rupees(total_invested),
            ),
            wealth_band: wealth_band.to_string(),
            age: None,
            mf_current_value: total_invested,
            total_premium: 0.0,
            baseline_expected_premium: expected_premium,
            premium_gap: expected_premium,
            // Uninsured-and-invested outranks every scored gap.
            opportunity_score: 100,
            missing_coverage_types: InsuranceCategory::ALL.to_vec(),
            detected_at: as_of,
        });
    }

    ranking::rank_desc(
        opportunities,
        limit,
        |o| o.mf_current_value,
        |o| o.client_id.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn policy(client: &str, insurance_type: &str) -> ProtectionPolicy {
        ProtectionPolicy {
            client_id: ClientId::new(client).unwrap(),
            client_name: Some("A. Client".to_string()),
            advisor_id: Some(AdvisorId::new("a-1").unwrap()),
            advisor_code: Some("ADV001".to_string()),
            insurance_type: Some(insurance_type.to_string()),
            insurer: None,
            premium: 20000.0,
            mf_current_value: 2000000.0,
            wealth_band: Some("1Cr-5Cr".to_string()),
            age: Some(45),
            baseline_expected_premium: 60000.0,
            premium_gap: 40000.0,
            opportunity_score: 70,
            deleted: false,
        }
    }

    fn plan(client: &str, success_amount: f64) -> ContributionPlan {
        ContributionPlan {
            client_id: ClientId::new(client).unwrap(),
            advisor_id: Some(AdvisorId::new("a-1").unwrap()),
            advisor_code: Some("ADV001".to_string()),
            scheme_name: None,
            amount: 10000.0,
            increment_percentage: 0.0,
            increment_amount: 0.0,
            increment_period: None,
            is_active: true,
            current_status: Some("Success".to_string()),
            deleted: false,
            start_date: None,
            latest_success_date: None,
            success_amount,
            failed_amount: 0.0,
            pending_amount: 0.0,
            in_progress_amount: 0.0,
            paused_amount: 0.0,
            success_count: 0,
        }
    }

    #[test]
    fn coverage_gap_groups_records_per_client() {
        let policies = vec![
            policy("c-1", "Health"),
            policy("c-1", "Term"),
            policy("c-2", "ULIP"),
        ];

        let found = coverage_gap_opportunities(&policies, None, 10000.0, 0, 100, as_of());
        assert_eq!(found.len(), 2);

        let c1 = found.iter().find(|o| o.client_id.as_str() == "c-1").unwrap();
        assert_eq!(c1.total_premium, 40000.0);
        assert_eq!(
            c1.missing_coverage_types,
            vec![InsuranceCategory::Ulip, InsuranceCategory::Traditional]
        );
        assert!(c1.description.contains("Current coverage: Health, Term."));
        assert!(c1.description.contains("Consider adding: ULIP, Traditional."));
    }

    #[test]
    fn coverage_gap_keeps_highest_scored_record_per_client() {
        let mut low = policy("c-1", "Health");
        low.opportunity_score = 40;
        low.premium_gap = 15000.0;
        let mut high = policy("c-1", "Term");
        high.opportunity_score = 90;
        high.premium_gap = 55000.0;

        let found = coverage_gap_opportunities(&[low, high], None, 10000.0, 0, 100, as_of());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].opportunity_score, 90);
        assert_eq!(found[0].premium_gap, 55000.0);
        // Both records still contribute to held types and premium totals.
        assert_eq!(found[0].total_premium, 40000.0);
        assert!(found[0].missing_coverage_types.len() == 2);
    }

    #[test]
    fn coverage_gap_applies_thresholds() {
        let mut small_gap = policy("c-1", "Health");
        small_gap.premium_gap = 9000.0;
        let mut low_score = policy("c-2", "Health");
        low_score.opportunity_score = 10;
        let mut deleted = policy("c-3", "Health");
        deleted.deleted = true;

        let found =
            coverage_gap_opportunities(&[small_gap, low_score, deleted], None, 10000.0, 50, 100, as_of());
        assert!(found.is_empty());
    }

    #[test]
    fn coverage_gap_ranks_by_score() {
        let mut first = policy("c-1", "Health");
        first.opportunity_score = 55;
        let mut second = policy("c-2", "Health");
        second.opportunity_score = 95;

        let found = coverage_gap_opportunities(&[first, second], None, 10000.0, 0, 100, as_of());
        assert_eq!(found[0].client_id.as_str(), "c-2");
        assert_eq!(found[1].client_id.as_str(), "c-1");
    }

    #[test]
    fn no_coverage_emits_for_uninsured_high_value_client() {
        // 6M invested across two plans, no policies at all.
        let plans = vec![plan("c-1", 4000000.0), plan("c-1", 2000000.0)];

        let found = no_coverage_opportunities(&plans, &[], None, 1000000.0, 100, as_of());
        assert_eq!(found.len(), 1);
        let opp = &found[0];
        assert_eq!(opp.wealth_band, "5Cr+");
        // min(100000, 6M * 2%) hits the cap.
        assert_eq!(opp.baseline_expected_premium, 100000.0);
        assert_eq!(opp.opportunity_score, 100);
        assert_eq!(opp.missing_coverage_types.len(), 4);
    }

    #[test]
    fn no_coverage_wealth_band_steps_at_five_crore() {
        let plans = vec![plan("c-1", 3000000.0)];
        let found = no_coverage_opportunities(&plans, &[], None, 1000000.0, 100, as_of());
        assert_eq!(found[0].wealth_band, "1Cr-5Cr");
        // 3M * 2% stays under the cap.
        assert_eq!(found[0].baseline_expected_premium, 60000.0);
    }

    #[test]
    fn no_coverage_excludes_insured_clients() {
        let plans = vec![plan("c-1", 2000000.0), plan("c-2", 2000000.0)];
        let policies = vec![policy("c-1", "Health")];

        let found = no_coverage_opportunities(&plans, &policies, None, 1000000.0, 100, as_of());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_id.as_str(), "c-2");
    }

    #[test]
    fn no_coverage_ignores_deleted_policies_when_excluding() {
        let plans = vec![plan("c-1", 2000000.0)];
        let mut lapsed = policy("c-1", "Health");
        lapsed.deleted = true;

        let found = no_coverage_opportunities(&plans, &[lapsed], None, 1000000.0, 100, as_of());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn no_coverage_skips_small_books() {
        let plans = vec![plan("c-1", 900000.0)];
        assert!(no_coverage_opportunities(&plans, &[], None, 1000000.0, 100, as_of()).is_empty());
    }

    #[test]
    fn no_coverage_ranks_by_invested_value() {
        let plans = vec![plan("c-1", 2000000.0), plan("c-2", 8000000.0)];
        let found = no_coverage_opportunities(&plans, &[], None, 1000000.0, 100, as_of());
        assert_eq!(found[0].client_id.as_str(), "c-2");
    }
}
