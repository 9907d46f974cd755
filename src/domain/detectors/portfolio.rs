//! Fund holding opportunity rules.
//!
//! Three rules over a client's fund positions: underperformance against
//! benchmark, low research-desk rating, and single-fund concentration.
//! Holdings carry no advisor id, so these rules filter by client instead.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ranking;
use crate::domain::foundation::ClientId;
use crate::domain::opportunity::{OpportunityKind, PortfolioOpportunity};
use crate::domain::records::FundHolding;

/// Thresholds for the portfolio rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioThresholds {
    /// Minimum position size considered by the value-sensitive rules.
    #[serde(default)]
    pub min_current_value: f64,
    /// Ratings strictly below this are flagged.
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
    /// Portfolio weight (percent) at which a position counts as concentrated.
    #[serde(default = "default_min_concentration")]
    pub min_concentration: f64,
}

fn default_max_rating() -> f64 {
    3.0
}

fn default_min_concentration() -> f64 {
    25.0
}

impl Default for PortfolioThresholds {
    fn default() -> Self {
        Self {
            min_current_value: 0.0,
            max_rating: default_max_rating(),
            min_concentration: default_min_concentration(),
        }
    }
}

fn matches_client(holding: &FundHolding, filter: Option<&ClientId>) -> bool {
    match filter {
        Some(wanted) => &holding.client_id == wanted,
        None => true,
    }
}

fn scheme_key(opportunity: &PortfolioOpportunity) -> (ClientId, String) {
    (
        opportunity.client_id.clone(),
        opportunity.wpc.clone().unwrap_or_default(),
    )
}

fn to_opportunity(
    holding: &FundHolding,
    kind: OpportunityKind,
    description: String,
    as_of: DateTime<Utc>,
) -> PortfolioOpportunity {
    PortfolioOpportunity {
        client_id: holding.client_id.clone(),
        scheme_name: holding.scheme_name.clone(),
        wpc: holding.wpc.clone(),
        category: holding.category.clone(),
        amc_name: holding.amc_name.clone(),
        current_value: holding.current_value,
        portfolio_weight: holding.portfolio_weight,
        kind,
        description,
        rating: holding.rating.clone(),
        xirr_performance: holding.xirr_performance,
        three_year_alpha: holding.three_year_alpha,
        five_year_alpha: holding.five_year_alpha,
        rolling_12q_beat_percentage: holding.rolling_12q_beat_percentage,
        detected_at: as_of,
    }
}

/// Finds holdings lagging their benchmark on any horizon.
///
/// A holding qualifies when any of 3-year alpha, 5-year alpha or
/// XIRR-vs-benchmark is negative; the description enumerates the metrics
/// that triggered.
pub fn underperforming_holdings(
    holdings: &[FundHolding],
    client: Option<&ClientId>,
    min_current_value: f64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<PortfolioOpportunity> {
    let mut opportunities = Vec::new();

    for holding in holdings {
        if !matches_client(holding, client) || holding.current_value < min_current_value {
            continue;
        }

        let mut issues = Vec::new();
        if let Some(alpha) = holding.three_year_alpha.filter(|a| *a < 0.0) {
            issues.push(format!("3Y alpha: {:.2}%", alpha));
        }
        if let Some(alpha) = holding.five_year_alpha.filter(|a| *a < 0.0) {
            issues.push(format!("5Y alpha: {:.2}%", alpha));
        }
        if let Some(xirr) = holding.xirr_performance.filter(|x| *x < 0.0) {
            issues.push(format!("XIRR underperformance: {:.2}%", xirr));
        }
        if issues.is_empty() {
            continue;
        }

        let description = format!(
            "Fund showing negative performance. {}. {}",
            issues.join(", "),
            holding
                .comment
                .as_deref()
                .unwrap_or("Consider switching to better performing alternatives."),
        );
        opportunities.push(to_opportunity(
            holding,
            OpportunityKind::UnderperformingFund,
            description,
            as_of,
        ));
    }

    ranking::rank_desc(opportunities, limit, |o| o.current_value, scheme_key)
}

/// Finds holdings whose research-desk rating is below the cutoff.
///
/// Candidate holdings carry a non-empty rating text; records whose rating
/// does not parse as a number are silently excluded. That skip is part of
/// the rule's contract, not an error path.
pub fn low_rated_holdings(
    holdings: &[FundHolding],
    client: Option<&ClientId>,
    max_rating: f64,
    min_current_value: f64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<PortfolioOpportunity> {
    let mut opportunities = Vec::new();

    for holding in holdings {
        if !matches_client(holding, client)
            || holding.rating.is_none()
            || holding.current_value < min_current_value
        {
            continue;
        }
        let Some(rating) = holding.parsed_rating().parsed() else {
            continue;
        };
        if rating >= max_rating {
            continue;
        }

        let description = format!(
            "Fund has low rating of {}. {}",
            holding.rating.as_deref().unwrap_or_default(),
            holding
                .comment
                .as_deref()
                .unwrap_or("Consider reviewing and switching to higher rated alternatives."),
        );
        opportunities.push(to_opportunity(
            holding,
            OpportunityKind::LowRatedFund,
            description,
            as_of,
        ));
    }

    ranking::rank_desc(opportunities, limit, |o| o.current_value, scheme_key)
}

/// Finds single positions carrying too much of the client's book.
pub fn concentrated_holdings(
    holdings: &[FundHolding],
    client: Option<&ClientId>,
    min_concentration: f64,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<PortfolioOpportunity> {
    let mut opportunities = Vec::new();

    for holding in holdings {
        if !matches_client(holding, client) || holding.portfolio_weight < min_concentration {
            continue;
        }

        let description = format!(
            "Fund represents {:.1}% of portfolio. Consider rebalancing for better diversification across multiple funds and categories.",
            holding.portfolio_weight,
        );
        opportunities.push(to_opportunity(
            holding,
            OpportunityKind::PortfolioConcentration,
            description,
            as_of,
        ));
    }

    ranking::rank_desc(opportunities, limit, |o| o.portfolio_weight, scheme_key)
}

/// Combined portfolio view: equal-size slices from the three rules, ranked
/// by position size.
pub fn combined_opportunities(
    holdings: &[FundHolding],
    client: Option<&ClientId>,
    thresholds: &PortfolioThresholds,
    limit: usize,
    as_of: DateTime<Utc>,
) -> Vec<PortfolioOpportunity> {
    let slice = ranking::combined_slice(limit);

    let mut all = underperforming_holdings(
        holdings,
        client,
        thresholds.min_current_value,
        slice,
        as_of,
    );
    all.extend(low_rated_holdings(
        holdings,
        client,
        thresholds.max_rating,
        thresholds.min_current_value,
        slice,
        as_of,
    ));
    all.extend(concentrated_holdings(
        holdings,
        client,
        thresholds.min_concentration,
        slice,
        as_of,
    ));

    ranking::rank_desc(all, limit, |o| o.current_value, scheme_key)
}
