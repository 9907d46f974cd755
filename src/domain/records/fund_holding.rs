//! Mutual fund holding records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{parse, ClientId, ParseOutcome};

/// One fund position in a client's portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundHolding {
    pub client_id: ClientId,

    // Scheme identity
    /// Product code identifying the scheme.
    #[serde(default)]
    pub wpc: Option<String>,
    #[serde(default)]
    pub scheme_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amc_name: Option<String>,

    // Position
    #[serde(default, deserialize_with = "parse::amount")]
    pub current_value: f64,
    /// Share of the client's book held in this fund, in percent.
    #[serde(default, deserialize_with = "parse::amount")]
    pub portfolio_weight: f64,

    // Performance vs benchmark
    #[serde(default)]
    pub three_year_alpha: Option<f64>,
    #[serde(default)]
    pub five_year_alpha: Option<f64>,
    /// Live XIRR minus benchmark XIRR.
    #[serde(default)]
    pub xirr_performance: Option<f64>,
    #[serde(default)]
    pub rolling_12q_beat_percentage: Option<f64>,

    // Tax context (narrative input only)
    #[serde(default)]
    pub unrealized_ltu: Option<f64>,
    #[serde(default)]
    pub unrealized_stu: Option<f64>,

    /// Research-desk rating, free text; may be non-numeric ("Unrated").
    #[serde(default)]
    pub rating: Option<String>,
    /// Analyst comment carried on the record.
    #[serde(default)]
    pub comment: Option<String>,
}

impl FundHolding {
    /// Parses the free-text rating; non-numeric ratings are a defined skip.
    pub fn parsed_rating(&self) -> ParseOutcome<f64> {
        parse::parse_rating(self.rating.as_deref())
    }
}
