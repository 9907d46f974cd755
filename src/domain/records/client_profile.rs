//! Client profile records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{parse, ClientId};

/// A client's consolidated book as reported by the upstream feed.
///
/// Current and invested values are non-negative monetary amounts; the feed
/// enforces this and the lenient amount parser maps anything else to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: ClientId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub advisor_code: Option<String>,

    // Current values per product line
    #[serde(default, deserialize_with = "parse::amount")]
    pub total_current_value: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub mf_current_value: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub fd_current_value: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub pms_current_value: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub aif_current_value: f64,

    // Invested values per product line
    #[serde(default, deserialize_with = "parse::amount")]
    pub total_invested_value: f64,
    #[serde(default, deserialize_with = "parse::amount")]
    pub mf_invested_value: f64,

    // Activity
    #[serde(default, deserialize_with = "parse::optional_date")]
    pub first_active_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "parse::optional_date")]
    pub latest_as_on_date: Option<NaiveDate>,
}

impl ClientProfile {
    /// Unrealized gain across the whole book.
    pub fn total_returns(&self) -> f64 {
        self.total_current_value - self.total_invested_value
    }
}
