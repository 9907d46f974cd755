//! Opportunity detectors.
//!
//! Each rule is a pure, stateless function over a snapshot slice: records
//! in, ranked opportunities out. Detectors never touch storage and never
//! mutate shared state, so any number of them may run concurrently against
//! the same snapshot. The reference instant is passed in explicitly so a
//! detection pass is reproducible.

pub mod insurance;
pub mod portfolio;
mod ranking;
pub mod sip;

use crate::domain::foundation::AdvisorId;

pub use sip::SipThresholds;
pub use insurance::InsuranceThresholds;
pub use portfolio::PortfolioThresholds;

/// True when a record's advisor matches the optional filter.
fn matches_advisor(record_advisor: Option<&AdvisorId>, filter: Option<&AdvisorId>) -> bool {
    match filter {
        Some(wanted) => record_advisor == Some(wanted),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filter_matches_everything() {
        let advisor = AdvisorId::new("a-1").unwrap();
        assert!(matches_advisor(Some(&advisor), None));
        assert!(matches_advisor(None, None));
    }

    #[test]
    fn filter_requires_exact_match() {
        let a1 = AdvisorId::new("a-1").unwrap();
        let a2 = AdvisorId::new("a-2").unwrap();
        assert!(matches_advisor(Some(&a1), Some(&a1)));
        assert!(!matches_advisor(Some(&a2), Some(&a1)));
        assert!(!matches_advisor(None, Some(&a1)));
    }
}
