//! Read-only snapshot entities from the book-of-record feed.
//!
//! The engine never owns these persistently: each detection pass works over
//! whatever snapshot the repository returned at call time. String-typed
//! booleans, separator-formatted amounts and loosely formatted dates in the
//! feed are absorbed into typed fields at deserialization via the
//! `foundation::parse` helpers, so detectors only ever see clean values.

mod client_profile;
mod contribution_plan;
mod fund_holding;
mod protection_policy;

pub use client_profile::ClientProfile;
pub use contribution_plan::{ContributionPlan, IncrementPeriod};
pub use fund_holding::FundHolding;
pub use protection_policy::ProtectionPolicy;
