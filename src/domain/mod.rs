//! Domain layer - records, detection rules and derived opportunities.

pub mod detectors;
pub mod foundation;
pub mod opportunity;
pub mod records;
