//! Advisor Radar - Opportunity Detection for Financial Advisors
//!
//! Scans client records across contribution plans, protection policies and
//! fund holdings, ranks the resulting opportunities, and turns them into
//! compliance-guarded advisor scripts via a generative text service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
