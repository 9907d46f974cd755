//! Application layer - orchestration over the domain and ports.

pub mod narrative;
mod opportunity_service;

pub use opportunity_service::OpportunityService;
