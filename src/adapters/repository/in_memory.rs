//! In-memory Record Repository.
//!
//! Vec-backed implementation of the RecordRepository port. Used by the test
//! suite and by embedding callers that already hold a snapshot.

use async_trait::async_trait;

use crate::domain::foundation::{AdvisorId, ClientId};
use crate::domain::records::{ClientProfile, ContributionPlan, FundHolding, ProtectionPolicy};
use crate::ports::{RecordRepository, RepositoryError};

/// Snapshot-backed repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordRepository {
    plans: Vec<ContributionPlan>,
    policies: Vec<ProtectionPolicy>,
    holdings: Vec<FundHolding>,
    profiles: Vec<ClientProfile>,
}

impl InMemoryRecordRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds contribution plans.
    pub fn with_plans(mut self, plans: Vec<ContributionPlan>) -> Self {
        self.plans = plans;
        self
    }

    /// Seeds protection policies.
    pub fn with_policies(mut self, policies: Vec<ProtectionPolicy>) -> Self {
        self.policies = policies;
        self
    }

    /// Seeds fund holdings.
    pub fn with_holdings(mut self, holdings: Vec<FundHolding>) -> Self {
        self.holdings = holdings;
        self
    }

    /// Seeds client profiles.
    pub fn with_profiles(mut self, profiles: Vec<ClientProfile>) -> Self {
        self.profiles = profiles;
        self
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn contribution_plans(
        &self,
        advisor: Option<&AdvisorId>,
    ) -> Result<Vec<ContributionPlan>, RepositoryError> {
        Ok(self
            .plans
            .iter()
            .filter(|p| advisor.is_none() || p.advisor_id.as_ref() == advisor)
            .cloned()
            .collect())
    }

    async fn protection_policies(
        &self,
        advisor: Option<&AdvisorId>,
    ) -> Result<Vec<ProtectionPolicy>, RepositoryError> {
        Ok(self
            .policies
            .iter()
            .filter(|p| advisor.is_none() || p.advisor_id.as_ref() == advisor)
            .cloned()
            .collect())
    }

    async fn fund_holdings(
        &self,
        client: Option<&ClientId>,
    ) -> Result<Vec<FundHolding>, RepositoryError> {
        Ok(self
            .holdings
            .iter()
            .filter(|h| client.is_none() || Some(&h.client_id) == client)
            .cloned()
            .collect())
    }

    async fn client_profile(
        &self,
        client: &ClientId,
    ) -> Result<Option<ClientProfile>, RepositoryError> {
        Ok(self
            .profiles
            .iter()
            .find(|p| &p.client_id == client)
            .cloned())
    }
}
