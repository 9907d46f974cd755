//! Opportunity detection orchestration.
//!
//! Fetches a snapshot from the record repository and runs the pure detector
//! rules over it. Each method corresponds to one detector surface; combined
//! views delegate slicing and ranking to the detectors themselves.

use std::sync::Arc;

use chrono::Utc;

use crate::config::DetectionConfig;
use crate::domain::detectors::{insurance, portfolio, sip};
use crate::domain::foundation::{AdvisorId, ClientId};
use crate::domain::opportunity::{InsuranceOpportunity, Opportunity, PortfolioOpportunity};
use crate::ports::{RecordRepository, RepositoryError};

/// Detection pass orchestrator.
///
/// Stateless apart from its configuration; safe to share and call
/// concurrently.
pub struct OpportunityService {
    repository: Arc<dyn RecordRepository>,
    config: DetectionConfig,
}

impl OpportunityService {
    /// Creates a new service over a repository.
    pub fn new(repository: Arc<dyn RecordRepository>, config: DetectionConfig) -> Self {
        Self { repository, config }
    }

    fn limit(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.config.result_limit)
    }

    /// Plans whose configured step-up has never been taken.
    #[tracing::instrument(skip(self))]
    pub async fn no_increase_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<Opportunity>, RepositoryError> {
        let plans = self.repository.contribution_plans(advisor).await?;
        Ok(sip::no_increase_opportunities(
            &plans,
            advisor,
            self.config.sip.min_months,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Plans with failed installments worth recovering.
    #[tracing::instrument(skip(self))]
    pub async fn failed_transaction_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<Opportunity>, RepositoryError> {
        let plans = self.repository.contribution_plans(advisor).await?;
        Ok(sip::failed_transaction_opportunities(
            &plans,
            advisor,
            self.config.sip.min_failed_amount,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// High-value books with no recent installment.
    #[tracing::instrument(skip(self))]
    pub async fn high_value_inactive_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<Opportunity>, RepositoryError> {
        let plans = self.repository.contribution_plans(advisor).await?;
        Ok(sip::high_value_inactive_opportunities(
            &plans,
            advisor,
            self.config.sip.min_invested_amount,
            self.config.sip.min_inactive_days,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Combined SIP view across the three contribution rules.
    #[tracing::instrument(skip(self))]
    pub async fn sip_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<Opportunity>, RepositoryError> {
        let plans = self.repository.contribution_plans(advisor).await?;
        Ok(sip::combined_opportunities(
            &plans,
            advisor,
            &self.config.sip,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Clients paying materially less premium than their baseline.
    #[tracing::instrument(skip(self))]
    pub async fn coverage_gap_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<InsuranceOpportunity>, RepositoryError> {
        let policies = self.repository.protection_policies(advisor).await?;
        Ok(insurance::coverage_gap_opportunities(
            &policies,
            advisor,
            self.config.insurance.min_premium_gap,
            self.config.insurance.min_opportunity_score,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Heavily invested clients with no protection coverage at all.
    ///
    /// The exclusion set spans every advisor's policies: coverage sold by a
    /// different advisor still counts as coverage.
    #[tracing::instrument(skip(self))]
    pub async fn no_coverage_opportunities(
        &self,
        advisor: Option<&AdvisorId>,
        limit: Option<usize>,
    ) -> Result<Vec<InsuranceOpportunity>, RepositoryError> {
        let plans = self.repository.contribution_plans(advisor).await?;
        let policies = self.repository.protection_policies(None).await?;
        Ok(insurance::no_coverage_opportunities(
            &plans,
            &policies,
            advisor,
            self.config.insurance.min_mf_value,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Holdings lagging their benchmark on any horizon.
    #[tracing::instrument(skip(self))]
    pub async fn underperforming_holdings(
        &self,
        client: Option<&ClientId>,
        limit: Option<usize>,
    ) -> Result<Vec<PortfolioOpportunity>, RepositoryError> {
        let holdings = self.repository.fund_holdings(client).await?;
        Ok(portfolio::underperforming_holdings(
            &holdings,
            client,
            self.config.portfolio.min_current_value,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Holdings rated below the research-desk cutoff.
    #[tracing::instrument(skip(self))]
    pub async fn low_rated_holdings(
        &self,
        client: Option<&ClientId>,
        limit: Option<usize>,
    ) -> Result<Vec<PortfolioOpportunity>, RepositoryError> {
        let holdings = self.repository.fund_holdings(client).await?;
        Ok(portfolio::low_rated_holdings(
            &holdings,
            client,
            self.config.portfolio.max_rating,
            self.config.portfolio.min_current_value,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Single positions carrying too much of a client's book.
    #[tracing::instrument(skip(self))]
    pub async fn concentrated_holdings(
        &self,
        client: Option<&ClientId>,
        limit: Option<usize>,
    ) -> Result<Vec<PortfolioOpportunity>, RepositoryError> {
        let holdings = self.repository.fund_holdings(client).await?;
        Ok(portfolio::concentrated_holdings(
            &holdings,
            client,
            self.config.portfolio.min_concentration,
            self.limit(limit),
            Utc::now(),
        ))
    }

    /// Combined portfolio view across the three holding rules.
    #[tracing::instrument(skip(self))]
    pub async fn portfolio_opportunities(
        &self,
        client: Option<&ClientId>,
        limit: Option<usize>,
    ) -> Result<Vec<PortfolioOpportunity>, RepositoryError> {
        let holdings = self.repository.fund_holdings(client).await?;
        Ok(portfolio::combined_opportunities(
            &holdings,
            client,
            &self.config.portfolio,
            self.limit(limit),
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repository::InMemoryRecordRepository;
    use crate::domain::opportunity::OpportunityKind;

    fn repository() -> InMemoryRecordRepository {
        let plans = serde_json::from_str(
            r#"[
                {
                    "client_id": "c-1", "advisor_id": "a-1", "amount": 10000,
                    "failed_amount": 8000, "success_amount": 2000,
                    "deleted": "false"
                },
                {
                    "client_id": "c-2", "advisor_id": "a-2", "amount": 5000,
                    "failed_amount": 6000, "success_amount": 14000,
                    "deleted": "false"
                }
            ]"#,
        )
        .unwrap();
        InMemoryRecordRepository::new().with_plans(plans)
    }

    #[tokio::test]
    async fn failed_transactions_run_over_the_snapshot() {
        let service = OpportunityService::new(
            Arc::new(repository()),
            DetectionConfig::default(),
        );

        let found = service
            .failed_transaction_opportunities(None, None)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].client_id.as_str(), "c-1");
        assert_eq!(found[0].kind, OpportunityKind::FailedSipTransactions);
    }

    #[tokio::test]
    async fn advisor_filter_reaches_the_repository() {
        let service = OpportunityService::new(
            Arc::new(repository()),
            DetectionConfig::default(),
        );

        let advisor = AdvisorId::new("a-2").unwrap();
        let found = service
            .failed_transaction_opportunities(Some(&advisor), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_id.as_str(), "c-2");
    }

    #[tokio::test]
    async fn explicit_limit_overrides_the_default() {
        let service = OpportunityService::new(
            Arc::new(repository()),
            DetectionConfig::default(),
        );

        let found = service
            .failed_transaction_opportunities(None, Some(1))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
