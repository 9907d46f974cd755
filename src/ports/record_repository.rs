//! Record Repository Port - read-only access to client record collections.
//!
//! The storage layer behind this port is not this crate's concern; any
//! backend that can return snapshots of the four collections works. The
//! engine treats whatever a call returns as the truth at call time: there
//! is no transactional isolation across the several queries a combined
//! detection pass issues, which is acceptable because the output is
//! advisory.

use async_trait::async_trait;

use crate::domain::foundation::{AdvisorId, ClientId};
use crate::domain::records::{ClientProfile, ContributionPlan, FundHolding, ProtectionPolicy};

/// Errors surfaced by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A query failed inside the backing store.
    #[error("query failed: {0}")]
    Query(String),
}

/// Port for read-only access to the book-of-record collections.
///
/// Implementations must not mutate stored data; every method returns a
/// snapshot owned by the caller.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Contribution plans, optionally restricted to one advisor's book.
    async fn contribution_plans(
        &self,
        advisor: Option<&AdvisorId>,
    ) -> Result<Vec<ContributionPlan>, RepositoryError>;

    /// Protection policies, optionally restricted to one advisor's book.
    async fn protection_policies(
        &self,
        advisor: Option<&AdvisorId>,
    ) -> Result<Vec<ProtectionPolicy>, RepositoryError>;

    /// Fund holdings, optionally restricted to one client.
    async fn fund_holdings(
        &self,
        client: Option<&ClientId>,
    ) -> Result<Vec<FundHolding>, RepositoryError>;

    /// A single client's consolidated profile, if known.
    async fn client_profile(
        &self,
        client: &ClientId,
    ) -> Result<Option<ClientProfile>, RepositoryError>;
}
