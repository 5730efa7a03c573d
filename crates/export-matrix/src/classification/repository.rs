use async_trait::async_trait;

use super::domain::{CompanyId, SelectionMap};

/// Remote collaborator that owns persisted selections. Retry and backoff live behind it.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn fetch_company_selections(
        &self,
        company_id: &CompanyId,
    ) -> Result<Option<SelectionMap>, PersistenceError>;

    async fn save_company_selections(
        &self,
        company_id: &CompanyId,
        selections: &SelectionMap,
    ) -> Result<(), PersistenceError>;
}

/// Error enumeration for persistence failures, surfaced to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("company not found")]
    NotFound,
    #[error("selection store unavailable: {0}")]
    Unavailable(String),
    #[error("selection store rejected the write: {0}")]
    Rejected(String),
}
