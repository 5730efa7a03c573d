use std::sync::Arc;

use tracing::info;

use super::catalog::{CatalogError, CriterionCatalog};
use super::domain::{CompanyId, SelectionMap};
use super::evaluation::{EvaluationEngine, EvaluationError, EvaluationOutcome};
use super::presentation::{CategoryBadge, ClassificationView};
use super::repository::{PersistenceError, SelectionStore};
use super::session::{EvaluationSession, LoadReport, SessionError};

/// Service composing the rubric engine with the remote selection store.
pub struct ClassificationService<S> {
    engine: Arc<EvaluationEngine>,
    store: Arc<S>,
}

impl<S> ClassificationService<S>
where
    S: SelectionStore + 'static,
{
    pub fn new(store: Arc<S>, catalog: Arc<CriterionCatalog>) -> Self {
        Self {
            engine: Arc::new(EvaluationEngine::new(catalog)),
            store,
        }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &CriterionCatalog {
        self.engine.catalog()
    }

    /// Fetch persisted selections and open a session seeded from them.
    pub async fn open_session(
        &self,
        company_id: &CompanyId,
    ) -> Result<(EvaluationSession, LoadReport), ClassificationServiceError> {
        let prior = self.store.fetch_company_selections(company_id).await?;
        let mut session = EvaluationSession::new(self.engine.clone());
        let report = session.load(company_id.clone(), prior.as_ref())?;
        Ok((session, report))
    }

    pub async fn classification(
        &self,
        company_id: &CompanyId,
    ) -> Result<ClassificationView, ClassificationServiceError> {
        let (session, report) = self.open_session(company_id).await?;
        view_of(&session, report)
    }

    /// Apply every change to the company's matrix and persist the result.
    ///
    /// Changes are validated in full before anything is handed to the store.
    pub async fn update_selections(
        &self,
        company_id: &CompanyId,
        changes: &SelectionMap,
    ) -> Result<ClassificationView, ClassificationServiceError> {
        let (mut session, report) = self.open_session(company_id).await?;

        for (criterion, label) in changes {
            session.set_selection_key(criterion, label)?;
        }

        session.commit(self.store.as_ref()).await?;
        info!(
            company = %company_id,
            changes = changes.len(),
            "classification matrix updated"
        );

        let remaining: Vec<_> = report
            .seeded
            .into_iter()
            .filter(|id| !changes.contains_key(id.key()))
            .collect();
        view_of(&session, LoadReport { seeded: remaining })
    }

    /// Score a complete mapping without touching persisted data.
    pub fn preview(
        &self,
        selections: &SelectionMap,
    ) -> Result<EvaluationOutcome, ClassificationServiceError> {
        Ok(self.engine.evaluate(selections)?)
    }
}

fn view_of(
    session: &EvaluationSession,
    report: LoadReport,
) -> Result<ClassificationView, ClassificationServiceError> {
    let outcome = session.outcome()?;
    let company_id = session
        .company_id()
        .cloned()
        .ok_or(ClassificationServiceError::NotLoaded)?;

    Ok(ClassificationView {
        company_id,
        rubric_version: outcome.rubric_version,
        state: session.state().label(),
        total_score: outcome.total_score,
        maximum_score: outcome.maximum_score,
        category: outcome.category,
        badge: CategoryBadge::from(outcome.category),
        components: outcome.components,
        seeded: report.seeded,
    })
}

/// Error raised by the classification service.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationServiceError {
    #[error("evaluation session has not been loaded")]
    NotLoaded,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Evaluation(EvaluationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<EvaluationError> for ClassificationServiceError {
    fn from(value: EvaluationError) -> Self {
        match value {
            EvaluationError::Catalog(err) => Self::Catalog(err),
            other => Self::Evaluation(other),
        }
    }
}

impl From<SessionError> for ClassificationServiceError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::NotLoaded => Self::NotLoaded,
            SessionError::Catalog(err) => Self::Catalog(err),
            SessionError::Evaluation(err) => err.into(),
            SessionError::Persistence(err) => Self::Persistence(err),
        }
    }
}
