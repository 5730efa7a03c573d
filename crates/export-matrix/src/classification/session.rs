use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::CatalogError;
use super::domain::{CompanyId, CriterionId, Selection, SelectionMap};
use super::evaluation::{
    tier, Category, EvaluationEngine, EvaluationError, EvaluationOutcome, ScoreComponent,
};
use super::repository::{PersistenceError, SelectionStore};

/// Lifecycle of one company's working evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Loaded,
    Dirty,
    Saved,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Loaded => "loaded",
            SessionState::Dirty => "dirty",
            SessionState::Saved => "saved",
        }
    }
}

/// Criteria that `load` filled with their baseline option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub seeded: Vec<CriterionId>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.seeded.is_empty()
    }
}

/// Result of a successful `set_selection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Updated { previous: String },
    Unchanged,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("evaluation session has not been loaded")]
    NotLoaded,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Mutable working state of one company's classification matrix.
///
/// A session holds a selection for every catalog criterion once loaded. Totals and the
/// category are derived from the selections on every read, so they always reflect the
/// last successful `set_selection`. One writer per session is assumed; callers sharing a
/// session across tasks must serialize access themselves.
#[derive(Debug, Clone)]
pub struct EvaluationSession {
    engine: Arc<EvaluationEngine>,
    company_id: Option<CompanyId>,
    selections: BTreeMap<CriterionId, Selection>,
    state: SessionState,
    last_saved_at: Option<DateTime<Utc>>,
}

impl EvaluationSession {
    pub fn new(engine: Arc<EvaluationEngine>) -> Self {
        Self {
            engine,
            company_id: None,
            selections: BTreeMap::new(),
            state: SessionState::Uninitialized,
            last_saved_at: None,
        }
    }

    /// Replaces the working state with `prior`, seeding absent criteria from their baseline.
    ///
    /// Nothing is modified when the prior mapping is rejected.
    pub fn load(
        &mut self,
        company_id: CompanyId,
        prior: Option<&SelectionMap>,
    ) -> Result<LoadReport, SessionError> {
        let empty = SelectionMap::new();
        let prior = prior.unwrap_or(&empty);
        let catalog = self.engine.catalog();

        let unexpected: Vec<String> = prior
            .keys()
            .filter(|key| {
                key.parse::<CriterionId>()
                    .map(|id| !catalog.contains(id))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            warn!(
                company = %company_id,
                unexpected = ?unexpected,
                "prior selections reference criteria outside the rubric"
            );
            return Err(EvaluationError::UnexpectedCriterion { unexpected }.into());
        }

        let mut selections = BTreeMap::new();
        let mut report = LoadReport::default();
        for criterion in catalog.list_criteria() {
            let selection = match prior.get(criterion.id.key()) {
                Some(label) => Selection {
                    criterion: criterion.id,
                    option: label.clone(),
                    score: self.engine.score_for(criterion.id, label)?,
                },
                None => {
                    let baseline = catalog.baseline_for(criterion.id)?;
                    report.seeded.push(criterion.id);
                    Selection {
                        criterion: criterion.id,
                        option: baseline.label.clone(),
                        score: baseline.score,
                    }
                }
            };
            selections.insert(criterion.id, selection);
        }

        if !report.seeded.is_empty() {
            info!(
                company = %company_id,
                seeded = ?report.seeded,
                "seeded missing criteria with baseline options"
            );
        }

        self.company_id = Some(company_id);
        self.selections = selections;
        self.state = SessionState::Loaded;
        self.last_saved_at = None;

        Ok(report)
    }

    pub fn set_selection(
        &mut self,
        criterion: CriterionId,
        label: &str,
    ) -> Result<SelectionChange, SessionError> {
        if self.company_id.is_none() {
            return Err(SessionError::NotLoaded);
        }

        let score = self.engine.score_for(criterion, label)?;
        let current = self
            .selections
            .get_mut(&criterion)
            .ok_or_else(|| CatalogError::NotFound(criterion.key().to_string()))?;

        if current.option == label {
            return Ok(SelectionChange::Unchanged);
        }

        let previous = std::mem::replace(&mut current.option, label.to_string());
        current.score = score;
        self.state = SessionState::Dirty;

        debug!(
            criterion = %criterion,
            previous = %previous,
            selected = %label,
            "selection updated"
        );

        Ok(SelectionChange::Updated { previous })
    }

    /// Variant of [`set_selection`](Self::set_selection) for raw criterion keys from the UI.
    pub fn set_selection_key(
        &mut self,
        criterion: &str,
        label: &str,
    ) -> Result<SelectionChange, SessionError> {
        let id: CriterionId = criterion
            .parse()
            .map_err(|_| CatalogError::UnknownCriterion(criterion.to_string()))?;
        self.set_selection(id, label)
    }

    /// Hands the full mapping to `store`. The session only becomes `Saved` once the store
    /// confirms; dropping the future early leaves it untouched.
    pub async fn commit<S>(&mut self, store: &S) -> Result<(), SessionError>
    where
        S: SelectionStore + ?Sized,
    {
        let company_id = self.company_id.clone().ok_or(SessionError::NotLoaded)?;
        let mapping = self.selection_map();

        if let Err(err) = store.save_company_selections(&company_id, &mapping).await {
            warn!(company = %company_id, error = %err, "failed to save selections");
            return Err(err.into());
        }

        self.state = SessionState::Saved;
        self.last_saved_at = Some(Utc::now());
        info!(
            company = %company_id,
            total_score = self.total(),
            "classification saved"
        );

        Ok(())
    }

    pub fn company_id(&self) -> Option<&CompanyId> {
        self.company_id.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn maximum_possible_score(&self) -> u16 {
        self.engine.maximum_possible_score()
    }

    pub fn current_total_score(&self) -> Result<u16, SessionError> {
        self.ensure_loaded()?;
        Ok(self.total())
    }

    pub fn current_category(&self) -> Result<Category, SessionError> {
        self.ensure_loaded()?;
        let total = self.total();
        debug_assert!(total <= self.maximum_possible_score());
        Ok(tier(total))
    }

    /// Current selections in catalog order.
    pub fn selections(&self) -> Vec<&Selection> {
        self.engine
            .list_criteria()
            .iter()
            .filter_map(|criterion| self.selections.get(&criterion.id))
            .collect()
    }

    pub fn selection(&self, criterion: CriterionId) -> Option<&Selection> {
        self.selections.get(&criterion)
    }

    pub fn selection_map(&self) -> SelectionMap {
        self.selections
            .values()
            .map(|selection| (selection.criterion.key().to_string(), selection.option.clone()))
            .collect()
    }

    pub fn outcome(&self) -> Result<EvaluationOutcome, SessionError> {
        self.ensure_loaded()?;
        let components = self
            .engine
            .list_criteria()
            .iter()
            .filter_map(|criterion| {
                self.selections
                    .get(&criterion.id)
                    .map(|selection| ScoreComponent {
                        criterion: criterion.id,
                        option: selection.option.clone(),
                        score: selection.score,
                        maximum: criterion.maximum_score,
                    })
            })
            .collect();
        Ok(self.engine.outcome_from(components)?)
    }

    fn ensure_loaded(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Uninitialized => Err(SessionError::NotLoaded),
            _ => Ok(()),
        }
    }

    fn total(&self) -> u16 {
        self.selections
            .values()
            .map(|selection| u16::from(selection.score))
            .sum()
    }
}
