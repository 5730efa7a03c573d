mod policy;
mod resolver;
mod rules;

pub use policy::{Category, EXPORTADORA_THRESHOLD, POTENCIAL_EXPORTADORA_THRESHOLD};
pub(crate) use policy::tier;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogError, CriterionCatalog};
use super::domain::{Criterion, CriterionId, SelectionMap};

/// Stateless evaluator applying the rubric catalog to a company's selections.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    catalog: Arc<CriterionCatalog>,
}

impl EvaluationEngine {
    pub fn new(catalog: Arc<CriterionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(CriterionCatalog::standard()))
    }

    pub fn catalog(&self) -> &CriterionCatalog {
        &self.catalog
    }

    pub fn list_criteria(&self) -> &[Criterion] {
        self.catalog.list_criteria()
    }

    pub fn score_for(&self, criterion: CriterionId, label: &str) -> Result<u8, CatalogError> {
        resolver::score_for(&self.catalog, criterion, label)
    }

    /// Same as [`score_for`](Self::score_for) for callers holding a raw criterion key.
    pub fn score_for_key(&self, criterion: &str, label: &str) -> Result<u8, CatalogError> {
        resolver::score_for_key(&self.catalog, criterion, label)
    }

    pub fn total_score(&self, selections: &SelectionMap) -> Result<u16, EvaluationError> {
        let components = rules::score_selections(&self.catalog, selections)?;
        Ok(rules::total_of(&components))
    }

    pub fn maximum_possible_score(&self) -> u16 {
        self.catalog.maximum_possible_score()
    }

    pub fn category_for(&self, total_score: i32) -> Result<Category, EvaluationError> {
        policy::category_for(total_score, self.maximum_possible_score())
    }

    pub fn evaluate(&self, selections: &SelectionMap) -> Result<EvaluationOutcome, EvaluationError> {
        let components = rules::score_selections(&self.catalog, selections)?;
        self.outcome_from(components)
    }

    pub(crate) fn outcome_from(
        &self,
        components: Vec<ScoreComponent>,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let total_score = rules::total_of(&components);
        let category = self.category_for(i32::from(total_score))?;

        Ok(EvaluationOutcome {
            rubric_version: self.catalog.version().to_string(),
            total_score,
            maximum_score: self.maximum_possible_score(),
            category,
            components,
        })
    }
}

/// Contribution of one criterion to the total, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: CriterionId,
    pub option: String,
    pub score: u8,
    pub maximum: u8,
}

/// Evaluation output describing the composite score and its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub rubric_version: String,
    pub total_score: u16,
    pub maximum_score: u16,
    pub category: Category,
    pub components: Vec<ScoreComponent>,
}

/// Completeness and range failures raised while scoring a selection mapping.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("evaluation is incomplete, missing criteria: {}", join_ids(.missing))]
    Incomplete { missing: Vec<CriterionId> },
    #[error("selections reference criteria outside the rubric: {}", join_keys(.unexpected))]
    UnexpectedCriterion { unexpected: Vec<String> },
    #[error("score {score} is outside the rubric range 0..={maximum}")]
    InvalidScore { score: i32, maximum: u16 },
}

fn join_keys(keys: &[String]) -> String {
    keys.join(", ")
}

fn join_ids(ids: &[CriterionId]) -> String {
    ids.iter()
        .map(|id| id.key())
        .collect::<Vec<_>>()
        .join(", ")
}
