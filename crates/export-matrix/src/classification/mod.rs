//! Export-readiness classification matrix.
//!
//! A fixed catalog of weighted criteria scores each company's selections. The total maps to
//! one of three maturity categories, which the dashboard renders as badges. Sessions hold a
//! company's working selections between loading them from, and saving them back to, the
//! remote selection store.

pub mod batch;
pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod presentation;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use batch::{BatchClassifier, BatchEntry, BatchImportError};
pub use catalog::{CatalogError, CriterionCatalog, STANDARD_RUBRIC_VERSION};
pub use domain::{
    CompanyId, Criterion, CriterionId, ScoreOption, Selection, SelectionMap, UnknownCriterionKey,
};
pub use evaluation::{
    Category, EvaluationEngine, EvaluationError, EvaluationOutcome, ScoreComponent,
    EXPORTADORA_THRESHOLD, POTENCIAL_EXPORTADORA_THRESHOLD,
};
pub use presentation::{
    color_for, label_for, text_color_for, CategoryBadge, ClassificationView,
};
pub use repository::{PersistenceError, SelectionStore};
pub use router::{classification_router, SelectionsPayload};
pub use service::{ClassificationService, ClassificationServiceError};
pub use session::{EvaluationSession, LoadReport, SelectionChange, SessionError, SessionState};
