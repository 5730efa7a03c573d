use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::classification::catalog::CriterionCatalog;
use crate::classification::domain::{CompanyId, Criterion, CriterionId, ScoreOption, SelectionMap};
use crate::classification::evaluation::EvaluationEngine;
use crate::classification::repository::{PersistenceError, SelectionStore};
use crate::classification::service::ClassificationService;
use crate::classification::session::EvaluationSession;
use crate::classification::{classification_router, STANDARD_RUBRIC_VERSION};

pub(super) fn company() -> CompanyId {
    CompanyId("cuit-30-71234567-9".to_string())
}

pub(super) fn engine() -> Arc<EvaluationEngine> {
    Arc::new(EvaluationEngine::standard())
}

pub(super) fn session() -> EvaluationSession {
    EvaluationSession::new(engine())
}

pub(super) fn selection_map(pairs: &[(&str, &str)]) -> SelectionMap {
    pairs
        .iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect()
}

/// Scores 3,1,2,1,0,1,1,2,2 in catalog order for a total of 13.
pub(super) fn exporter_selections() -> SelectionMap {
    selection_map(&[
        ("experiencia-exportadora", "Regular"),
        ("capacidad-productiva", "Baja"),
        ("certificaciones", "Sí"),
        ("sitio-web-multilingue", "Sí"),
        ("mercados-destino", "Ninguno"),
        ("personal-comercio-exterior", "Parcial"),
        ("participacion-ferias", "Sí"),
        ("registro-exportador", "Sí"),
        ("estudio-mercado", "Completa"),
    ])
}

pub(super) fn baseline_selections() -> SelectionMap {
    selection_map(&[
        ("experiencia-exportadora", "No"),
        ("capacidad-productiva", "Insuficiente"),
        ("certificaciones", "Ninguna"),
        ("sitio-web-multilingue", "No"),
        ("mercados-destino", "Ninguno"),
        ("personal-comercio-exterior", "No"),
        ("participacion-ferias", "No"),
        ("registro-exportador", "No"),
        ("estudio-mercado", "Desconocida"),
    ])
}

/// Standard criteria with one criterion's options replaced.
pub(super) fn criteria_with(id: CriterionId, options: Vec<ScoreOption>) -> Vec<Criterion> {
    CriterionCatalog::standard()
        .list_criteria()
        .iter()
        .cloned()
        .map(|mut criterion| {
            if criterion.id == id {
                criterion.maximum_score = options.iter().map(|o| o.score).max().unwrap_or(0);
                criterion.options = options.clone();
            }
            criterion
        })
        .collect()
}

pub(super) fn custom_engine(criteria: Vec<Criterion>) -> Arc<EvaluationEngine> {
    let catalog = CriterionCatalog::new(STANDARD_RUBRIC_VERSION, criteria).expect("valid rubric");
    Arc::new(EvaluationEngine::new(Arc::new(catalog)))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<CompanyId, SelectionMap>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(super) fn with(company_id: CompanyId, selections: SelectionMap) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .expect("store mutex poisoned")
            .insert(company_id, selections);
        store
    }

    pub(super) fn stored(&self, company_id: &CompanyId) -> Option<SelectionMap> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(company_id)
            .cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl SelectionStore for MemoryStore {
    async fn fetch_company_selections(
        &self,
        company_id: &CompanyId,
    ) -> Result<Option<SelectionMap>, PersistenceError> {
        Ok(self.stored(company_id))
    }

    async fn save_company_selections(
        &self,
        company_id: &CompanyId,
        selections: &SelectionMap,
    ) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(company_id.clone(), selections.clone());
        *self.saves.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl SelectionStore for UnavailableStore {
    async fn fetch_company_selections(
        &self,
        _company_id: &CompanyId,
    ) -> Result<Option<SelectionMap>, PersistenceError> {
        Err(PersistenceError::Unavailable("api offline".to_string()))
    }

    async fn save_company_selections(
        &self,
        _company_id: &CompanyId,
        _selections: &SelectionMap,
    ) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("api offline".to_string()))
    }
}

/// Reads succeed (nothing stored) but every write is refused.
pub(super) struct ReadOnlyStore;

#[async_trait]
impl SelectionStore for ReadOnlyStore {
    async fn fetch_company_selections(
        &self,
        _company_id: &CompanyId,
    ) -> Result<Option<SelectionMap>, PersistenceError> {
        Ok(None)
    }

    async fn save_company_selections(
        &self,
        _company_id: &CompanyId,
        _selections: &SelectionMap,
    ) -> Result<(), PersistenceError> {
        Err(PersistenceError::Rejected("read only".to_string()))
    }
}

/// Never resolves a save, for exercising dropped commits.
pub(super) struct StalledStore;

#[async_trait]
impl SelectionStore for StalledStore {
    async fn fetch_company_selections(
        &self,
        _company_id: &CompanyId,
    ) -> Result<Option<SelectionMap>, PersistenceError> {
        Ok(None)
    }

    async fn save_company_selections(
        &self,
        _company_id: &CompanyId,
        _selections: &SelectionMap,
    ) -> Result<(), PersistenceError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

pub(super) fn build_service<S: SelectionStore + 'static>(store: Arc<S>) -> ClassificationService<S> {
    ClassificationService::new(store, Arc::new(CriterionCatalog::standard()))
}

pub(super) fn router_with_store<S: SelectionStore + 'static>(store: Arc<S>) -> axum::Router {
    classification_router(Arc::new(build_service(store)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
