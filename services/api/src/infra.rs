use async_trait::async_trait;
use export_matrix::classification::{
    CompanyId, PersistenceError, SelectionMap, SelectionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the registry API's selection endpoints.
#[derive(Default, Clone)]
pub(crate) struct InMemorySelectionStore {
    records: Arc<Mutex<HashMap<CompanyId, SelectionMap>>>,
}

impl InMemorySelectionStore {
    pub(crate) fn stored(&self, company_id: &CompanyId) -> Option<SelectionMap> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(company_id)
            .cloned()
    }
}

#[async_trait]
impl SelectionStore for InMemorySelectionStore {
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
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(company_id.clone(), selections.clone());
        Ok(())
    }
}

/// Parses `criterion=option` pairs given on the command line.
pub(crate) fn parse_selection(raw: &str) -> Result<(String, String), String> {
    let (key, label) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected criterion=option, got '{raw}'"))?;
    let key = key.trim();
    let label = label.trim();
    if key.is_empty() || label.is_empty() {
        return Err(format!("expected criterion=option, got '{raw}'"));
    }
    Ok((key.to_string(), label.to_string()))
}
