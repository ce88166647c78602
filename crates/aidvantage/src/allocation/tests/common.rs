use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::allocation::{
    Allocation, AllocationConfig, AllocationEngine, AllocationService, ScenarioId, ScenarioReport,
    ScenarioStore, SessionId, StoreError,
};
use crate::data::Dataset;

#[derive(Default)]
pub(super) struct MemoryStore {
    sessions: Mutex<HashMap<SessionId, Vec<ScenarioReport>>>,
}

impl ScenarioStore for MemoryStore {
    fn append(
        &self,
        session: &SessionId,
        report: ScenarioReport,
    ) -> Result<ScenarioReport, StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        let history = guard.entry(session.clone()).or_default();
        if history
            .iter()
            .any(|existing| existing.scenario.id == report.scenario.id)
        {
            return Err(StoreError::Conflict);
        }
        history.push(report.clone());
        Ok(report)
    }

    fn list(&self, session: &SessionId) -> Result<Vec<ScenarioReport>, StoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(session).cloned().unwrap_or_default())
    }

    fn fetch(
        &self,
        session: &SessionId,
        scenario_id: &ScenarioId,
    ) -> Result<Option<ScenarioReport>, StoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(session).and_then(|history| {
            history
                .iter()
                .find(|r| &r.scenario.id == scenario_id)
                .cloned()
        }))
    }
}

pub(super) struct UnavailableStore;

impl ScenarioStore for UnavailableStore {
    fn append(
        &self,
        _session: &SessionId,
        _report: ScenarioReport,
    ) -> Result<ScenarioReport, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _session: &SessionId) -> Result<Vec<ScenarioReport>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _session: &SessionId,
        _scenario_id: &ScenarioId,
    ) -> Result<Option<ScenarioReport>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn engine() -> AllocationEngine {
    AllocationEngine::new(AllocationConfig::default())
}

pub(super) fn session(name: &str) -> SessionId {
    SessionId(name.to_string())
}

pub(super) fn build_service() -> (Arc<AllocationService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(AllocationService::new(
        store.clone(),
        Dataset::builtin(),
        AllocationConfig::default(),
    ));
    (service, store)
}

pub(super) fn invalid_dataset() -> Dataset {
    let mut dataset = Dataset::builtin();
    dataset.counties[0].area_sq_mi = 0.0;
    dataset
}

pub(super) fn allocated_for(allocations: &[Allocation], county: &str, resource: &str) -> Option<u64> {
    allocations
        .iter()
        .find(|a| a.county_id.0 == county && a.resource_id.0 == resource)
        .map(|a| a.allocated_quantity)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
