use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::AllocationConfig;
use super::engine::{AllocationEngine, AllocationError};
use super::scenario::{Scenario, ScenarioId, ScenarioReport, ScenarioStamp};
use super::store::{ScenarioStore, SessionId, StoreError};
use crate::data::{parse_inventory, Dataset};

/// Optional knobs for a single optimization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    /// Label overriding the generated "Optimization Run HH:MM:SS".
    #[serde(default)]
    pub name: Option<String>,
    /// Pasted inventory lines appended to the base resources for this run.
    #[serde(default)]
    pub inventory: Option<String>,
}

/// Service composing the engine, the read-only dataset, and the session store.
pub struct AllocationService<S> {
    engine: Arc<AllocationEngine>,
    dataset: Arc<Dataset>,
    store: Arc<S>,
}

impl<S> AllocationService<S>
where
    S: ScenarioStore + 'static,
{
    pub fn new(store: Arc<S>, dataset: Dataset, config: AllocationConfig) -> Self {
        Self {
            engine: Arc::new(AllocationEngine::new(config)),
            dataset: Arc::new(dataset),
            store,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Runs the engine against the base dataset (plus any pasted inventory)
    /// and appends the resulting scenario to the session history.
    pub fn run(
        &self,
        session: &SessionId,
        request: RunRequest,
    ) -> Result<ScenarioReport, AllocationServiceError> {
        let RunRequest { name, inventory } = request;

        let extra = inventory.as_deref().map(parse_inventory).unwrap_or_default();
        let dataset = if extra.is_empty() {
            Arc::clone(&self.dataset)
        } else {
            Arc::new(self.dataset.with_extra_resources(extra))
        };

        let plan = self
            .engine
            .plan(&dataset.counties, &dataset.resources)
            .map_err(|err| {
                warn!(%session, error = %err, "allocation rejected input");
                err
            })?;

        let mut stamp = ScenarioStamp::now();
        if let Some(name) = name.filter(|name| !name.trim().is_empty()) {
            stamp = stamp.named(name);
        }
        let scenario = self.engine.stamp(plan, stamp);
        let summary = scenario.summary(&dataset.counties, &dataset.resources);

        info!(
            %session,
            scenario = %scenario.id,
            counties_served = scenario.counties_served,
            total_resources = scenario.total_resources,
            "allocation completed"
        );

        Ok(self
            .store
            .append(session, ScenarioReport { scenario, summary })?)
    }

    pub fn history(&self, session: &SessionId) -> Result<Vec<Scenario>, AllocationServiceError> {
        Ok(self
            .store
            .list(session)?
            .into_iter()
            .map(|report| report.scenario)
            .collect())
    }

    /// The stored report, summarised against the resources of its own run.
    pub fn get(
        &self,
        session: &SessionId,
        scenario_id: &ScenarioId,
    ) -> Result<ScenarioReport, AllocationServiceError> {
        Ok(self
            .store
            .fetch(session, scenario_id)?
            .ok_or(StoreError::NotFound)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
