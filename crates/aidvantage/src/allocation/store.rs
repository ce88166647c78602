use super::scenario::{ScenarioId, ScenarioReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser or operator session owning a scenario history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only scenario history, scoped per session. Reports are kept whole
/// so a fetched summary matches the one returned by the run.
pub trait ScenarioStore: Send + Sync {
    fn append(
        &self,
        session: &SessionId,
        report: ScenarioReport,
    ) -> Result<ScenarioReport, StoreError>;
    /// Oldest first.
    fn list(&self, session: &SessionId) -> Result<Vec<ScenarioReport>, StoreError>;
    fn fetch(
        &self,
        session: &SessionId,
        scenario_id: &ScenarioId,
    ) -> Result<Option<ScenarioReport>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("scenario already recorded")]
    Conflict,
    #[error("scenario not found")]
    NotFound,
    #[error("scenario store unavailable: {0}")]
    Unavailable(String),
}
