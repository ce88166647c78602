use aidvantage::alerts::{AlertFeed, AlertFeedError, AlertId, PredictiveAlert};
use aidvantage::allocation::{ScenarioId, ScenarioReport, ScenarioStore, SessionId, StoreError};
use aidvantage::data::Dataset;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: Arc<Dataset>,
    pub(crate) alerts: Arc<InMemoryAlertFeed>,
}

/// Scenario history kept per browser session for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScenarioStore {
    sessions: Arc<Mutex<HashMap<SessionId, Vec<ScenarioReport>>>>,
}

impl ScenarioStore for InMemoryScenarioStore {
    fn append(
        &self,
        session: &SessionId,
        report: ScenarioReport,
    ) -> Result<ScenarioReport, StoreError> {
        let mut guard = self.sessions.lock().expect("scenario store mutex poisoned");
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
        let guard = self.sessions.lock().expect("scenario store mutex poisoned");
        Ok(guard.get(session).cloned().unwrap_or_default())
    }

    fn fetch(
        &self,
        session: &SessionId,
        scenario_id: &ScenarioId,
    ) -> Result<Option<ScenarioReport>, StoreError> {
        let guard = self.sessions.lock().expect("scenario store mutex poisoned");
        Ok(guard
            .get(session)
            .and_then(|history| {
                history
                    .iter()
                    .find(|report| &report.scenario.id == scenario_id)
            })
            .cloned())
    }
}

/// Alert list per session, started from a copy of the seed alerts on first use.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertFeed {
    seed: Arc<Vec<PredictiveAlert>>,
    sessions: Arc<Mutex<HashMap<SessionId, Vec<PredictiveAlert>>>>,
}

impl InMemoryAlertFeed {
    pub(crate) fn seeded(seed: Vec<PredictiveAlert>) -> Self {
        Self {
            seed: Arc::new(seed),
            sessions: Arc::default(),
        }
    }
}

impl AlertFeed for InMemoryAlertFeed {
    fn list(&self, session: &SessionId) -> Result<Vec<PredictiveAlert>, AlertFeedError> {
        let guard = self.sessions.lock().expect("alert feed mutex poisoned");
        Ok(guard
            .get(session)
            .cloned()
            .unwrap_or_else(|| self.seed.as_ref().clone()))
    }

    fn extend(
        &self,
        session: &SessionId,
        alerts: Vec<PredictiveAlert>,
    ) -> Result<(), AlertFeedError> {
        let mut guard = self.sessions.lock().expect("alert feed mutex poisoned");
        guard
            .entry(session.clone())
            .or_insert_with(|| self.seed.as_ref().clone())
            .extend(alerts);
        Ok(())
    }

    fn acknowledge(
        &self,
        session: &SessionId,
        alert_id: &AlertId,
    ) -> Result<PredictiveAlert, AlertFeedError> {
        let mut guard = self.sessions.lock().expect("alert feed mutex poisoned");
        let alerts = guard
            .entry(session.clone())
            .or_insert_with(|| self.seed.as_ref().clone());
        let position = alerts
            .iter()
            .position(|alert| &alert.id == alert_id)
            .ok_or(AlertFeedError::NotFound)?;
        Ok(alerts.remove(position))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidvantage::data::fixtures;

    #[test]
    fn sessions_do_not_share_history() {
        let store = InMemoryScenarioStore::default();
        let alpha = SessionId("alpha".to_string());
        let beta = SessionId("beta".to_string());
        let scenario = fixtures::seed_scenario();
        let report = ScenarioReport {
            summary: scenario.summary(&fixtures::counties(), &fixtures::resources()),
            scenario: scenario.clone(),
        };

        store.append(&alpha, report.clone()).expect("first append");
        assert!(matches!(
            store.append(&alpha, report.clone()),
            Err(StoreError::Conflict)
        ));
        store.append(&beta, report).expect("other session");

        assert_eq!(store.list(&alpha).expect("list").len(), 1);
        assert!(store
            .fetch(&beta, &scenario.id)
            .expect("fetch")
            .is_some());
        assert!(store
            .list(&SessionId("gamma".to_string()))
            .expect("list")
            .is_empty());
    }

    #[test]
    fn alert_feed_starts_from_seed_and_forgets_acknowledged() {
        let feed = InMemoryAlertFeed::seeded(fixtures::alerts());
        let ops = SessionId("ops".to_string());
        let other = SessionId("other".to_string());

        assert_eq!(feed.list(&ops).expect("list").len(), 3);
        let acknowledged = feed
            .acknowledge(&ops, &AlertId("1".to_string()))
            .expect("seeded alert exists");
        assert_eq!(acknowledged.county_id.0, "2");
        assert!(matches!(
            feed.acknowledge(&ops, &AlertId("1".to_string())),
            Err(AlertFeedError::NotFound)
        ));

        let mut predicted = fixtures::alerts().remove(1);
        predicted.id = AlertId("alert-000900".to_string());
        feed.extend(&ops, vec![predicted]).expect("extend");

        let ids: Vec<String> = feed
            .list(&ops)
            .expect("list")
            .into_iter()
            .map(|alert| alert.id.0)
            .collect();
        assert_eq!(ids, vec!["2", "3", "alert-000900"]);
        assert_eq!(feed.list(&other).expect("list").len(), 3);
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-07-04 "),
            Ok(NaiveDate::from_ymd_opt(2025, 7, 4).expect("valid date"))
        );
        assert!(parse_date("07/04/2025").is_err());
    }
}
