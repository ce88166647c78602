use super::{AlertId, AlertSeverity, PredictiveAlert};
use crate::allocation::SessionId;
use crate::domain::{CountyRecord, ResourceRecord};
use serde::Serialize;

/// Live alert list per session. A session starts from the seeded alerts,
/// predictions are appended, and acknowledging an alert removes it.
pub trait AlertFeed: Send + Sync {
    fn list(&self, session: &SessionId) -> Result<Vec<PredictiveAlert>, AlertFeedError>;
    fn extend(
        &self,
        session: &SessionId,
        alerts: Vec<PredictiveAlert>,
    ) -> Result<(), AlertFeedError>;
    fn acknowledge(
        &self,
        session: &SessionId,
        alert_id: &AlertId,
    ) -> Result<PredictiveAlert, AlertFeedError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertFeedError {
    #[error("alert not found")]
    NotFound,
    #[error("alert feed unavailable: {0}")]
    Unavailable(String),
}

/// Headline figures for the operations dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    /// Sum of available quantity across every resource line.
    pub total_resources: u64,
    pub total_counties: usize,
    pub critical_alerts: usize,
    pub active_alerts: usize,
    /// Mean county risk score, 0 with no counties.
    pub average_risk_score: f64,
}

impl DashboardOverview {
    pub fn compute(
        counties: &[CountyRecord],
        resources: &[ResourceRecord],
        alerts: &[PredictiveAlert],
    ) -> Self {
        let average_risk_score = if counties.is_empty() {
            0.0
        } else {
            counties.iter().map(|county| county.risk_score).sum::<f64>() / counties.len() as f64
        };

        Self {
            total_resources: resources.iter().map(|resource| resource.available_qty).sum(),
            total_counties: counties.len(),
            critical_alerts: alerts
                .iter()
                .filter(|alert| alert.severity == AlertSeverity::Critical)
                .count(),
            active_alerts: alerts.iter().filter(|alert| alert.is_active()).count(),
            average_risk_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn overview_of_builtin_dataset() {
        let overview = DashboardOverview::compute(
            &fixtures::counties(),
            &fixtures::resources(),
            &fixtures::alerts(),
        );

        assert_eq!(overview.total_resources, 5950);
        assert_eq!(overview.total_counties, 5);
        assert_eq!(overview.critical_alerts, 1);
        assert_eq!(overview.active_alerts, 2);
        assert!((overview.average_risk_score - 80.22).abs() < 1e-9);
    }

    #[test]
    fn overview_without_counties_has_zero_average() {
        let overview = DashboardOverview::compute(&[], &fixtures::resources(), &[]);
        assert_eq!(overview.average_risk_score, 0.0);
        assert_eq!(overview.critical_alerts, 0);
    }
}
