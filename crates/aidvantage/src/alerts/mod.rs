//! Predictive hazard alerts and the outbound drafts sent for them.

mod drafting;
mod feed;
mod predictor;

pub use drafting::{AlertDraft, DraftChannel, RevealFrames};
pub use feed::{AlertFeed, AlertFeedError, DashboardOverview};
pub use predictor::AlertPredictor;

use crate::domain::CountyId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ExtremeHeat,
    AirQuality,
    ResourceGap,
}

impl AlertType {
    pub fn label(self) -> &'static str {
        match self {
            AlertType::ExtremeHeat => "extreme heat",
            AlertType::AirQuality => "air quality",
            AlertType::ResourceGap => "resource gap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveAlert {
    pub id: AlertId,
    pub county_id: CountyId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub predicted_date: NaiveDate,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub message: String,
    pub recommendations: Vec<String>,
}

impl PredictiveAlert {
    /// High and critical alerts are surfaced as active.
    pub fn is_active(&self) -> bool {
        self.severity >= AlertSeverity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn only_high_and_critical_alerts_are_active() {
        let active: Vec<String> = fixtures::alerts()
            .into_iter()
            .filter(PredictiveAlert::is_active)
            .map(|alert| alert.id.0)
            .collect();
        assert_eq!(active, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn alert_serializes_with_snake_case_enums() {
        let alert = fixtures::alerts().remove(2);
        let value = serde_json::to_value(&alert).expect("serialize alert");
        assert_eq!(value["alert_type"], "resource_gap");
        assert_eq!(value["severity"], "medium");
        assert_eq!(value["predicted_date"], "2024-09-25");
    }
}
