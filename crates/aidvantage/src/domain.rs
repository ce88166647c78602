//! County risk profiles and relief stockpiles consumed by the allocation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl fmt::Display for CountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// EPA air-quality index bands reported for a county.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    #[serde(alias = "good")]
    Good,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(
        rename = "Unhealthy for Sensitive Groups",
        alias = "unhealthy_for_sensitive_groups"
    )]
    UnhealthyForSensitiveGroups,
    #[serde(alias = "unhealthy")]
    Unhealthy,
    #[serde(rename = "Very Unhealthy", alias = "very_unhealthy")]
    VeryUnhealthy,
}

impl AqiCategory {
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
        }
    }

    /// Categories at or above "Unhealthy for Sensitive Groups".
    pub fn is_unhealthy(self) -> bool {
        matches!(
            self,
            AqiCategory::UnhealthyForSensitiveGroups
                | AqiCategory::Unhealthy
                | AqiCategory::VeryUnhealthy
        )
    }
}

/// Hazard a resource is stocked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisasterTag {
    ExtremeHeat,
    AirQuality,
    PowerOutage,
    GeneralEmergency,
    Wildfire,
    Drought,
    Other(String),
}

impl DisasterTag {
    pub fn as_str(&self) -> &str {
        match self {
            DisasterTag::ExtremeHeat => "extreme_heat",
            DisasterTag::AirQuality => "air_quality",
            DisasterTag::PowerOutage => "power_outage",
            DisasterTag::GeneralEmergency => "general_emergency",
            DisasterTag::Wildfire => "wildfire",
            DisasterTag::Drought => "drought",
            DisasterTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for DisasterTag {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "extreme_heat" => DisasterTag::ExtremeHeat,
            "air_quality" => DisasterTag::AirQuality,
            "power_outage" => DisasterTag::PowerOutage,
            "general_emergency" => DisasterTag::GeneralEmergency,
            "wildfire" => DisasterTag::Wildfire,
            "drought" => DisasterTag::Drought,
            _ => DisasterTag::Other(normalized),
        }
    }
}

impl From<String> for DisasterTag {
    fn from(value: String) -> Self {
        DisasterTag::from(value.as_str())
    }
}

impl From<DisasterTag> for String {
    fn from(value: DisasterTag) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DisasterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A jurisdiction's risk profile. Temperatures are °F, rates are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRecord {
    pub id: CountyId,
    pub name: String,
    pub ta_min: f64,
    pub ta_avg: f64,
    pub ta_max: f64,
    pub aqi_category: AqiCategory,
    pub risk_score: f64,
    pub unemployment_pct: f64,
    pub no_hsdp_pct: f64,
    pub minority_pct: f64,
    pub age65_pct: f64,
    pub population: u64,
    pub area_sq_mi: f64,
    pub rolling_avg_ta_max: f64,
}

impl CountyRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.0.trim().is_empty() {
            return Err(RecordError::MissingIdentifier);
        }

        for (field, value) in [
            ("ta_min", self.ta_min),
            ("ta_avg", self.ta_avg),
            ("ta_max", self.ta_max),
            ("rolling_avg_ta_max", self.rolling_avg_ta_max),
        ] {
            if !value.is_finite() {
                return Err(RecordError::NonFinite { field });
            }
        }

        for (field, value) in [
            ("risk_score", self.risk_score),
            ("unemployment_pct", self.unemployment_pct),
            ("no_hsdp_pct", self.no_hsdp_pct),
            ("minority_pct", self.minority_pct),
            ("age65_pct", self.age65_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RecordError::OutOfRange { field, value });
            }
        }

        if self.population == 0 {
            return Err(RecordError::NonPositivePopulation);
        }

        if !self.area_sq_mi.is_finite() || self.area_sq_mi <= 0.0 {
            return Err(RecordError::NonPositiveArea(self.area_sq_mi));
        }

        Ok(())
    }

    pub fn density_per_sq_mi(&self) -> f64 {
        self.population as f64 / self.area_sq_mi
    }
}

/// A stockpile of one relief good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub available_qty: u64,
    pub disaster_tags: Vec<DisasterTag>,
}

impl ResourceRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.0.trim().is_empty() {
            return Err(RecordError::MissingIdentifier);
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: &DisasterTag) -> bool {
        self.disaster_tags.contains(tag)
    }
}

/// Invariant violations detected on a single record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("record identifier is empty")]
    MissingIdentifier,
    #[error("population must be positive")]
    NonPositivePopulation,
    #[error("land area must be positive, got {0}")]
    NonPositiveArea(f64),
    #[error("{field} must lie in [0, 100], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn builtin_counties_pass_validation() {
        for county in fixtures::counties() {
            county.validate().expect("fixture county is valid");
        }
    }

    #[test]
    fn zero_area_is_rejected() {
        let mut county = fixtures::counties().remove(0);
        county.area_sq_mi = 0.0;
        assert_eq!(county.validate(), Err(RecordError::NonPositiveArea(0.0)));
    }

    #[test]
    fn risk_score_above_hundred_is_rejected() {
        let mut county = fixtures::counties().remove(1);
        county.risk_score = 100.5;
        match county.validate() {
            Err(RecordError::OutOfRange { field, .. }) => assert_eq!(field, "risk_score"),
            other => panic!("expected out of range error, got {other:?}"),
        }
    }

    #[test]
    fn zero_population_is_rejected() {
        let mut county = fixtures::counties().remove(2);
        county.population = 0;
        assert_eq!(county.validate(), Err(RecordError::NonPositivePopulation));
    }

    #[test]
    fn disaster_tags_normalize_and_keep_unknown_values() {
        assert_eq!(DisasterTag::from("Extreme Heat"), DisasterTag::ExtremeHeat);
        assert_eq!(DisasterTag::from(" power-outage "), DisasterTag::PowerOutage);
        assert_eq!(
            DisasterTag::from("Flood"),
            DisasterTag::Other("flood".to_string())
        );
        let json = serde_json::to_string(&DisasterTag::AirQuality).expect("serialize tag");
        assert_eq!(json, "\"air_quality\"");
    }

    #[test]
    fn aqi_category_accepts_labels_and_snake_case() {
        let label: AqiCategory =
            serde_json::from_str("\"Unhealthy for Sensitive Groups\"").expect("label parses");
        let snake: AqiCategory =
            serde_json::from_str("\"very_unhealthy\"").expect("alias parses");
        assert_eq!(label, AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(snake, AqiCategory::VeryUnhealthy);
        assert!(label.is_unhealthy());
        assert!(!AqiCategory::Moderate.is_unhealthy());
    }
}
