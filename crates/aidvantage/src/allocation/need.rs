use super::config::AllocationConfig;
use super::priority::PriorityBreakdown;
use crate::domain::{AqiCategory, CountyRecord, DisasterTag, ResourceRecord};
use serde::Serialize;

/// Rule that classified a resource as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedTrigger {
    ExtremeHeat,
    AirQuality,
    GeneralEmergency,
    PowerOutage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeedAssessment {
    pub trigger: NeedTrigger,
    /// Urgency multiplier in [0, 1].
    pub intensity: f64,
}

/// Applies the heat, air quality, general emergency, and power outage rules
/// in that order; when several match, the last one sets the intensity.
pub(crate) fn assess_need(
    county: &CountyRecord,
    priority: &PriorityBreakdown,
    resource: &ResourceRecord,
    config: &AllocationConfig,
) -> Option<NeedAssessment> {
    let mut assessment = None;

    if resource.has_tag(&DisasterTag::ExtremeHeat)
        && (county.risk_score >= config.heat_risk_threshold
            || county.rolling_avg_ta_max >= config.heat_rolling_max_threshold)
    {
        assessment = Some(NeedAssessment {
            trigger: NeedTrigger::ExtremeHeat,
            intensity: (county.risk_score / 100.0).min(1.0),
        });
    }

    if resource.has_tag(&DisasterTag::AirQuality) && county.aqi_category.is_unhealthy() {
        let intensity = match county.aqi_category {
            AqiCategory::VeryUnhealthy => 1.0,
            AqiCategory::Unhealthy => 0.8,
            _ => 0.6,
        };
        assessment = Some(NeedAssessment {
            trigger: NeedTrigger::AirQuality,
            intensity,
        });
    }

    if resource.has_tag(&DisasterTag::GeneralEmergency) {
        assessment = Some(NeedAssessment {
            trigger: NeedTrigger::GeneralEmergency,
            intensity: priority.priority_score,
        });
    }

    if resource.has_tag(&DisasterTag::PowerOutage)
        && county.ta_max >= config.power_outage_ta_max_threshold
    {
        let intensity =
            ((county.ta_max - config.power_outage_baseline) / config.power_outage_span).min(1.0);
        assessment = Some(NeedAssessment {
            trigger: NeedTrigger::PowerOutage,
            intensity,
        });
    }

    assessment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::priority::score_county;
    use crate::data::fixtures;

    fn resource_with(tags: Vec<DisasterTag>) -> ResourceRecord {
        let mut resource = fixtures::resources().remove(0);
        resource.disaster_tags = tags;
        resource
    }

    #[test]
    fn power_outage_overrides_heat_intensity() {
        let config = AllocationConfig::default();
        let maricopa = &fixtures::counties()[1];
        let priority = score_county(maricopa, &config);
        let cooling = &fixtures::resources()[0];

        let need = assess_need(maricopa, &priority, cooling, &config).expect("needed");
        assert_eq!(need.trigger, NeedTrigger::PowerOutage);
        assert!((need.intensity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn good_air_does_not_need_air_quality_resources() {
        let config = AllocationConfig::default();
        let cook = &fixtures::counties()[4];
        let priority = score_county(cook, &config);
        let monitors = resource_with(vec![DisasterTag::AirQuality]);

        assert!(assess_need(cook, &priority, &monitors, &config).is_none());
    }

    #[test]
    fn air_quality_intensity_tracks_category() {
        let config = AllocationConfig::default();
        let mut county = fixtures::counties()[2].clone();
        let priority = score_county(&county, &config);
        let masks = resource_with(vec![DisasterTag::AirQuality]);

        let unhealthy = assess_need(&county, &priority, &masks, &config).expect("needed");
        assert!((unhealthy.intensity - 0.8).abs() < f64::EPSILON);

        county.aqi_category = AqiCategory::VeryUnhealthy;
        let very = assess_need(&county, &priority, &masks, &config).expect("needed");
        assert!((very.intensity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn general_emergency_always_applies_with_priority_intensity() {
        let config = AllocationConfig::default();
        let cook = &fixtures::counties()[4];
        let priority = score_county(cook, &config);
        let kits = resource_with(vec![DisasterTag::GeneralEmergency]);

        let need = assess_need(cook, &priority, &kits, &config).expect("always needed");
        assert_eq!(need.trigger, NeedTrigger::GeneralEmergency);
        assert!((need.intensity - priority.priority_score).abs() < f64::EPSILON);
    }

    #[test]
    fn unruled_tags_never_trigger_need() {
        let config = AllocationConfig::default();
        let harris = &fixtures::counties()[2];
        let priority = score_county(harris, &config);
        let sandbags = resource_with(vec![
            DisasterTag::Wildfire,
            DisasterTag::Drought,
            DisasterTag::Other("flood".to_string()),
        ]);

        assert!(assess_need(harris, &priority, &sandbags, &config).is_none());
    }

    #[test]
    fn heat_rule_uses_rolling_max_when_risk_is_low() {
        let config = AllocationConfig::default();
        let mut county = fixtures::counties()[4].clone();
        county.risk_score = 40.0;
        county.rolling_avg_ta_max = 88.0;
        let priority = score_county(&county, &config);
        let fans = resource_with(vec![DisasterTag::ExtremeHeat]);

        let need = assess_need(&county, &priority, &fans, &config).expect("heat need");
        assert_eq!(need.trigger, NeedTrigger::ExtremeHeat);
        assert!((need.intensity - 0.4).abs() < 1e-12);
    }
}
