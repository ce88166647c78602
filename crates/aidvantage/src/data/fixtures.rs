//! Built-in mock dataset used when no CSV overrides are configured.

use crate::alerts::{AlertId, AlertSeverity, AlertType, PredictiveAlert};
use crate::allocation::{Allocation, Scenario, ScenarioId};
use crate::domain::{AqiCategory, CountyId, CountyRecord, DisasterTag, ResourceId, ResourceRecord};
use chrono::{NaiveDate, TimeZone, Utc};

pub fn counties() -> Vec<CountyRecord> {
    vec![
        CountyRecord {
            id: CountyId("1".to_string()),
            name: "Miami-Dade".to_string(),
            ta_min: 75.2,
            ta_avg: 82.3,
            ta_max: 89.4,
            aqi_category: AqiCategory::Moderate,
            risk_score: 78.5,
            unemployment_pct: 8.5,
            no_hsdp_pct: 15.2,
            minority_pct: 68.9,
            age65_pct: 18.7,
            population: 2_716_940,
            area_sq_mi: 1946.0,
            rolling_avg_ta_max: 91.2,
        },
        CountyRecord {
            id: CountyId("2".to_string()),
            name: "Maricopa".to_string(),
            ta_min: 68.5,
            ta_avg: 86.7,
            ta_max: 104.8,
            aqi_category: AqiCategory::UnhealthyForSensitiveGroups,
            risk_score: 92.1,
            unemployment_pct: 7.2,
            no_hsdp_pct: 12.8,
            minority_pct: 55.4,
            age65_pct: 15.3,
            population: 4_485_414,
            area_sq_mi: 9203.0,
            rolling_avg_ta_max: 107.3,
        },
        CountyRecord {
            id: CountyId("3".to_string()),
            name: "Harris".to_string(),
            ta_min: 72.1,
            ta_avg: 83.9,
            ta_max: 95.6,
            aqi_category: AqiCategory::Unhealthy,
            risk_score: 88.3,
            unemployment_pct: 6.8,
            no_hsdp_pct: 18.5,
            minority_pct: 72.3,
            age65_pct: 12.4,
            population: 4_731_145,
            area_sq_mi: 1703.0,
            rolling_avg_ta_max: 98.2,
        },
        CountyRecord {
            id: CountyId("4".to_string()),
            name: "Los Angeles".to_string(),
            ta_min: 58.3,
            ta_avg: 70.5,
            ta_max: 82.7,
            aqi_category: AqiCategory::Moderate,
            risk_score: 76.8,
            unemployment_pct: 9.1,
            no_hsdp_pct: 22.4,
            minority_pct: 81.2,
            age65_pct: 14.8,
            population: 10_014_009,
            area_sq_mi: 4751.0,
            rolling_avg_ta_max: 85.1,
        },
        CountyRecord {
            id: CountyId("5".to_string()),
            name: "Cook".to_string(),
            ta_min: 42.8,
            ta_avg: 60.5,
            ta_max: 78.2,
            aqi_category: AqiCategory::Good,
            risk_score: 65.4,
            unemployment_pct: 8.9,
            no_hsdp_pct: 16.7,
            minority_pct: 58.9,
            age65_pct: 13.7,
            population: 5_150_233,
            area_sq_mi: 945.0,
            rolling_avg_ta_max: 81.5,
        },
    ]
}

fn resource(
    id: &str,
    name: &str,
    category: &str,
    unit: &str,
    available_qty: u64,
    tags: &[DisasterTag],
) -> ResourceRecord {
    ResourceRecord {
        id: ResourceId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        unit: unit.to_string(),
        available_qty,
        disaster_tags: tags.to_vec(),
    }
}

pub fn resources() -> Vec<ResourceRecord> {
    use DisasterTag::*;

    vec![
        resource(
            "1",
            "Cooling Centers",
            "Shelter",
            "capacity",
            5000,
            &[ExtremeHeat, PowerOutage],
        ),
        resource(
            "2",
            "Portable Air Conditioners",
            "Equipment",
            "units",
            150,
            &[ExtremeHeat],
        ),
        resource(
            "3",
            "Air Quality Monitors",
            "Monitoring",
            "devices",
            75,
            &[AirQuality, Wildfire],
        ),
        resource(
            "4",
            "Emergency Medical Kits",
            "Medical",
            "kits",
            200,
            &[ExtremeHeat, AirQuality, GeneralEmergency],
        ),
        resource(
            "5",
            "Water Distribution Stations",
            "Relief",
            "stations",
            25,
            &[ExtremeHeat, Drought],
        ),
        resource(
            "6",
            "N95 Respirator Masks",
            "Protection",
            "boxes",
            500,
            &[AirQuality, Wildfire],
        ),
    ]
}

/// Alerts shown before any prediction run.
pub fn alerts() -> Vec<PredictiveAlert> {
    vec![
        PredictiveAlert {
            id: AlertId("1".to_string()),
            county_id: CountyId("2".to_string()),
            alert_type: AlertType::ExtremeHeat,
            severity: AlertSeverity::Critical,
            predicted_date: NaiveDate::from_ymd_opt(2024, 9, 22).unwrap_or_default(),
            confidence: 0.92,
            message: "Critical heat wave predicted for Maricopa County with temperatures exceeding 110°F".to_string(),
            recommendations: vec![
                "Deploy additional cooling centers immediately".to_string(),
                "Activate extreme heat emergency protocols".to_string(),
                "Increase outreach to vulnerable populations".to_string(),
            ],
        },
        PredictiveAlert {
            id: AlertId("2".to_string()),
            county_id: CountyId("3".to_string()),
            alert_type: AlertType::AirQuality,
            severity: AlertSeverity::High,
            predicted_date: NaiveDate::from_ymd_opt(2024, 9, 20).unwrap_or_default(),
            confidence: 0.87,
            message: "Air quality expected to reach unhealthy levels due to industrial emissions"
                .to_string(),
            recommendations: vec![
                "Distribute N95 masks to high-risk populations".to_string(),
                "Issue public health advisory".to_string(),
                "Monitor vulnerable community centers".to_string(),
            ],
        },
        PredictiveAlert {
            id: AlertId("3".to_string()),
            county_id: CountyId("1".to_string()),
            alert_type: AlertType::ResourceGap,
            severity: AlertSeverity::Medium,
            predicted_date: NaiveDate::from_ymd_opt(2024, 9, 25).unwrap_or_default(),
            confidence: 0.75,
            message: "Projected cooling center capacity shortfall during peak demand period"
                .to_string(),
            recommendations: vec![
                "Coordinate with neighboring counties for resource sharing".to_string(),
                "Identify additional temporary cooling locations".to_string(),
                "Pre-position mobile cooling units".to_string(),
            ],
        },
    ]
}

/// Historical scenario displayed before the first optimization run.
pub fn seed_scenario() -> Scenario {
    let allocation = |county: &str, resource: &str, quantity: u64, need_met: f64| Allocation {
        county_id: CountyId(county.to_string()),
        resource_id: ResourceId(resource.to_string()),
        allocated_quantity: quantity,
        need_met_percentage: need_met,
    };

    let allocations = vec![
        allocation("2", "1", 2000, 78.5),
        allocation("3", "1", 1500, 65.2),
        allocation("1", "1", 1000, 55.8),
        allocation("2", "2", 60, 85.0),
        allocation("3", "2", 40, 72.3),
        allocation("1", "5", 15, 90.0),
    ];

    Scenario {
        id: ScenarioId("1".to_string()),
        name: "Summer Heat Wave Response".to_string(),
        created_at: Utc
            .with_ymd_and_hms(2024, 9, 15, 10, 30, 0)
            .single()
            .unwrap_or_default(),
        total_resources: 5875,
        counties_served: 5,
        optimization_objective: "minimize_risk_exposure".to_string(),
        allocations,
    }
}
