use super::config::AllocationConfig;
use crate::domain::CountyRecord;
use serde::Serialize;

/// Normalized factors behind a county's place in the allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub risk_factor: f64,
    pub vulnerability_factor: f64,
    pub density_factor: f64,
    pub priority_score: f64,
}

pub(crate) fn score_county(county: &CountyRecord, config: &AllocationConfig) -> PriorityBreakdown {
    let risk_factor = county.risk_score / 100.0;

    let vulnerability_factor = config.age65_weight * (county.age65_pct / 100.0)
        + config.minority_weight * (county.minority_pct / 100.0)
        + config.unemployment_weight * (county.unemployment_pct / 100.0)
        + config.no_hsdp_weight * (county.no_hsdp_pct / 100.0);

    let density_factor = (county.density_per_sq_mi() / config.density_saturation).min(1.0);

    let priority_score = config.risk_weight * risk_factor
        + config.vulnerability_weight * vulnerability_factor
        + config.density_weight * density_factor;

    PriorityBreakdown {
        risk_factor,
        vulnerability_factor,
        density_factor,
        priority_score,
    }
}

/// Scores every county and orders them highest priority first. Ties keep
/// input order.
pub(crate) fn rank_counties<'a>(
    counties: &'a [CountyRecord],
    config: &AllocationConfig,
) -> Vec<(&'a CountyRecord, PriorityBreakdown)> {
    let mut ranked: Vec<_> = counties
        .iter()
        .map(|county| (county, score_county(county, config)))
        .collect();

    ranked.sort_by(|(_, a), (_, b)| b.priority_score.total_cmp(&a.priority_score));
    ranked
}
