use serde::{Deserialize, Serialize};

/// Weights and thresholds used by the greedy allocation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub risk_weight: f64,
    pub vulnerability_weight: f64,
    pub density_weight: f64,
    pub age65_weight: f64,
    pub minority_weight: f64,
    pub unemployment_weight: f64,
    pub no_hsdp_weight: f64,
    /// People per square mile at which the density factor saturates at 1.
    pub density_saturation: f64,
    /// Population covered by one unit of base need.
    pub population_per_need_unit: u64,
    /// Largest share of a resource's starting quantity any one county may take.
    pub max_county_share_pct: u64,
    pub heat_risk_threshold: f64,
    pub heat_rolling_max_threshold: f64,
    pub power_outage_ta_max_threshold: f64,
    pub power_outage_baseline: f64,
    pub power_outage_span: f64,
    pub objective: String,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            risk_weight: 0.5,
            vulnerability_weight: 0.3,
            density_weight: 0.2,
            age65_weight: 0.3,
            minority_weight: 0.2,
            unemployment_weight: 0.2,
            no_hsdp_weight: 0.3,
            density_saturation: 1000.0,
            population_per_need_unit: 50_000,
            max_county_share_pct: 40,
            heat_risk_threshold: 70.0,
            heat_rolling_max_threshold: 85.0,
            power_outage_ta_max_threshold: 80.0,
            power_outage_baseline: 70.0,
            power_outage_span: 30.0,
            objective: "minimize_risk_exposure".to_string(),
        }
    }
}

impl AllocationConfig {
    pub fn with_max_county_share_pct(mut self, pct: u64) -> Self {
        self.max_county_share_pct = pct.min(100);
        self
    }

    /// Per-county ceiling for a resource, floored to whole units.
    pub fn county_cap(&self, starting_qty: u64) -> u64 {
        starting_qty.saturating_mul(self.max_county_share_pct) / 100
    }
}
