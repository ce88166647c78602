use crate::domain::{CountyId, CountyRecord, ResourceId, ResourceRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One county/resource assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub county_id: CountyId,
    pub resource_id: ResourceId,
    pub allocated_quantity: u64,
    pub need_met_percentage: f64,
}

/// Immutable snapshot of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_resources: u64,
    pub counties_served: usize,
    pub optimization_objective: String,
    pub allocations: Vec<Allocation>,
}

static SCENARIO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identity assigned to a plan when it becomes a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioStamp {
    pub id: ScenarioId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ScenarioStamp {
    pub fn now() -> Self {
        let created_at = Utc::now();
        let sequence = SCENARIO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self {
            id: ScenarioId(format!(
                "scenario-{}-{sequence}",
                created_at.timestamp_millis()
            )),
            name: format!("Optimization Run {}", created_at.format("%H:%M:%S")),
            created_at,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountyAllocationEntry {
    pub county_id: CountyId,
    pub county_name: Option<String>,
    pub resources_received: usize,
    pub total_quantity: u64,
    pub average_need_met: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceUsageEntry {
    pub resource_id: ResourceId,
    pub resource_name: Option<String>,
    pub starting_qty: Option<u64>,
    pub allocated: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub total_allocated: u64,
    pub counties_served: usize,
    pub allocation_count: usize,
    pub average_need_met: f64,
    pub per_county: Vec<CountyAllocationEntry>,
    pub per_resource: Vec<ResourceUsageEntry>,
}

/// Scenario paired with the summary computed against the dataset it ran on.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub summary: ScenarioSummary,
}

impl Scenario {
    /// Totals derived from the allocation list. County and resource records
    /// are only used for names and starting quantities; ids missing from them
    /// still appear.
    pub fn summary(&self, counties: &[CountyRecord], resources: &[ResourceRecord]) -> ScenarioSummary {
        let total_allocated = self
            .allocations
            .iter()
            .map(|allocation| allocation.allocated_quantity)
            .sum();
        let counties_served = self
            .allocations
            .iter()
            .map(|allocation| &allocation.county_id)
            .collect::<HashSet<_>>()
            .len();
        let average_need_met = mean(
            self.allocations
                .iter()
                .map(|allocation| allocation.need_met_percentage),
        );

        let mut county_order: Vec<&CountyId> = Vec::new();
        let mut by_county: BTreeMap<&CountyId, Vec<&Allocation>> = BTreeMap::new();
        let mut resource_order: Vec<&ResourceId> = Vec::new();
        let mut by_resource: BTreeMap<&ResourceId, u64> = BTreeMap::new();

        for allocation in &self.allocations {
            if !by_county.contains_key(&allocation.county_id) {
                county_order.push(&allocation.county_id);
            }
            by_county
                .entry(&allocation.county_id)
                .or_default()
                .push(allocation);

            if !by_resource.contains_key(&allocation.resource_id) {
                resource_order.push(&allocation.resource_id);
            }
            *by_resource.entry(&allocation.resource_id).or_default() +=
                allocation.allocated_quantity;
        }

        let per_county = county_order
            .into_iter()
            .map(|county_id| {
                let entries = by_county.get(county_id).map(Vec::as_slice).unwrap_or(&[]);
                CountyAllocationEntry {
                    county_id: county_id.clone(),
                    county_name: counties
                        .iter()
                        .find(|county| &county.id == county_id)
                        .map(|county| county.name.clone()),
                    resources_received: entries.len(),
                    total_quantity: entries.iter().map(|a| a.allocated_quantity).sum(),
                    average_need_met: mean(entries.iter().map(|a| a.need_met_percentage)),
                }
            })
            .collect();

        let per_resource = resource_order
            .into_iter()
            .map(|resource_id| {
                let allocated = by_resource.get(resource_id).copied().unwrap_or(0);
                let record = resources.iter().find(|resource| &resource.id == resource_id);
                let starting_qty = record.map(|resource| resource.available_qty);
                ResourceUsageEntry {
                    resource_id: resource_id.clone(),
                    resource_name: record.map(|resource| resource.name.clone()),
                    starting_qty,
                    allocated,
                    remaining: starting_qty.map(|qty| qty.saturating_sub(allocated)),
                    utilization_pct: starting_qty
                        .filter(|qty| *qty > 0)
                        .map(|qty| allocated as f64 / qty as f64 * 100.0),
                }
            })
            .collect();

        ScenarioSummary {
            total_allocated,
            counties_served,
            allocation_count: self.allocations.len(),
            average_need_met,
            per_county,
            per_resource,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
