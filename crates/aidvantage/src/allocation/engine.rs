use super::config::AllocationConfig;
use super::need::assess_need;
use super::priority::{rank_counties, PriorityBreakdown};
use super::scenario::{Allocation, Scenario, ScenarioStamp};
use crate::domain::{CountyId, CountyRecord, RecordError, ResourceId, ResourceRecord};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Stateless greedy allocator. Every run works on its own resource counters,
/// so concurrent runs over the same inputs cannot observe each other.
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    config: AllocationConfig,
}

/// Result of the allocation pass before it is stamped as a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub allocations: Vec<Allocation>,
    pub total_resources: u64,
    pub counties_served: usize,
    pub priorities: Vec<CountyPriority>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyPriority {
    pub county_id: CountyId,
    #[serde(flatten)]
    pub breakdown: PriorityBreakdown,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("county '{id}' is invalid: {source}")]
    InvalidCounty { id: CountyId, source: RecordError },
    #[error("resource '{id}' is invalid: {source}")]
    InvalidResource { id: ResourceId, source: RecordError },
}

#[derive(Debug)]
struct ResourceTracker<'a> {
    resource: &'a ResourceRecord,
    available: u64,
    allocated: u64,
    county_cap: u64,
}

impl AllocationEngine {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Runs the allocation pass and stamps the result with a fresh id and
    /// timestamp.
    pub fn run(
        &self,
        counties: &[CountyRecord],
        resources: &[ResourceRecord],
    ) -> Result<Scenario, AllocationError> {
        let plan = self.plan(counties, resources)?;
        Ok(self.stamp(plan, ScenarioStamp::now()))
    }

    pub fn stamp(&self, plan: AllocationPlan, stamp: ScenarioStamp) -> Scenario {
        Scenario {
            id: stamp.id,
            name: stamp.name,
            created_at: stamp.created_at,
            total_resources: plan.total_resources,
            counties_served: plan.counties_served,
            optimization_objective: self.config.objective.clone(),
            allocations: plan.allocations,
        }
    }

    /// Pure allocation pass: rank counties, then walk resources in input
    /// order for each county, capping each grant by need, remaining stock,
    /// and the per-county share.
    pub fn plan(
        &self,
        counties: &[CountyRecord],
        resources: &[ResourceRecord],
    ) -> Result<AllocationPlan, AllocationError> {
        validate_inputs(counties, resources)?;

        let ranked = rank_counties(counties, &self.config);
        let mut trackers: Vec<ResourceTracker<'_>> = resources
            .iter()
            .map(|resource| ResourceTracker {
                resource,
                available: resource.available_qty,
                allocated: 0,
                county_cap: self.config.county_cap(resource.available_qty),
            })
            .collect();

        let mut allocations = Vec::new();

        for (county, priority) in &ranked {
            let base_need = county
                .population
                .div_ceil(self.config.population_per_need_unit.max(1));

            for tracker in trackers.iter_mut() {
                if tracker.available == 0 {
                    continue;
                }

                let Some(need) = assess_need(county, priority, tracker.resource, &self.config)
                else {
                    continue;
                };

                let adjusted_need =
                    (base_need as f64 * need.intensity * priority.priority_score).ceil();
                let adjusted_need = if adjusted_need > 0.0 {
                    adjusted_need as u64
                } else {
                    0
                };

                let grant = adjusted_need
                    .min(tracker.available)
                    .min(tracker.county_cap);

                debug!(
                    county = %county.id,
                    resource = %tracker.resource.id,
                    trigger = ?need.trigger,
                    intensity = need.intensity,
                    adjusted_need,
                    grant,
                    "assessed county need"
                );

                // Zero grants are never recorded.
                if grant == 0 {
                    continue;
                }

                let need_met_percentage =
                    (grant as f64 / base_need.max(1) as f64 * 100.0).min(100.0);

                allocations.push(Allocation {
                    county_id: county.id.clone(),
                    resource_id: tracker.resource.id.clone(),
                    allocated_quantity: grant,
                    need_met_percentage,
                });

                tracker.available -= grant;
                tracker.allocated += grant;
            }
        }

        let total_resources = trackers.iter().map(|tracker| tracker.allocated).sum();
        let counties_served = allocations
            .iter()
            .map(|allocation| &allocation.county_id)
            .collect::<HashSet<_>>()
            .len();

        let priorities = ranked
            .iter()
            .map(|(county, breakdown)| CountyPriority {
                county_id: county.id.clone(),
                breakdown: *breakdown,
            })
            .collect();

        Ok(AllocationPlan {
            allocations,
            total_resources,
            counties_served,
            priorities,
        })
    }
}

fn validate_inputs(
    counties: &[CountyRecord],
    resources: &[ResourceRecord],
) -> Result<(), AllocationError> {
    for county in counties {
        county
            .validate()
            .map_err(|source| AllocationError::InvalidCounty {
                id: county.id.clone(),
                source,
            })?;
    }
    for resource in resources {
        resource
            .validate()
            .map_err(|source| AllocationError::InvalidResource {
                id: resource.id.clone(),
                source,
            })?;
    }
    Ok(())
}
