//! Priority-weighted greedy allocation of relief stockpiles to counties.
//!
//! Counties are ranked by a blend of risk, social vulnerability, and density;
//! each county in turn draws from every resource whose disaster tags match its
//! conditions, capped by estimated need, remaining stock, and a per-county
//! share of the starting quantity.

mod config;
mod engine;
mod need;
mod priority;
pub mod router;
mod scenario;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::AllocationConfig;
pub use engine::{AllocationEngine, AllocationError, AllocationPlan, CountyPriority};
pub use need::{NeedAssessment, NeedTrigger};
pub use priority::PriorityBreakdown;
pub use router::allocation_router;
pub use scenario::{
    Allocation, CountyAllocationEntry, ResourceUsageEntry, Scenario, ScenarioId, ScenarioReport,
    ScenarioStamp, ScenarioSummary,
};
pub use service::{AllocationService, AllocationServiceError, RunRequest};
pub use store::{ScenarioStore, SessionId, StoreError};
