//! Relief resource allocation for county emergency management: county risk
//! records, a priority-weighted allocation engine, session-scoped scenario
//! history, and mock predictive alerts with drafted notifications.

pub mod alerts;
pub mod allocation;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod telemetry;
