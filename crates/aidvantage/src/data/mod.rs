//! Read-only county and resource inputs for allocation runs.

pub mod fixtures;
mod inventory;
mod loader;

pub use inventory::{export_inventory_csv, parse_inventory};
pub use loader::{
    read_counties, read_counties_from_path, read_resources, read_resources_from_path,
};

use crate::domain::{CountyRecord, RecordError, ResourceRecord};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} (id '{id}') is invalid: {source}")]
    InvalidRecord {
        row: usize,
        id: String,
        source: RecordError,
    },
}

/// Counties and resources loaded once per process and shared read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub counties: Vec<CountyRecord>,
    pub resources: Vec<ResourceRecord>,
}

impl Dataset {
    pub fn builtin() -> Self {
        Self {
            counties: fixtures::counties(),
            resources: fixtures::resources(),
        }
    }

    /// Loads whichever side has a path and falls back to the built-in records
    /// for the other.
    pub fn from_csv_paths(
        counties: Option<&Path>,
        resources: Option<&Path>,
    ) -> Result<Self, DataError> {
        let counties = match counties {
            Some(path) => read_counties_from_path(path)?,
            None => fixtures::counties(),
        };
        let resources = match resources {
            Some(path) => read_resources_from_path(path)?,
            None => fixtures::resources(),
        };
        Ok(Self {
            counties,
            resources,
        })
    }

    pub fn with_extra_resources(&self, extra: Vec<ResourceRecord>) -> Self {
        let mut resources = self.resources.clone();
        resources.extend(extra);
        Self {
            counties: self.counties.clone(),
            resources,
        }
    }

    /// Checks every record, reporting the first offender with its 1-based row.
    pub fn validate(&self) -> Result<(), DataError> {
        for (index, county) in self.counties.iter().enumerate() {
            county
                .validate()
                .map_err(|source| DataError::InvalidRecord {
                    row: index + 1,
                    id: county.id.0.clone(),
                    source,
                })?;
        }
        for (index, resource) in self.resources.iter().enumerate() {
            resource
                .validate()
                .map_err(|source| DataError::InvalidRecord {
                    row: index + 1,
                    id: resource.id.0.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn county_name(&self, id: &crate::domain::CountyId) -> Option<&str> {
        self.counties
            .iter()
            .find(|county| &county.id == id)
            .map(|county| county.name.as_str())
    }
}
