//! Loading an [`InMemoryStore`] from a YAML fixture.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Contract, Employee};

use super::{InMemoryStore, PayrollStore};

/// Employees, contracts and attendance to load into a fresh store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// Employees, inserted first.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Contracts, inserted after the employees they reference.
    #[serde(default)]
    pub contracts: Vec<Contract>,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl SeedData {
    /// Reads seed data from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}

impl InMemoryStore {
    /// Creates a store holding `seed`, enforcing the same invariants as the
    /// individual inserts.
    pub fn from_seed(seed: SeedData) -> EngineResult<Self> {
        let store = Self::new();
        let counts = (seed.employees.len(), seed.contracts.len(), seed.attendance.len());

        for employee in seed.employees {
            store.insert_employee(employee)?;
        }
        for contract in seed.contracts {
            store.insert_contract(contract)?;
        }
        for record in seed.attendance {
            store.record_attendance(record)?;
        }

        info!(
            employees = counts.0,
            contracts = counts.1,
            attendance = counts.2,
            "Seeded store"
        );
        Ok(store)
    }
}
