//! In-memory [`PayrollStore`] implementation.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Contract, ContractState, DateRange, Employee, EmployeeStatus,
    PayrollPeriod, PayrollRecord,
};

use super::{ContractAssignment, PayrollStore};

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<String, Employee>,
    contracts: BTreeMap<String, Contract>,
    attendance: BTreeMap<(String, NaiveDate), AttendanceRecord>,
    payroll: BTreeMap<(String, i32, u32), PayrollRecord>,
}

/// A [`PayrollStore`] holding everything in process memory.
///
/// Reads share a lock; writes are exclusive, which makes every single
/// operation atomic. Ordered maps keep listings deterministic.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Employee, EmployeeStatus, WorkSchedule};
/// use payroll_engine::store::{InMemoryStore, PayrollStore};
///
/// let store = InMemoryStore::new();
/// store.insert_employee(Employee {
///     id: "emp_001".to_string(),
///     name: "Ana Silva".to_string(),
///     base_salary: None,
///     schedule: WorkSchedule::default(),
///     status: EmployeeStatus::Active,
/// }).unwrap();
///
/// assert!(store.fetch_employee("emp_001").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| EngineError::Persistence {
            message: "store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| EngineError::Persistence {
            message: "store lock poisoned".to_string(),
        })
    }

    /// Adds an employee. `Conflict` if the id is taken.
    pub fn insert_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut tables = self.write()?;
        if tables.employees.contains_key(&employee.id) {
            return Err(EngineError::conflict(format!(
                "employee '{}' already exists",
                employee.id
            )));
        }
        tables.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    /// Lists every employee, ordered by id.
    pub fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.read()?.employees.values().cloned().collect())
    }

    /// Inserts or replaces the attendance record for its
    /// `(employee_id, date)`. `NotFound` if the employee does not exist.
    pub fn record_attendance(&self, record: AttendanceRecord) -> EngineResult<()> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&record.employee_id) {
            return Err(EngineError::not_found("employee", record.employee_id));
        }
        tables
            .attendance
            .insert((record.employee_id.clone(), record.date), record);
        Ok(())
    }

    /// Looks up one payroll record by its key.
    pub fn payroll_record(
        &self,
        employee_id: &str,
        period: &PayrollPeriod,
    ) -> EngineResult<Option<PayrollRecord>> {
        let key = (employee_id.to_string(), period.year(), period.month());
        Ok(self.read()?.payroll.get(&key).cloned())
    }

    /// Number of payroll records across all periods.
    pub fn payroll_record_count(&self) -> EngineResult<usize> {
        Ok(self.read()?.payroll.len())
    }
}

impl PayrollStore for InMemoryStore {
    fn fetch_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.read()?.employees.get(employee_id).cloned())
    }

    fn update_employee_status(
        &self,
        employee_id: &str,
        status: EmployeeStatus,
    ) -> EngineResult<()> {
        let mut tables = self.write()?;
        let employee = tables
            .employees
            .get_mut(employee_id)
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;
        employee.status = status;
        Ok(())
    }

    fn fetch_contract(&self, contract_id: &str) -> EngineResult<Option<Contract>> {
        Ok(self.read()?.contracts.get(contract_id).cloned())
    }

    fn fetch_contracts(&self) -> EngineResult<Vec<Contract>> {
        Ok(self.read()?.contracts.values().cloned().collect())
    }

    fn fetch_contracts_covering(&self, range: DateRange) -> EngineResult<Vec<ContractAssignment>> {
        let tables = self.read()?;
        let mut assignments = tables
            .contracts
            .values()
            .filter(|c| c.covers(&range))
            .map(|contract| -> EngineResult<ContractAssignment> {
                let employee = tables
                    .employees
                    .get(&contract.employee_id)
                    .cloned()
                    .ok_or_else(|| EngineError::Persistence {
                        message: format!(
                            "contract '{}' references missing employee '{}'",
                            contract.id, contract.employee_id
                        ),
                    })?;
                Ok(ContractAssignment {
                    contract: contract.clone(),
                    employee,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;
        assignments.sort_by(|a, b| {
            (&a.employee.id, a.contract.start_date).cmp(&(&b.employee.id, b.contract.start_date))
        });
        Ok(assignments)
    }

    fn has_other_active_contract(&self, employee_id: &str, except: &str) -> EngineResult<bool> {
        Ok(self
            .read()?
            .contracts
            .values()
            .any(|c| c.employee_id == employee_id && c.id != except && c.is_active()))
    }

    fn insert_contract(&self, contract: Contract) -> EngineResult<Contract> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&contract.employee_id) {
            return Err(EngineError::not_found("employee", contract.employee_id));
        }
        if tables.contracts.contains_key(&contract.id) {
            return Err(EngineError::conflict(format!(
                "contract '{}' already exists",
                contract.id
            )));
        }
        if contract.is_active() {
            if let Some(existing) = tables
                .contracts
                .values()
                .find(|c| c.employee_id == contract.employee_id && c.is_active())
            {
                return Err(EngineError::conflict(format!(
                    "employee '{}' already has active contract '{}'",
                    contract.employee_id, existing.id
                )));
            }
        }
        tables.contracts.insert(contract.id.clone(), contract.clone());
        Ok(contract)
    }

    fn update_contract_state(&self, contract_id: &str, state: ContractState) -> EngineResult<()> {
        let mut tables = self.write()?;
        let current = tables
            .contracts
            .get(contract_id)
            .ok_or_else(|| EngineError::not_found("contract", contract_id))?;

        if state == ContractState::Active && current.state != ContractState::Active {
            let employee_id = current.employee_id.clone();
            if tables
                .contracts
                .values()
                .any(|c| c.employee_id == employee_id && c.id != contract_id && c.is_active())
            {
                return Err(EngineError::conflict(format!(
                    "employee '{}' already has an active contract",
                    employee_id
                )));
            }
        }

        if let Some(contract) = tables.contracts.get_mut(contract_id) {
            contract.state = state;
        }
        Ok(())
    }

    fn fetch_attendance(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let from = (employee_id.to_string(), range.start);
        let to = (employee_id.to_string(), range.end);
        if range.start > range.end {
            return Ok(Vec::new());
        }
        Ok(tables
            .attendance
            .range(from..=to)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn upsert_payroll_record(&self, record: PayrollRecord) -> EngineResult<PayrollRecord> {
        let mut tables = self.write()?;
        tables.payroll.insert(record.key(), record.clone());
        Ok(record)
    }

    fn fetch_payroll_records(&self, period: &PayrollPeriod) -> EngineResult<Vec<PayrollRecord>> {
        Ok(self
            .read()?
            .payroll
            .values()
            .filter(|r| r.period == *period)
            .cloned()
            .collect())
    }
}
