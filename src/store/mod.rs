//! Persistence boundary for the payroll engine.
//!
//! The engine never touches storage directly. Everything it reads or writes
//! goes through [`PayrollStore`], which a persistence layer implements.
//! [`InMemoryStore`] is the implementation used by the HTTP service and the
//! tests; [`SeedData`] fills one from a YAML fixture.

mod memory;
mod seed;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, Contract, ContractState, DateRange, Employee, EmployeeStatus,
    PayrollPeriod, PayrollRecord,
};

pub use memory::InMemoryStore;
pub use seed::SeedData;

/// A contract together with the employee it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAssignment {
    /// The contract.
    pub contract: Contract,
    /// The employee holding the contract.
    pub employee: Employee,
}

/// Storage operations the payroll engine depends on.
///
/// Implementations must enforce two invariants: at most one `ACTIVE`
/// contract per employee, and at most one payroll record per
/// `(employee, month, year)`. Any storage failure is reported as
/// [`EngineError::Persistence`](crate::error::EngineError::Persistence).
pub trait PayrollStore: Send + Sync {
    /// Looks up an employee by id.
    fn fetch_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>>;

    /// Sets an employee's status. `NotFound` for an unknown id.
    fn update_employee_status(
        &self,
        employee_id: &str,
        status: EmployeeStatus,
    ) -> EngineResult<()>;

    /// Looks up a contract by id.
    fn fetch_contract(&self, contract_id: &str) -> EngineResult<Option<Contract>>;

    /// Lists every contract, ordered by id.
    fn fetch_contracts(&self) -> EngineResult<Vec<Contract>>;

    /// Lists contracts in force on at least one day of `range`, each with its
    /// employee, ordered by employee id then start date.
    ///
    /// Selection follows [`Contract::covers`]: the contract's dates decide,
    /// not whether it has since expired or been renewed.
    fn fetch_contracts_covering(&self, range: DateRange) -> EngineResult<Vec<ContractAssignment>>;

    /// Returns true if the employee holds an `ACTIVE` contract other than
    /// `except`.
    fn has_other_active_contract(&self, employee_id: &str, except: &str) -> EngineResult<bool>;

    /// Inserts a new contract.
    ///
    /// `NotFound` if the employee does not exist; `Conflict` if the id is
    /// taken or the contract is `ACTIVE` while the employee already holds an
    /// `ACTIVE` contract.
    fn insert_contract(&self, contract: Contract) -> EngineResult<Contract>;

    /// Sets a contract's state. `NotFound` for an unknown id. Setting the
    /// state a contract already has is not an error.
    fn update_contract_state(&self, contract_id: &str, state: ContractState) -> EngineResult<()>;

    /// Lists one employee's attendance records dated within `range`,
    /// ordered by date.
    fn fetch_attendance(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Inserts or wholesale replaces the record keyed by
    /// `(employee_id, month, year)`. Atomic per record.
    fn upsert_payroll_record(&self, record: PayrollRecord) -> EngineResult<PayrollRecord>;

    /// Lists the payroll records of `period`, ordered by employee id.
    fn fetch_payroll_records(&self, period: &PayrollPeriod) -> EngineResult<Vec<PayrollRecord>>;
}
