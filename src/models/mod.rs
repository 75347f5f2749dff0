//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod contract;
mod employee;
mod pay_period;
mod payroll_record;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use contract::{Contract, ContractStanding, ContractState};
pub use employee::{Employee, EmployeeStatus, WorkSchedule};
pub use pay_period::{DateRange, MAX_PAYROLL_YEAR, PayrollPeriod};
pub use payroll_record::{AuditStep, PayrollRecord, PayrollStatus};
