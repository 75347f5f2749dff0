//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions that turn one
//! employee's month into pay: attendance aggregation, gross pay with overtime
//! and absence deduction, progressive income tax, and social-security
//! contributions. Each `calculate_*` function also records the audit steps
//! explaining its result.

mod attendance;
mod gross_pay;
mod income_tax;
mod social_security;

pub use attendance::{AttendanceSummary, aggregate_attendance, summarize_attendance};
pub use gross_pay::{GrossPayResult, calculate_gross_pay, round_money};
pub use income_tax::{IncomeTaxResult, calculate_income_tax, compute_income_tax};
pub use social_security::{Contribution, calculate_contribution, compute_contribution};
