//! Request types for the payroll engine API.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::PayrollPeriod;

/// Request body naming a payroll month.
///
/// Used by `/payroll/run`, `/reports/tax` and `/reports/social-security`.
/// Both fields are required; a missing or mistyped field is rejected before
/// any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The month, 1–12.
    pub month: u32,
    /// The year.
    pub year: i32,
}

impl PeriodRequest {
    /// Validates the pair into a [`PayrollPeriod`].
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }
}
