//! Monthly attendance aggregation.
//!
//! Reduces one employee's daily attendance records for a calendar month into
//! day counts and overtime totals. Days without a record are neither present
//! nor absent: an absence must be recorded explicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, PayrollPeriod};
use crate::store::PayrollStore;

/// One employee's attendance totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days recorded as present or late.
    pub days_present: u32,
    /// Of `days_present`, the days recorded as late.
    pub days_late: u32,
    /// Days recorded as unexcused absences.
    pub days_absent: u32,
    /// Days recorded as excused absences.
    pub days_justified: u32,
    /// Total overtime hours at a 50% premium.
    pub overtime_hours_50: Decimal,
    /// Total overtime hours at a 100% premium.
    pub overtime_hours_100: Decimal,
    /// Total hours between check-in and check-out.
    pub worked_hours: Decimal,
}

/// Reduces attendance records into an [`AttendanceSummary`].
///
/// Records for other employees or outside `period` are ignored. Performs no
/// monetary computation.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if a record carries negative
/// overtime hours.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::summarize_attendance;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, PayrollPeriod};
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::new(3, 2025).unwrap();
/// let records = vec![
///     AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), AttendanceStatus::Present),
///     AttendanceRecord::new("emp_001", NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), AttendanceStatus::Absent),
/// ];
///
/// let summary = summarize_attendance("emp_001", &records, &period).unwrap();
/// assert_eq!(summary.days_present, 1);
/// assert_eq!(summary.days_absent, 1);
/// ```
pub fn summarize_attendance(
    employee_id: &str,
    records: &[AttendanceRecord],
    period: &PayrollPeriod,
) -> EngineResult<AttendanceSummary> {
    let mut summary = AttendanceSummary::default();

    for record in records
        .iter()
        .filter(|r| r.employee_id == employee_id && period.contains_date(r.date))
    {
        if record.overtime_hours_50 < Decimal::ZERO || record.overtime_hours_100 < Decimal::ZERO {
            return Err(EngineError::validation(
                "overtime_hours",
                format!(
                    "attendance of '{}' on {} has negative overtime",
                    record.employee_id, record.date
                ),
            ));
        }

        match record.status {
            AttendanceStatus::Present => summary.days_present += 1,
            AttendanceStatus::Late => {
                summary.days_present += 1;
                summary.days_late += 1;
            }
            AttendanceStatus::Absent => summary.days_absent += 1,
            AttendanceStatus::Justified => summary.days_justified += 1,
        }
        let add = |total: Decimal, hours: Decimal| {
            total.checked_add(hours).ok_or_else(|| {
                EngineError::computation(
                    employee_id,
                    format!("attendance hours overflow on {}", record.date),
                )
            })
        };
        summary.overtime_hours_50 = add(summary.overtime_hours_50, record.overtime_hours_50)?;
        summary.overtime_hours_100 = add(summary.overtime_hours_100, record.overtime_hours_100)?;
        summary.worked_hours = add(summary.worked_hours, record.worked_hours())?;
    }

    Ok(summary)
}

/// Fetches and aggregates one employee's attendance for `period`.
///
/// Queries the store for the inclusive calendar-month range
/// `[first day, last day]`.
pub fn aggregate_attendance(
    store: &dyn PayrollStore,
    employee_id: &str,
    period: &PayrollPeriod,
) -> EngineResult<AttendanceSummary> {
    let records = store.fetch_attendance(employee_id, period.date_range())?;
    let summary = summarize_attendance(employee_id, &records, period)?;

    debug!(
        employee_id,
        period = %period,
        records = records.len(),
        days_present = summary.days_present,
        days_absent = summary.days_absent,
        "Aggregated attendance"
    );

    Ok(summary)
}
