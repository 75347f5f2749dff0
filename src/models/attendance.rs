//! Daily attendance records.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The status of one attendance day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// Checked in on time.
    Present,
    /// Checked in after the scheduled entry time. Counts as a present day.
    Late,
    /// Unexcused absence. Deducted from pay.
    Absent,
    /// Excused absence. Not deducted.
    Justified,
}

impl AttendanceStatus {
    /// Returns true for statuses that count as a day worked.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

/// One employee's attendance on one calendar date.
///
/// Unique per `(employee_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// Attendance status for the day.
    pub status: AttendanceStatus,
    /// Check-in time, if recorded.
    #[serde(default)]
    pub entry_time: Option<NaiveTime>,
    /// Check-out time, if recorded.
    #[serde(default)]
    pub exit_time: Option<NaiveTime>,
    /// Overtime hours paid at a 50% premium.
    #[serde(default)]
    pub overtime_hours_50: Decimal,
    /// Overtime hours paid at a 100% premium.
    #[serde(default)]
    pub overtime_hours_100: Decimal,
}

impl AttendanceRecord {
    /// Creates a record with no times and no overtime.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            status,
            entry_time: None,
            exit_time: None,
            overtime_hours_50: Decimal::ZERO,
            overtime_hours_100: Decimal::ZERO,
        }
    }

    /// Hours between check-in and check-out. Zero when either is missing
    /// or check-out is not after check-in.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let mut record = AttendanceRecord::new(
    ///     "emp_001",
    ///     NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
    ///     AttendanceStatus::Present,
    /// );
    /// record.entry_time = NaiveTime::from_hms_opt(8, 0, 0);
    /// record.exit_time = NaiveTime::from_hms_opt(16, 30, 0);
    /// assert_eq!(record.worked_hours(), Decimal::new(85, 1));
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        match (self.entry_time, self.exit_time) {
            (Some(entry), Some(exit)) if exit > entry => {
                Decimal::from((exit - entry).num_minutes()) / Decimal::from(60)
            }
            _ => Decimal::ZERO,
        }
    }
}
