//! Employee model and related types.
//!
//! This module defines the Employee struct, its employment status, and the
//! work schedule used to derive daily and hourly pay rates.

use chrono::{Datelike, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

const STANDARD_ENTRY: NaiveTime = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
const STANDARD_EXIT: NaiveTime = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

/// Whether an employee is currently employed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// Currently employed and payable.
    Active,
    /// Terminated. Kept for payroll history.
    Inactive,
}

/// The hours and weekdays an employee is scheduled to work.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollPeriod, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = WorkSchedule::default();
/// assert_eq!(schedule.daily_hours(), Decimal::from(8));
///
/// // March 2025 has 21 weekdays.
/// let march = PayrollPeriod::new(3, 2025).unwrap();
/// assert_eq!(schedule.scheduled_days(&march), 21);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Daily check-in time.
    pub entry_time: NaiveTime,
    /// Daily check-out time.
    pub exit_time: NaiveTime,
    /// The weekdays the employee is expected to work.
    pub working_days: Vec<Weekday>,
}

impl Default for WorkSchedule {
    /// 08:00 to 16:00, Monday to Friday.
    fn default() -> Self {
        Self {
            entry_time: STANDARD_ENTRY,
            exit_time: STANDARD_EXIT,
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

impl WorkSchedule {
    /// Length of the scheduled working day in hours.
    ///
    /// Zero or negative when the exit time is not after the entry time;
    /// callers treat that as an unusable schedule.
    pub fn daily_hours(&self) -> Decimal {
        let minutes = (self.exit_time - self.entry_time).num_minutes();
        Decimal::from(minutes) / Decimal::from(60)
    }

    /// Returns true if `weekday` is a scheduled working day.
    pub fn works_on(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }

    /// Counts the days of `period` that fall on a scheduled weekday.
    pub fn scheduled_days(&self, period: &PayrollPeriod) -> u32 {
        period
            .date_range()
            .days()
            .filter(|d| self.works_on(d.weekday()))
            .count() as u32
    }
}

/// An employee whose pay is computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name, for reports.
    pub name: String,
    /// Monthly base salary. `None` when HR has not set it yet.
    #[serde(default)]
    pub base_salary: Option<Decimal>,
    /// The employee's working hours and weekdays.
    #[serde(default)]
    pub schedule: WorkSchedule,
    /// Employment status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is currently employed.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_employee_with_defaults() {
        let json = r#"{
            "id": "emp_001",
            "name": "Ana Silva",
            "base_salary": "250000.00",
            "status": "ACTIVE"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.base_salary, Some(dec("250000.00")));
        assert_eq!(employee.schedule, WorkSchedule::default());
        assert!(employee.is_active());
    }

    #[test]
    fn test_deserialize_employee_without_salary() {
        let json = r#"{
            "id": "emp_002",
            "name": "Bruno Costa",
            "status": "INACTIVE",
            "schedule": {
                "entry_time": "07:30:00",
                "exit_time": "15:30:00",
                "working_days": ["Mon", "Wed", "Fri"]
            }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.base_salary, None);
        assert_eq!(employee.status, EmployeeStatus::Inactive);
        assert_eq!(
            employee.schedule.working_days,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert!(!employee.is_active());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }

    #[test]
    fn test_daily_hours_with_half_hour() {
        let schedule = WorkSchedule {
            entry_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            exit_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            working_days: vec![Weekday::Mon],
        };
        assert_eq!(schedule.daily_hours(), dec("9.5"));
    }

    #[test]
    fn test_daily_hours_non_positive_when_exit_not_after_entry() {
        let schedule = WorkSchedule {
            entry_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            exit_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            working_days: vec![Weekday::Mon],
        };
        assert_eq!(schedule.daily_hours(), Decimal::ZERO);
    }

    #[test]
    fn test_scheduled_days_february() {
        let schedule = WorkSchedule::default();
        // February 2025 starts on a Saturday: 20 weekdays.
        let period = PayrollPeriod::new(2, 2025).unwrap();
        assert_eq!(schedule.scheduled_days(&period), 20);
    }

    #[test]
    fn test_scheduled_days_six_day_week() {
        let mut schedule = WorkSchedule::default();
        schedule.working_days.push(Weekday::Sat);
        // June 2025: 21 weekdays + 4 Saturdays.
        let period = PayrollPeriod::new(6, 2025).unwrap();
        assert_eq!(schedule.scheduled_days(&period), 25);
    }

    #[test]
    fn test_scheduled_days_empty_schedule() {
        let schedule = WorkSchedule {
            working_days: vec![],
            ..WorkSchedule::default()
        };
        let period = PayrollPeriod::new(6, 2025).unwrap();
        assert_eq!(schedule.scheduled_days(&period), 0);
    }
}
