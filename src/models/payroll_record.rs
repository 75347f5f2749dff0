//! Payroll record models.
//!
//! This module contains the [`PayrollRecord`] ("folha") persisted once per
//! employee per month, and the [`AuditStep`] entries recording how each of
//! its amounts was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// The status of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// Produced by a payroll run.
    Generated,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one rule
/// application. Steps hold no timestamps so that re-running a period on
/// unchanged inputs reproduces them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// One month's computed compensation for one employee.
///
/// Unique per `(employee_id, month, year)`. A re-run for the same period
/// replaces the record wholesale.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollPeriod, PayrollRecord, PayrollStatus};
/// use rust_decimal::Decimal;
///
/// let record = PayrollRecord {
///     employee_id: "emp_001".to_string(),
///     period: PayrollPeriod::new(1, 2025).unwrap(),
///     base_salary: Decimal::from(150_000),
///     scheduled_days: 23,
///     days_present: 23,
///     days_absent: 0,
///     days_justified: 0,
///     overtime_hours_50: Decimal::ZERO,
///     overtime_hours_100: Decimal::ZERO,
///     overtime_pay: Decimal::ZERO,
///     absence_deduction: Decimal::ZERO,
///     gross_pay: Decimal::from(150_000),
///     taxable_base: Decimal::from(150_000),
///     income_tax: Decimal::ZERO,
///     social_security_employee: Decimal::from(4_500),
///     social_security_employer: Decimal::from(12_000),
///     net_pay: Decimal::from(145_500),
///     status: PayrollStatus::Generated,
///     audit_steps: vec![],
/// };
/// assert_eq!(record.key(), ("emp_001".to_string(), 2025, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The month this record covers.
    #[serde(flatten)]
    pub period: PayrollPeriod,
    /// Monthly base salary used for the calculation.
    pub base_salary: Decimal,
    /// Days of the month on the employee's working weekdays.
    pub scheduled_days: u32,
    /// Days recorded as present or late.
    pub days_present: u32,
    /// Days recorded as unexcused absences.
    pub days_absent: u32,
    /// Days recorded as excused absences.
    pub days_justified: u32,
    /// Overtime hours at a 50% premium.
    pub overtime_hours_50: Decimal,
    /// Overtime hours at a 100% premium.
    pub overtime_hours_100: Decimal,
    /// Pay for both overtime classes.
    pub overtime_pay: Decimal,
    /// Amount withheld for unexcused absences.
    pub absence_deduction: Decimal,
    /// Base salary plus overtime pay minus absence deduction.
    pub gross_pay: Decimal,
    /// The income subject to income tax.
    pub taxable_base: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Employee social-security contribution, withheld from pay.
    pub social_security_employee: Decimal,
    /// Employer social-security contribution, paid on top.
    pub social_security_employer: Decimal,
    /// Gross pay minus income tax minus employee contribution.
    pub net_pay: Decimal,
    /// Record status.
    pub status: PayrollStatus,
    /// How each amount was derived, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl PayrollRecord {
    /// The unique key `(employee_id, year, month)`.
    pub fn key(&self) -> (String, i32, u32) {
        (
            self.employee_id.clone(),
            self.period.year(),
            self.period.month(),
        )
    }

    /// Total withheld from gross pay.
    pub fn total_deductions(&self) -> Decimal {
        self.income_tax + self.social_security_employee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_record() -> PayrollRecord {
        PayrollRecord {
            employee_id: "emp_001".to_string(),
            period: PayrollPeriod::new(3, 2025).unwrap(),
            base_salary: dec("250000"),
            scheduled_days: 21,
            days_present: 21,
            days_absent: 0,
            days_justified: 0,
            overtime_hours_50: Decimal::ZERO,
            overtime_hours_100: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            absence_deduction: Decimal::ZERO,
            gross_pay: dec("250000"),
            taxable_base: dec("250000"),
            income_tax: dec("40250"),
            social_security_employee: dec("7500"),
            social_security_employer: dec("20000"),
            net_pay: dec("202250"),
            status: PayrollStatus::Generated,
            audit_steps: vec![AuditStep {
                step_number: 1,
                rule_id: "income_tax".to_string(),
                rule_name: "Income Tax Withholding".to_string(),
                input: serde_json::json!({"taxable_base": "250000"}),
                output: serde_json::json!({"income_tax": "40250"}),
                reasoning: "bracket 3".to_string(),
            }],
        }
    }

    #[test]
    fn test_serialization_flattens_period_and_uses_strings() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"month\":3"));
        assert!(json.contains("\"year\":2025"));
        assert!(json.contains("\"net_pay\":\"202250\""));
        assert!(json.contains("\"status\":\"GENERATED\""));
    }

    #[test]
    fn test_deserialization_restores_record() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: PayrollRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_total_deductions() {
        assert_eq!(sample_record().total_deductions(), dec("47750"));
    }

    #[test]
    fn test_key_orders_year_before_month() {
        assert_eq!(sample_record().key(), ("emp_001".to_string(), 2025, 3));
    }
}
