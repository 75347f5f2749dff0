//! Gross pay calculation.
//!
//! Turns an employee's monthly base salary and attendance summary into gross
//! pay by adding overtime and deducting unexcused absences.
//!
//! ## Formula
//!
//! ```text
//! daily_rate        = base_salary / scheduled_days
//! hourly_rate       = daily_rate / daily_hours
//! overtime_pay      = h50 × hourly_rate × m50 + h100 × hourly_rate × m100
//! absence_deduction = days_absent × daily_rate
//! gross_pay         = max(0, base_salary + overtime_pay − absence_deduction)
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::AttendanceSummary;
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee, PayrollPeriod};

/// Rounds a monetary amount to 2 decimal places, midpoint away from zero.
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(10005, 3)), Decimal::new(1001, 2));
/// assert_eq!(round_money(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The result of a gross pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossPayResult {
    /// The monthly base salary used.
    pub base_salary: Decimal,
    /// Days of the month on the employee's working weekdays.
    pub scheduled_days: u32,
    /// Base salary per scheduled day. Not rounded.
    pub daily_rate: Decimal,
    /// Daily rate per scheduled hour. Not rounded.
    pub hourly_rate: Decimal,
    /// Pay for both overtime classes, rounded.
    pub overtime_pay: Decimal,
    /// Deduction for unexcused absences, rounded.
    pub absence_deduction: Decimal,
    /// Gross pay, rounded and never negative.
    pub gross_pay: Decimal,
    /// Audit steps, numbered consecutively from the requested first step.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes gross pay for one employee and one month.
///
/// # Errors
///
/// Returns [`EngineError::Computation`] when the employee has no base salary
/// or a negative one, when the schedule has no working day in the month, when
/// the scheduled day is not a positive number of hours, or when an amount
/// overflows.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_gross_pay, AttendanceSummary};
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{Employee, EmployeeStatus, PayrollPeriod, WorkSchedule};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Ana Silva".to_string(),
///     base_salary: Some(Decimal::from(210_000)),
///     schedule: WorkSchedule::default(),
///     status: EmployeeStatus::Active,
/// };
/// let summary = AttendanceSummary {
///     days_present: 19,
///     days_absent: 2,
///     ..Default::default()
/// };
/// // March 2025: 21 weekdays, so the daily rate is 10,000.
/// let period = PayrollPeriod::new(3, 2025).unwrap();
///
/// let result = calculate_gross_pay(&employee, &summary, &period, &PayrollPolicy::default(), 1).unwrap();
/// assert_eq!(result.absence_deduction, Decimal::from(20_000));
/// assert_eq!(result.gross_pay, Decimal::from(190_000));
/// ```
pub fn calculate_gross_pay(
    employee: &Employee,
    summary: &AttendanceSummary,
    period: &PayrollPeriod,
    policy: &PayrollPolicy,
    first_step: u32,
) -> EngineResult<GrossPayResult> {
    let base_salary = employee
        .base_salary
        .ok_or_else(|| EngineError::computation(&employee.id, "base salary is not set"))?;
    if base_salary < Decimal::ZERO {
        return Err(EngineError::computation(
            &employee.id,
            format!("base salary {} is negative", base_salary),
        ));
    }

    let scheduled_days = employee.schedule.scheduled_days(period);
    if scheduled_days == 0 {
        return Err(EngineError::computation(
            &employee.id,
            format!("schedule has no working days in {}", period),
        ));
    }

    let daily_hours = employee.schedule.daily_hours();
    if daily_hours <= Decimal::ZERO {
        return Err(EngineError::computation(
            &employee.id,
            format!(
                "scheduled day from {} to {} has no hours",
                employee.schedule.entry_time, employee.schedule.exit_time
            ),
        ));
    }

    let overflow = |what: &str| {
        EngineError::computation(&employee.id, format!("{} is out of range", what))
    };

    let daily_rate = base_salary
        .checked_div(Decimal::from(scheduled_days))
        .ok_or_else(|| overflow("daily rate"))?;
    let hourly_rate = daily_rate
        .checked_div(daily_hours)
        .ok_or_else(|| overflow("hourly rate"))?;

    let overtime_at = |hours: Decimal, multiplier: Decimal| {
        hours
            .checked_mul(hourly_rate)
            .and_then(|pay| pay.checked_mul(multiplier))
    };
    let overtime_pay = overtime_at(summary.overtime_hours_50, policy.overtime_50_multiplier)
        .zip(overtime_at(summary.overtime_hours_100, policy.overtime_100_multiplier))
        .and_then(|(pay_50, pay_100)| pay_50.checked_add(pay_100))
        .map(round_money)
        .ok_or_else(|| overflow("overtime pay"))?;

    let absence_deduction = if policy.deduct_unpaid_absences {
        Decimal::from(summary.days_absent)
            .checked_mul(daily_rate)
            .map(round_money)
            .ok_or_else(|| overflow("absence deduction"))?
    } else {
        Decimal::ZERO
    };

    let gross_pay = base_salary
        .checked_add(overtime_pay)
        .and_then(|total| total.checked_sub(absence_deduction))
        .map(round_money)
        .ok_or_else(|| overflow("gross pay"))?
        .max(Decimal::ZERO);

    let mut step = first_step;
    let mut next_step = || {
        let n = step;
        step += 1;
        n
    };

    let audit_steps = vec![
        AuditStep {
            step_number: next_step(),
            rule_id: "daily_rate".to_string(),
            rule_name: "Daily and Hourly Rate".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "scheduled_days": scheduled_days,
                "daily_hours": daily_hours.normalize().to_string()
            }),
            output: serde_json::json!({
                "daily_rate": daily_rate.normalize().to_string(),
                "hourly_rate": hourly_rate.normalize().to_string()
            }),
            reasoning: format!(
                "{} over {} scheduled days in {}, {} hours per day",
                base_salary.normalize(),
                scheduled_days,
                period,
                daily_hours.normalize()
            ),
        },
        AuditStep {
            step_number: next_step(),
            rule_id: "overtime_pay".to_string(),
            rule_name: "Overtime Pay".to_string(),
            input: serde_json::json!({
                "overtime_hours_50": summary.overtime_hours_50.normalize().to_string(),
                "overtime_hours_100": summary.overtime_hours_100.normalize().to_string(),
                "hourly_rate": hourly_rate.normalize().to_string(),
                "multiplier_50": policy.overtime_50_multiplier.normalize().to_string(),
                "multiplier_100": policy.overtime_100_multiplier.normalize().to_string()
            }),
            output: serde_json::json!({
                "overtime_pay": overtime_pay.to_string()
            }),
            reasoning: format!(
                "{}h × {} + {}h × {} at the hourly rate = {}",
                summary.overtime_hours_50.normalize(),
                policy.overtime_50_multiplier.normalize(),
                summary.overtime_hours_100.normalize(),
                policy.overtime_100_multiplier.normalize(),
                overtime_pay
            ),
        },
        AuditStep {
            step_number: next_step(),
            rule_id: "absence_deduction".to_string(),
            rule_name: "Unexcused Absence Deduction".to_string(),
            input: serde_json::json!({
                "days_absent": summary.days_absent,
                "days_justified": summary.days_justified,
                "daily_rate": daily_rate.normalize().to_string(),
                "enabled": policy.deduct_unpaid_absences
            }),
            output: serde_json::json!({
                "absence_deduction": absence_deduction.to_string()
            }),
            reasoning: if policy.deduct_unpaid_absences {
                format!(
                    "{} unexcused absences at the daily rate = {}; {} excused absences not deducted",
                    summary.days_absent, absence_deduction, summary.days_justified
                )
            } else {
                "Absence deduction disabled by policy".to_string()
            },
        },
        AuditStep {
            step_number: next_step(),
            rule_id: "gross_pay".to_string(),
            rule_name: "Gross Pay".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "overtime_pay": overtime_pay.to_string(),
                "absence_deduction": absence_deduction.to_string()
            }),
            output: serde_json::json!({
                "gross_pay": gross_pay.to_string()
            }),
            reasoning: format!(
                "{} + {} − {} = {}",
                base_salary.normalize(),
                overtime_pay,
                absence_deduction,
                gross_pay
            ),
        },
    ];

    Ok(GrossPayResult {
        base_salary,
        scheduled_days,
        daily_rate,
        hourly_rate,
        overtime_pay,
        absence_deduction,
        gross_pay,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, WorkSchedule};
    use chrono::{NaiveTime, Weekday};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(base_salary: Option<&str>) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Ana Silva".to_string(),
            base_salary: base_salary.map(dec),
            schedule: WorkSchedule::default(),
            status: EmployeeStatus::Active,
        }
    }

    fn march() -> PayrollPeriod {
        PayrollPeriod::new(3, 2025).unwrap()
    }

    fn summary(absent: u32, ot50: &str, ot100: &str) -> AttendanceSummary {
        AttendanceSummary {
            days_present: 21u32.saturating_sub(absent),
            days_absent: absent,
            overtime_hours_50: dec(ot50),
            overtime_hours_100: dec(ot100),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_attendance_no_overtime_is_base_salary() {
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.scheduled_days, 21);
        assert_eq!(result.daily_rate, dec("10000"));
        assert_eq!(result.hourly_rate, dec("1250"));
        assert_eq!(result.gross_pay, dec("210000"));
    }

    #[test]
    fn test_overtime_and_absences() {
        // 3h × 1250 × 1.5 + 2h × 1250 × 2 = 5625 + 5000
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &summary(2, "3", "2"),
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.overtime_pay, dec("10625"));
        assert_eq!(result.absence_deduction, dec("20000"));
        assert_eq!(result.gross_pay, dec("200625"));
    }

    #[test]
    fn test_amounts_rounded_to_cents() {
        // 200000 / 21 = 9523.8095..., hourly 1190.4761...
        let result = calculate_gross_pay(
            &employee(Some("200000")),
            &summary(2, "3", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.overtime_pay, dec("5357.14"));
        assert_eq!(result.absence_deduction, dec("19047.62"));
        assert_eq!(result.gross_pay, dec("186309.52"));
    }

    #[test]
    fn test_justified_absences_not_deducted() {
        let mut s = summary(0, "0", "0");
        s.days_justified = 3;
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &s,
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();
        assert_eq!(result.absence_deduction, Decimal::ZERO);
        assert_eq!(result.gross_pay, dec("210000"));
    }

    #[test]
    fn test_policy_can_disable_absence_deduction() {
        let policy = PayrollPolicy {
            deduct_unpaid_absences: false,
            ..PayrollPolicy::default()
        };
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &summary(5, "0", "0"),
            &march(),
            &policy,
            1,
        )
        .unwrap();
        assert_eq!(result.absence_deduction, Decimal::ZERO);
        assert!(result.audit_steps[2].reasoning.contains("disabled"));
    }

    #[test]
    fn test_gross_pay_floored_at_zero() {
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &summary(25, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();
        assert_eq!(result.absence_deduction, dec("250000"));
        assert_eq!(result.gross_pay, Decimal::ZERO);
    }

    #[test]
    fn test_missing_base_salary() {
        let result = calculate_gross_pay(
            &employee(None),
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        match result {
            Err(EngineError::Computation { employee_id, message }) => {
                assert_eq!(employee_id, "emp_001");
                assert!(message.contains("not set"));
            }
            other => panic!("Expected Computation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_base_salary() {
        let result = calculate_gross_pay(
            &employee(Some("-1")),
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_no_working_days_in_month() {
        let mut e = employee(Some("210000"));
        e.schedule.working_days = vec![];
        let result = calculate_gross_pay(
            &e,
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_empty_scheduled_day() {
        let mut e = employee(Some("210000"));
        e.schedule.exit_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let result = calculate_gross_pay(
            &e,
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_six_day_schedule_changes_daily_rate() {
        let mut e = employee(Some("260000"));
        e.schedule.working_days.push(Weekday::Sat);
        // March 2025: 21 weekdays + 5 Saturdays
        let result = calculate_gross_pay(
            &e,
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            1,
        )
        .unwrap();
        assert_eq!(result.scheduled_days, 26);
        assert_eq!(result.daily_rate, dec("10000"));
    }

    #[test]
    fn test_overflowing_overtime_is_computation_error() {
        let mut absurd = summary(0, "0", "0");
        absurd.overtime_hours_100 = Decimal::MAX;

        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &absurd,
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        match result {
            Err(EngineError::Computation {
                employee_id,
                message,
            }) => {
                assert_eq!(employee_id, "emp_001");
                assert!(message.contains("overtime pay"));
            }
            other => panic!("Expected Computation error, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_salary_is_computation_error() {
        let mut overtime = summary(0, "0", "0");
        overtime.overtime_hours_50 = dec("1");

        let result = calculate_gross_pay(
            &employee(Some(Decimal::MAX.to_string().as_str())),
            &overtime,
            &march(),
            &PayrollPolicy::default(),
            1,
        );
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_audit_steps_numbered_from_first_step() {
        let result = calculate_gross_pay(
            &employee(Some("210000")),
            &summary(0, "0", "0"),
            &march(),
            &PayrollPolicy::default(),
            3,
        )
        .unwrap();
        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6]);
        assert_eq!(result.audit_steps[3].rule_id, "gross_pay");
        let recorded = dec(result.audit_steps[3].output["gross_pay"].as_str().unwrap());
        assert_eq!(recorded, dec("210000"));
    }
}
