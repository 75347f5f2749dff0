//! Monthly payroll run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::{
    AttendanceSummary, aggregate_attendance, calculate_contribution, calculate_gross_pay,
    calculate_income_tax, round_money,
};
use crate::config::PayrollConfig;
use crate::contracts::check_and_transition_expired;
use crate::error::EngineResult;
use crate::models::{AuditStep, Employee, PayrollPeriod, PayrollRecord, PayrollStatus};
use crate::store::PayrollStore;

/// What happened to one employee in a payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayrollOutcome {
    /// A record was computed and stored.
    Processed {
        /// The employee paid.
        employee_id: String,
        /// The stored record.
        payroll_record: PayrollRecord,
    },
    /// The employee's pay could not be computed. Nothing was stored.
    Failed {
        /// The employee skipped.
        employee_id: String,
        /// Why the computation failed.
        error: String,
    },
}

impl PayrollOutcome {
    /// The employee this outcome belongs to.
    pub fn employee_id(&self) -> &str {
        match self {
            Self::Processed { employee_id, .. } | Self::Failed { employee_id, .. } => employee_id,
        }
    }

    /// Returns true if a record was stored.
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }
}

/// The result of a payroll run over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// The period processed.
    pub period: PayrollPeriod,
    /// Contracts moved to `EXPIRED` by the run's expiry check.
    pub expired_contracts: Vec<String>,
    /// One outcome per eligible employee, ordered by employee id.
    pub outcomes: Vec<PayrollOutcome>,
}

impl PayrollRun {
    /// Number of records stored.
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_processed()).count()
    }

    /// Number of employees whose computation failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }
}

/// Computes one employee's payroll record from their attendance summary.
///
/// Pure: reads nothing from storage. The audit trail covers rates, overtime,
/// absences, gross pay, social security, taxable base, income tax and net
/// pay, in that order.
///
/// # Errors
///
/// Returns [`EngineError::Computation`](crate::error::EngineError::Computation)
/// when gross pay cannot be computed for this employee.
pub fn compute_payroll_record(
    employee: &Employee,
    summary: &AttendanceSummary,
    period: &PayrollPeriod,
    config: &PayrollConfig,
) -> EngineResult<PayrollRecord> {
    let policy = config.policy();
    let gross = calculate_gross_pay(employee, summary, period, policy, 1)?;
    let mut audit_steps = gross.audit_steps;
    let mut step = audit_steps.len() as u32 + 1;

    let (contribution, contribution_step) =
        calculate_contribution(gross.base_salary, config.social_security(), step)?;
    audit_steps.push(contribution_step);
    step += 1;
    let social_security_employee = round_money(contribution.employee_share);
    let social_security_employer = round_money(contribution.employer_share);

    let taxable_base = if policy.deduct_social_security_from_taxable_base {
        (gross.gross_pay - social_security_employee).max(Decimal::ZERO)
    } else {
        gross.gross_pay
    };
    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "taxable_base".to_string(),
        rule_name: "Taxable Base".to_string(),
        input: serde_json::json!({
            "gross_pay": gross.gross_pay.to_string(),
            "social_security_employee": social_security_employee.to_string(),
            "deduct_social_security": policy.deduct_social_security_from_taxable_base
        }),
        output: serde_json::json!({
            "taxable_base": taxable_base.to_string()
        }),
        reasoning: if policy.deduct_social_security_from_taxable_base {
            format!(
                "Gross pay {} less employee contribution {}",
                gross.gross_pay, social_security_employee
            )
        } else {
            format!("Gross pay {} taxed in full", gross.gross_pay)
        },
    });
    step += 1;

    let tax = calculate_income_tax(taxable_base, config.tax_brackets(), step)?;
    audit_steps.push(tax.audit_step);
    step += 1;
    let income_tax = round_money(tax.income_tax);

    let net_pay =
        (gross.gross_pay - income_tax - social_security_employee).max(Decimal::ZERO);
    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_pay": gross.gross_pay.to_string(),
            "income_tax": income_tax.to_string(),
            "social_security_employee": social_security_employee.to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string()
        }),
        reasoning: format!(
            "{} − {} − {} = {}",
            gross.gross_pay, income_tax, social_security_employee, net_pay
        ),
    });

    Ok(PayrollRecord {
        employee_id: employee.id.clone(),
        period: *period,
        base_salary: gross.base_salary,
        scheduled_days: gross.scheduled_days,
        days_present: summary.days_present,
        days_absent: summary.days_absent,
        days_justified: summary.days_justified,
        overtime_hours_50: summary.overtime_hours_50,
        overtime_hours_100: summary.overtime_hours_100,
        overtime_pay: gross.overtime_pay,
        absence_deduction: gross.absence_deduction,
        gross_pay: gross.gross_pay,
        taxable_base,
        income_tax,
        social_security_employee,
        social_security_employer,
        net_pay,
        status: PayrollStatus::Generated,
        audit_steps,
    })
}

/// Runs payroll for every eligible employee in `period`.
///
/// Contract expiry is brought up to date as of `as_of` first. An employee is
/// eligible when their status is `ACTIVE` and a contract of theirs was in
/// force on at least one day of the month. A contract that has since expired
/// or been renewed still counts for the days it ran, so the selection for a
/// past month does not depend on `as_of`. Each eligible employee gets one
/// record keyed by `(employee_id, month, year)`, replacing any previous one.
///
/// A failure computing one employee's pay is recorded in the run and does
/// not stop the others. A storage failure aborts the run; records already
/// stored stay stored and a re-run replaces them.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::PayrollPeriod;
/// use payroll_engine::payroll::process_monthly_payroll;
/// use payroll_engine::store::InMemoryStore;
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new();
/// let period = PayrollPeriod::new(3, 2025).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
///
/// let run = process_monthly_payroll(&store, &PayrollConfig::statutory(), &period, as_of).unwrap();
/// assert_eq!(run.processed_count(), 0);
/// ```
pub fn process_monthly_payroll(
    store: &dyn PayrollStore,
    config: &PayrollConfig,
    period: &PayrollPeriod,
    as_of: NaiveDate,
) -> EngineResult<PayrollRun> {
    info!(month = period.month(), year = period.year(), as_of = %as_of, "Starting payroll run");

    let expired_contracts = check_and_transition_expired(store, as_of)?;

    let mut eligible: Vec<Employee> = store
        .fetch_contracts_covering(period.date_range())?
        .into_iter()
        .filter(|a| a.employee.is_active())
        .map(|a| a.employee)
        .collect();
    // A renewal inside the month leaves two covering contracts.
    eligible.dedup_by(|a, b| a.id == b.id);

    debug!(
        month = period.month(),
        year = period.year(),
        eligible = eligible.len(),
        "Selected eligible employees"
    );

    let mut outcomes = Vec::with_capacity(eligible.len());
    for employee in &eligible {
        let computed = aggregate_attendance(store, &employee.id, period)
            .and_then(|summary| compute_payroll_record(employee, &summary, period, config));

        match computed {
            Ok(record) => {
                let payroll_record = store.upsert_payroll_record(record)?;
                debug!(
                    employee_id = %employee.id,
                    gross_pay = %payroll_record.gross_pay,
                    net_pay = %payroll_record.net_pay,
                    "Payroll record stored"
                );
                outcomes.push(PayrollOutcome::Processed {
                    employee_id: employee.id.clone(),
                    payroll_record,
                });
            }
            Err(e) if e.is_per_employee() => {
                warn!(employee_id = %employee.id, error = %e, "Skipping employee");
                outcomes.push(PayrollOutcome::Failed {
                    employee_id: employee.id.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    let run = PayrollRun {
        period: *period,
        expired_contracts,
        outcomes,
    };

    info!(
        month = period.month(),
        year = period.year(),
        processed = run.processed_count(),
        failed = run.failed_count(),
        "Payroll run complete"
    );

    Ok(run)
}
