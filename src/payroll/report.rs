//! Period reports over stored payroll records.
//!
//! Reports recompute their amounts from each record's taxable base and
//! base salary with the configured tables, so they always reflect the
//! calculators and not whatever was stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculation::{compute_contribution, compute_income_tax, round_money};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::PayrollPeriod;
use crate::store::PayrollStore;

/// Income-tax totals for one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTotal {
    /// Position of the bracket in the table.
    pub bracket_index: usize,
    /// Exclusive lower bound.
    pub lower: Decimal,
    /// Inclusive upper bound. `None` for the top bracket.
    pub upper: Option<Decimal>,
    /// Employees whose taxable base falls in this bracket.
    pub employee_count: usize,
    /// Sum of their taxable bases.
    pub taxable_base: Decimal,
    /// Sum of their income tax.
    pub income_tax: Decimal,
}

/// Income-tax withholding for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReport {
    /// The period reported on.
    pub period: PayrollPeriod,
    /// Employees with a payroll record in the period.
    pub employee_count: usize,
    /// Sum of all taxable bases.
    pub total_taxable_base: Decimal,
    /// Sum of all income tax withheld.
    pub total_income_tax: Decimal,
    /// Totals per bracket, one entry per bracket of the table.
    pub brackets: Vec<BracketTotal>,
}

/// Social-security contributions for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionReport {
    /// The period reported on.
    pub period: PayrollPeriod,
    /// Employees with a payroll record in the period.
    pub employee_count: usize,
    /// Sum of base salaries.
    pub total_base_salary: Decimal,
    /// Sum of employee shares.
    pub total_employee_share: Decimal,
    /// Sum of employer shares.
    pub total_employer_share: Decimal,
    /// Employee plus employer shares.
    pub total_contribution: Decimal,
}

/// Builds the income-tax report for `period`.
///
/// A period with no payroll records yields zero totals.
pub fn tax_report(
    store: &dyn PayrollStore,
    config: &PayrollConfig,
    period: &PayrollPeriod,
) -> EngineResult<TaxReport> {
    let table = config.tax_brackets();
    let records = store.fetch_payroll_records(period)?;

    let mut brackets: Vec<BracketTotal> = table
        .brackets()
        .iter()
        .enumerate()
        .map(|(bracket_index, b)| BracketTotal {
            bracket_index,
            lower: b.lower,
            upper: b.upper,
            employee_count: 0,
            taxable_base: Decimal::ZERO,
            income_tax: Decimal::ZERO,
        })
        .collect();

    let mut total_taxable_base = Decimal::ZERO;
    let mut total_income_tax = Decimal::ZERO;

    for record in &records {
        let income_tax = round_money(compute_income_tax(record.taxable_base, table)?);
        total_taxable_base += record.taxable_base;
        total_income_tax += income_tax;

        if let Some((index, _)) = table.bracket_for(record.taxable_base) {
            let total = &mut brackets[index];
            total.employee_count += 1;
            total.taxable_base += record.taxable_base;
            total.income_tax += income_tax;
        }
    }

    debug!(
        month = period.month(),
        year = period.year(),
        records = records.len(),
        "Built tax report"
    );

    Ok(TaxReport {
        period: *period,
        employee_count: records.len(),
        total_taxable_base,
        total_income_tax,
        brackets,
    })
}

/// Builds the social-security contribution report for `period`.
///
/// A period with no payroll records yields zero totals.
pub fn contribution_report(
    store: &dyn PayrollStore,
    config: &PayrollConfig,
    period: &PayrollPeriod,
) -> EngineResult<ContributionReport> {
    let records = store.fetch_payroll_records(period)?;

    let mut total_base_salary = Decimal::ZERO;
    let mut total_employee_share = Decimal::ZERO;
    let mut total_employer_share = Decimal::ZERO;

    for record in &records {
        let contribution = compute_contribution(record.base_salary, config.social_security())?;
        total_base_salary += record.base_salary;
        total_employee_share += round_money(contribution.employee_share);
        total_employer_share += round_money(contribution.employer_share);
    }

    debug!(
        month = period.month(),
        year = period.year(),
        records = records.len(),
        "Built contribution report"
    );

    Ok(ContributionReport {
        period: *period,
        employee_count: records.len(),
        total_base_salary,
        total_employee_share,
        total_employer_share,
        total_contribution: total_employee_share + total_employer_share,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contract, ContractState, Employee, EmployeeStatus, WorkSchedule};
    use crate::payroll::process_monthly_payroll;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn march() -> PayrollPeriod {
        PayrollPeriod::new(3, 2025).unwrap()
    }

    fn store_with_run(salaries: &[(&str, i64)]) -> InMemoryStore {
        let store = InMemoryStore::new();
        for (id, salary) in salaries {
            store
                .insert_employee(Employee {
                    id: id.to_string(),
                    name: id.to_string(),
                    base_salary: Some(Decimal::from(*salary)),
                    schedule: WorkSchedule::default(),
                    status: EmployeeStatus::Active,
                })
                .unwrap();
            store
                .insert_contract(Contract {
                    id: format!("ctr_{}", id),
                    employee_id: id.to_string(),
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    end_date: None,
                    state: ContractState::Active,
                    renewed_from: None,
                })
                .unwrap();
        }
        process_monthly_payroll(
            &store,
            &PayrollConfig::statutory(),
            &march(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
        .unwrap();
        store
    }

    #[test]
    fn test_tax_report_totals_and_brackets() {
        let store = store_with_run(&[("emp_001", 150_000), ("emp_002", 200_000), ("emp_003", 250_000)]);

        let report = tax_report(&store, &PayrollConfig::statutory(), &march()).unwrap();

        assert_eq!(report.employee_count, 3);
        assert_eq!(report.total_taxable_base, Decimal::from(600_000));
        // 0 + 20500 + 40250
        assert_eq!(report.total_income_tax, Decimal::from(60_750));
        assert_eq!(report.brackets.len(), 11);
        assert_eq!(report.brackets[0].employee_count, 1);
        assert_eq!(report.brackets[1].employee_count, 1);
        assert_eq!(report.brackets[1].income_tax, Decimal::from(20_500));
        assert_eq!(report.brackets[2].income_tax, Decimal::from(40_250));
        assert_eq!(report.brackets[3].employee_count, 0);
    }

    #[test]
    fn test_contribution_report_totals() {
        let store = store_with_run(&[("emp_001", 100_000), ("emp_002", 200_000)]);

        let report = contribution_report(&store, &PayrollConfig::statutory(), &march()).unwrap();

        assert_eq!(report.employee_count, 2);
        assert_eq!(report.total_base_salary, Decimal::from(300_000));
        assert_eq!(report.total_employee_share, Decimal::from(9_000));
        assert_eq!(report.total_employer_share, Decimal::from(24_000));
        assert_eq!(report.total_contribution, Decimal::from(33_000));
    }

    #[test]
    fn test_empty_period_yields_zero_totals() {
        let store = InMemoryStore::new();
        let config = PayrollConfig::statutory();

        let tax = tax_report(&store, &config, &march()).unwrap();
        assert_eq!(tax.employee_count, 0);
        assert_eq!(tax.total_income_tax, Decimal::ZERO);
        assert!(tax.brackets.iter().all(|b| b.employee_count == 0));

        let contributions = contribution_report(&store, &config, &march()).unwrap();
        assert_eq!(contributions.employee_count, 0);
        assert_eq!(contributions.total_contribution, Decimal::ZERO);
    }

    #[test]
    fn test_reports_only_cover_requested_period() {
        let store = store_with_run(&[("emp_001", 200_000)]);
        let april = PayrollPeriod::new(4, 2025).unwrap();

        let report = tax_report(&store, &PayrollConfig::statutory(), &april).unwrap();
        assert_eq!(report.employee_count, 0);
    }
}
