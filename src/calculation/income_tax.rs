//! Progressive income-tax withholding.
//!
//! Each bracket of the table covers incomes in `(lower, upper]`. An income
//! exactly on a boundary belongs to the lower bracket.
//!
//! ## Formula
//!
//! `tax = fixed_amount + (income − excess_base) × rate`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxBracketTable;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of an income-tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// The tax withheld.
    pub income_tax: Decimal,
    /// Index of the matched bracket. `None` when income is zero.
    pub bracket_index: Option<usize>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the income tax withheld on `taxable_income`.
///
/// Pure and deterministic. The result is not rounded.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for negative income. Negative income
/// is never clamped to zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_income_tax;
/// use payroll_engine::config::TaxBracketTable;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let table = TaxBracketTable::statutory();
///
/// // On the first boundary: still exempt.
/// let tax = compute_income_tax(Decimal::from(150_000), &table).unwrap();
/// assert_eq!(tax, Decimal::ZERO);
///
/// // One unit above: second bracket.
/// let tax = compute_income_tax(Decimal::from(150_001), &table).unwrap();
/// assert_eq!(tax, Decimal::from_str("12500.16").unwrap());
/// ```
pub fn compute_income_tax(taxable_income: Decimal, table: &TaxBracketTable) -> EngineResult<Decimal> {
    if taxable_income < Decimal::ZERO {
        return Err(EngineError::validation(
            "taxable_income",
            format!("{} is negative", taxable_income),
        ));
    }

    Ok(match table.bracket_for(taxable_income) {
        Some((_, bracket)) => {
            bracket.fixed_amount + (taxable_income - bracket.excess_base) * bracket.rate
        }
        None => Decimal::ZERO,
    })
}

/// Computes income tax and records an audit step describing the bracket
/// that was applied.
pub fn calculate_income_tax(
    taxable_income: Decimal,
    table: &TaxBracketTable,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let income_tax = compute_income_tax(taxable_income, table)?;
    let matched = table.bracket_for(taxable_income);

    let reasoning = match matched {
        Some((index, bracket)) => {
            let upper = bracket
                .upper
                .map(|u| u.normalize().to_string())
                .unwrap_or_else(|| "∞".to_string());
            format!(
                "Taxable base {} falls in bracket {} ({}, {}]: {} + ({} − {}) × {} = {}",
                taxable_income.normalize(),
                index,
                bracket.lower.normalize(),
                upper,
                bracket.fixed_amount.normalize(),
                taxable_income.normalize(),
                bracket.excess_base.normalize(),
                bracket.rate.normalize(),
                income_tax.normalize()
            )
        }
        None => format!(
            "Taxable base {} is zero, no income tax due",
            taxable_income.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax Withholding".to_string(),
        input: serde_json::json!({
            "taxable_base": taxable_income.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket_index": matched.map(|(i, _)| i),
            "income_tax": income_tax.normalize().to_string()
        }),
        reasoning,
    };

    Ok(IncomeTaxResult {
        income_tax,
        bracket_index: matched.map(|(i, _)| i),
        audit_step,
    })
}
