//! Social-security contribution calculation.
//!
//! Contributions are fixed percentages of base salary, split between an
//! employee share (withheld from pay) and an employer share (paid on top).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SocialSecurityRates;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Employee and employer shares of a social-security contribution.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_contribution;
/// use payroll_engine::config::SocialSecurityRates;
/// use rust_decimal::Decimal;
///
/// let c = compute_contribution(Decimal::from(200_000), &SocialSecurityRates::statutory()).unwrap();
/// assert_eq!(c.employee_share, Decimal::from(6_000));
/// assert_eq!(c.employer_share, Decimal::from(16_000));
/// assert_eq!(c.total(), Decimal::from(22_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Withheld from the employee's pay.
    pub employee_share: Decimal,
    /// Paid by the employer.
    pub employer_share: Decimal,
}

impl Contribution {
    /// Sum of both shares.
    pub fn total(&self) -> Decimal {
        self.employee_share + self.employer_share
    }
}

/// Computes the social-security contribution on `base_salary`. Pure.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for a negative base salary.
pub fn compute_contribution(
    base_salary: Decimal,
    rates: &SocialSecurityRates,
) -> EngineResult<Contribution> {
    if base_salary < Decimal::ZERO {
        return Err(EngineError::validation(
            "base_salary",
            format!("{} is negative", base_salary),
        ));
    }

    Ok(Contribution {
        employee_share: base_salary * rates.employee_rate,
        employer_share: base_salary * rates.employer_rate,
    })
}

/// Computes the contribution and records an audit step.
pub fn calculate_contribution(
    base_salary: Decimal,
    rates: &SocialSecurityRates,
    step_number: u32,
) -> EngineResult<(Contribution, AuditStep)> {
    let contribution = compute_contribution(base_salary, rates)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_security".to_string(),
        rule_name: "Social Security Contribution".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "employee_rate": rates.employee_rate.normalize().to_string(),
            "employer_rate": rates.employer_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "employee_share": contribution.employee_share.normalize().to_string(),
            "employer_share": contribution.employer_share.normalize().to_string()
        }),
        reasoning: format!(
            "{} × {} withheld from employee, {} × {} paid by employer",
            base_salary.normalize(),
            rates.employee_rate.normalize(),
            base_salary.normalize(),
            rates.employer_rate.normalize()
        ),
    };

    Ok((contribution, audit_step))
}
