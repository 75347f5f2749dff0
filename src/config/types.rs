//! Configuration types for payroll processing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the built-in
//! statutory defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the payroll configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollMetadata {
    /// Short identifier for this configuration (e.g., "irt_2020").
    pub code: String,
    /// The human-readable name of the configuration.
    pub name: String,
    /// Currency code all amounts are expressed in.
    pub currency: String,
    /// The version or effective date of the configuration.
    pub version: String,
}

/// One row of the progressive income-tax table.
///
/// Covers incomes in `(lower, upper]`. An open `upper` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Exclusive lower bound.
    pub lower: Decimal,
    /// Inclusive upper bound. `None` for the last bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Fixed tax due on reaching this bracket.
    pub fixed_amount: Decimal,
    /// Marginal rate applied to income above `excess_base`.
    pub rate: Decimal,
    /// The income from which the marginal rate applies.
    pub excess_base: Decimal,
}

impl TaxBracket {
    /// Returns true if `income` falls in `(lower, upper]`.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.lower && self.upper.is_none_or(|upper| income <= upper)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawBracketTable {
    brackets: Vec<TaxBracket>,
}

/// An ordered, contiguous bracket table covering `[0, ∞)`.
///
/// Construction validates the table, so every income above zero matches
/// exactly one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBracketTable")]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Creates a validated table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the table is empty, does
    /// not start at zero, has gaps or overlaps, has a bounded last bracket
    /// or an open bracket before the last, or has a rate outside `[0, 1]`.
    /// Also rejects a table whose tax would drop when income crosses into
    /// the next bracket, or start below zero.
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidConfig { message };

        let first = brackets
            .first()
            .ok_or_else(|| invalid("tax bracket table is empty".to_string()))?;
        if first.lower != Decimal::ZERO {
            return Err(invalid(format!(
                "first tax bracket must start at 0, starts at {}",
                first.lower
            )));
        }

        let last_index = brackets.len() - 1;
        let mut previous_upper: Option<Decimal> = None;
        let mut previous_tax_at_upper = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "tax bracket {} has rate {} outside [0, 1]",
                    index, bracket.rate
                )));
            }
            if let Some(expected_lower) = previous_upper {
                if bracket.lower != expected_lower {
                    return Err(invalid(format!(
                        "tax bracket {} starts at {} but previous bracket ends at {}",
                        index, bracket.lower, expected_lower
                    )));
                }
            }
            match bracket.upper {
                Some(upper) if upper <= bracket.lower => {
                    return Err(invalid(format!(
                        "tax bracket {} has upper bound {} not above lower bound {}",
                        index, upper, bracket.lower
                    )));
                }
                Some(_) if index == last_index => {
                    return Err(invalid("last tax bracket must be unbounded".to_string()));
                }
                None if index != last_index => {
                    return Err(invalid(format!(
                        "only the last tax bracket may be unbounded, bracket {} is",
                        index
                    )));
                }
                _ => {}
            }

            let tax_at = |income: Decimal| {
                income
                    .checked_sub(bracket.excess_base)
                    .and_then(|excess| excess.checked_mul(bracket.rate))
                    .and_then(|marginal| marginal.checked_add(bracket.fixed_amount))
                    .ok_or_else(|| invalid(format!("tax bracket {} overflows", index)))
            };
            let tax_at_lower = tax_at(bracket.lower)?;
            if tax_at_lower < previous_tax_at_upper {
                return Err(invalid(format!(
                    "tax bracket {} starts at tax {} below {} owed at the end of the previous bracket",
                    index, tax_at_lower, previous_tax_at_upper
                )));
            }
            if let Some(upper) = bracket.upper {
                previous_tax_at_upper = tax_at(upper)?;
            }
            previous_upper = bracket.upper;
        }

        Ok(Self { brackets })
    }

    /// The brackets, in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Finds the bracket containing `income`, with its index.
    ///
    /// Returns `None` for incomes of zero or below.
    pub fn bracket_for(&self, income: Decimal) -> Option<(usize, &TaxBracket)> {
        self.brackets
            .iter()
            .enumerate()
            .find(|(_, bracket)| bracket.contains(income))
    }

    /// The statutory monthly table (IRT Group A, 2020).
    pub fn statutory() -> Self {
        let row = |lower: i64, upper: Option<i64>, fixed: i64, rate: Decimal| TaxBracket {
            lower: Decimal::from(lower),
            upper: upper.map(Decimal::from),
            fixed_amount: Decimal::from(fixed),
            rate,
            excess_base: Decimal::from(lower),
        };

        Self {
            brackets: vec![
                row(0, Some(150_000), 0, Decimal::ZERO),
                row(150_000, Some(200_000), 12_500, Decimal::new(16, 2)),
                row(200_000, Some(300_000), 31_250, Decimal::new(18, 2)),
                row(300_000, Some(500_000), 49_250, Decimal::new(19, 2)),
                row(500_000, Some(1_000_000), 87_250, Decimal::new(20, 2)),
                row(1_000_000, Some(1_500_000), 187_250, Decimal::new(21, 2)),
                row(1_500_000, Some(2_000_000), 292_250, Decimal::new(22, 2)),
                row(2_000_000, Some(2_500_000), 402_250, Decimal::new(23, 2)),
                row(2_500_000, Some(5_000_000), 517_250, Decimal::new(24, 2)),
                row(5_000_000, Some(10_000_000), 1_117_250, Decimal::new(245, 3)),
                row(10_000_000, None, 2_342_250, Decimal::new(25, 2)),
            ],
        }
    }
}

impl TryFrom<RawBracketTable> for TaxBracketTable {
    type Error = EngineError;

    fn try_from(raw: RawBracketTable) -> Result<Self, Self::Error> {
        Self::new(raw.brackets)
    }
}

/// Social-security contribution rates, as fractions of base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityRates {
    /// Share withheld from the employee (e.g., 0.03).
    pub employee_rate: Decimal,
    /// Share paid by the employer (e.g., 0.08).
    pub employer_rate: Decimal,
}

impl SocialSecurityRates {
    /// The statutory rates: 3% employee, 8% employer.
    pub fn statutory() -> Self {
        Self {
            employee_rate: Decimal::new(3, 2),
            employer_rate: Decimal::new(8, 2),
        }
    }

    fn validate(&self) -> EngineResult<()> {
        for (name, rate) in [
            ("employee_rate", self.employee_rate),
            ("employer_rate", self.employer_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(EngineError::InvalidConfig {
                    message: format!("social security {} {} outside [0, 1]", name, rate),
                });
            }
        }
        Ok(())
    }
}

/// How the end date of a renewed contract is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenewalTerm {
    /// The successor runs as many days as the original.
    SameDuration,
    /// The successor runs a fixed number of calendar months.
    Months {
        /// Length of the successor in months.
        months: u32,
    },
    /// The successor has no end date.
    Indefinite,
}

/// Rules for turning attendance into pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Hourly multiplier for overtime at a 50% premium.
    pub overtime_50_multiplier: Decimal,
    /// Hourly multiplier for overtime at a 100% premium.
    pub overtime_100_multiplier: Decimal,
    /// Whether unexcused absences are deducted at the daily rate.
    #[serde(default = "default_true")]
    pub deduct_unpaid_absences: bool,
    /// Whether the employee's social-security share is subtracted from
    /// gross pay before income tax.
    #[serde(default)]
    pub deduct_social_security_from_taxable_base: bool,
    /// End date rule for renewed contracts.
    pub renewal: RenewalTerm,
}

fn default_true() -> bool {
    true
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            overtime_50_multiplier: Decimal::new(15, 1),
            overtime_100_multiplier: Decimal::from(2),
            deduct_unpaid_absences: true,
            deduct_social_security_from_taxable_base: false,
            renewal: RenewalTerm::SameDuration,
        }
    }
}

impl PayrollPolicy {
    fn validate(&self) -> EngineResult<()> {
        if self.overtime_50_multiplier < Decimal::ONE || self.overtime_100_multiplier < Decimal::ONE
        {
            return Err(EngineError::InvalidConfig {
                message: "overtime multipliers must be at least 1".to_string(),
            });
        }
        if let RenewalTerm::Months { months: 0 } = self.renewal {
            return Err(EngineError::InvalidConfig {
                message: "renewal term of 0 months".to_string(),
            });
        }
        Ok(())
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollConfig {
    metadata: PayrollMetadata,
    tax_brackets: TaxBracketTable,
    social_security: SocialSecurityRates,
    policy: PayrollPolicy,
}

impl PayrollConfig {
    /// Creates a validated configuration from its component parts.
    pub fn new(
        metadata: PayrollMetadata,
        tax_brackets: TaxBracketTable,
        social_security: SocialSecurityRates,
        policy: PayrollPolicy,
    ) -> EngineResult<Self> {
        social_security.validate()?;
        policy.validate()?;
        Ok(Self {
            metadata,
            tax_brackets,
            social_security,
            policy,
        })
    }

    /// The built-in statutory configuration.
    pub fn statutory() -> Self {
        Self {
            metadata: PayrollMetadata {
                code: "irt_2020".to_string(),
                name: "Monthly payroll - IRT Group A (2020)".to_string(),
                currency: "AOA".to_string(),
                version: "2020-09-01".to_string(),
            },
            tax_brackets: TaxBracketTable::statutory(),
            social_security: SocialSecurityRates::statutory(),
            policy: PayrollPolicy::default(),
        }
    }

    /// Returns a copy with `policy` replacing the current policy.
    pub fn with_policy(mut self, policy: PayrollPolicy) -> EngineResult<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        &self.metadata
    }

    /// Returns the income-tax bracket table.
    pub fn tax_brackets(&self) -> &TaxBracketTable {
        &self.tax_brackets
    }

    /// Returns the social-security rates.
    pub fn social_security(&self) -> &SocialSecurityRates {
        &self.social_security
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}
