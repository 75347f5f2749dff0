//! Monthly payroll processing and period reports.

mod report;
mod run;

pub use report::{BracketTotal, ContributionReport, TaxReport, contribution_report, tax_report};
pub use run::{PayrollOutcome, PayrollRun, compute_payroll_record, process_monthly_payroll};
