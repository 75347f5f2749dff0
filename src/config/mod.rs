//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from
//! YAML files: the income-tax bracket table, social-security rates, and the
//! policy that turns attendance into pay.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ao_2020").unwrap();
//! println!("Loaded: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    PayrollConfig, PayrollMetadata, PayrollPolicy, RenewalTerm, SocialSecurityRates, TaxBracket,
    TaxBracketTable,
};
