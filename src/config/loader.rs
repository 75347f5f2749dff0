//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    PayrollConfig, PayrollMetadata, PayrollPolicy, SocialSecurityRates, TaxBracketTable,
};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory.
/// The tax table and rates are fixed for the life of the process; changing
/// them is a deployment, not a data update.
///
/// # Directory Structure
///
/// ```text
/// config/ao_2020/
/// ├── payroll.yaml          # Metadata: code, name, currency, version
/// ├── tax_brackets.yaml     # Progressive income-tax table
/// ├── social_security.yaml  # Employee and employer contribution rates
/// └── policy.yaml           # Overtime multipliers, absences, renewal term
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ao_2020")?;
/// println!("Loaded payroll configuration: {}", loader.metadata().name);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/ao_2020")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or an invalid tax table (`ConfigParseError`)
    /// - The rates or policy are out of range (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PayrollMetadata>(&path.join("payroll.yaml"))?;
        let tax_brackets = Self::load_yaml::<TaxBracketTable>(&path.join("tax_brackets.yaml"))?;
        let social_security =
            Self::load_yaml::<SocialSecurityRates>(&path.join("social_security.yaml"))?;
        let policy = Self::load_yaml::<PayrollPolicy>(&path.join("policy.yaml"))?;

        let config = PayrollConfig::new(metadata, tax_brackets, social_security, policy)?;

        debug!(
            code = %config.metadata().code,
            brackets = config.tax_brackets().brackets().len(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Wraps the built-in statutory configuration.
    pub fn statutory() -> Self {
        Self {
            config: PayrollConfig::statutory(),
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        self.config.metadata()
    }
}
