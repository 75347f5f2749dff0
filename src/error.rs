//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while processing payroll.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "contract".to_string(),
///     id: "ctr_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "contract not found: ctr_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was malformed: bad month/year, negative amount, missing field.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field or input that failed validation.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// An employee or contract id did not resolve.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up (e.g. "employee").
        entity: String,
        /// The id that was not found.
        id: String,
    },

    /// The operation would break the one-active-contract-per-employee
    /// invariant or an allowed lifecycle transition.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// Payroll for a single employee could not be computed.
    #[error("Computation failed for employee '{employee_id}': {message}")]
    Computation {
        /// The employee whose payroll could not be computed.
        employee_id: String,
        /// A description of the failure.
        message: String,
    },

    /// The persistence layer failed. Never swallowed by the core.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but its contents are inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Shorthand for a [`EngineError::Conflict`] error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Computation`] error.
    pub fn computation(employee_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Computation {
            employee_id: employee_id.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors that a payroll run isolates per employee
    /// instead of aborting.
    pub fn is_per_employee(&self) -> bool {
        matches!(self, Self::Computation { .. } | Self::Validation { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("month", "must be between 1 and 12");
        assert_eq!(error.to_string(), "Invalid month: must be between 1 and 12");
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = EngineError::not_found("employee", "emp_999");
        assert_eq!(error.to_string(), "employee not found: emp_999");
    }

    #[test]
    fn test_conflict_displays_message() {
        let error = EngineError::conflict("employee 'emp_001' already has an active contract");
        assert_eq!(
            error.to_string(),
            "Conflict: employee 'emp_001' already has an active contract"
        );
    }

    #[test]
    fn test_computation_displays_employee_and_message() {
        let error = EngineError::computation("emp_002", "base salary is not set");
        assert_eq!(
            error.to_string(),
            "Computation failed for employee 'emp_002': base salary is not set"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_per_employee_classification() {
        assert!(EngineError::computation("emp_001", "x").is_per_employee());
        assert!(EngineError::validation("income", "negative").is_per_employee());
        assert!(
            !EngineError::Persistence {
                message: "disk full".to_string()
            }
            .is_per_employee()
        );
        assert!(!EngineError::not_found("contract", "c1").is_per_employee());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_conflict() -> EngineResult<()> {
            Err(EngineError::conflict("two active contracts"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_conflict()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
