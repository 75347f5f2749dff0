//! Response types for the payroll engine API.
//!
//! This module defines the success bodies that wrap engine results, the
//! error body, and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::payroll::{PayrollOutcome, PayrollRun};

/// Response body for `/payroll/run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRunResponse {
    /// Summary line.
    pub message: String,
    /// Number of records stored.
    pub count: usize,
    /// Number of employees whose pay could not be computed.
    pub failed: usize,
    /// Contracts moved to `EXPIRED` before the run.
    #[serde(default)]
    pub expired_contracts: Vec<String>,
    /// One entry per eligible employee.
    pub results: Vec<PayrollOutcome>,
}

impl From<PayrollRun> for PayrollRunResponse {
    fn from(run: PayrollRun) -> Self {
        let count = run.processed_count();
        let failed = run.failed_count();
        Self {
            message: format!("Payroll for {} processed", run.period),
            count,
            failed,
            expired_contracts: run.expired_contracts,
            results: run.outcomes,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Field '{}' failed validation", field),
                ),
            },
            EngineError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", message),
            },
            EngineError::Conflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("CONFLICT", message),
            },
            EngineError::Computation { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("COMPUTATION_ERROR", "Computation failed", message),
            },
            EngineError::Persistence { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("INTERNAL_ERROR", "Internal error", message),
            },
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EngineError::validation("month", "13"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (EngineError::not_found("contract", "x"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (EngineError::conflict("busy"), StatusCode::CONFLICT, "CONFLICT"),
            (
                EngineError::computation("emp_001", "no salary"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMPUTATION_ERROR",
            ),
            (
                EngineError::Persistence {
                    message: "down".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                EngineError::InvalidConfig {
                    message: "bad".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let response: ApiErrorResponse = EngineError::not_found("contract", "ctr_404").into();
        assert_eq!(response.error.message, "contract not found: ctr_404");
    }
}
