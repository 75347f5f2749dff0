//! HTTP API module for the payroll engine.
//!
//! This module exposes payroll runs, period reports and contract lifecycle
//! actions as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::PeriodRequest;
pub use response::{ApiError, ApiErrorResponse, PayrollRunResponse};
pub use state::AppState;
