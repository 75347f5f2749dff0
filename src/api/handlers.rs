//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::contracts;
use crate::error::EngineError;
use crate::payroll::{contribution_report, process_monthly_payroll, tax_report};

use super::request::PeriodRequest;
use super::response::{ApiError, ApiErrorResponse, PayrollRunResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/run", post(run_payroll_handler))
        .route("/reports/tax", post(tax_report_handler))
        .route("/reports/social-security", post(contribution_report_handler))
        .route("/contracts", get(list_contracts_handler))
        .route("/contracts/:id/renew", post(renew_contract_handler))
        .route("/contracts/:id/terminate", post(terminate_contract_handler))
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Extracts the request body, turning a rejection into a `400` response.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    let response = ApiErrorResponse::bad_request(error);
    Err(json_response(response.status, response.error))
}

/// Handler for POST /payroll/run.
async fn run_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match process_monthly_payroll(state.store(), state.config().config(), &period, today()) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                month = period.month(),
                year = period.year(),
                processed = run.processed_count(),
                failed = run.failed_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run completed"
            );
            json_response(StatusCode::OK, PayrollRunResponse::from(run))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /reports/tax.
async fn tax_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tax report request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match request
        .period()
        .and_then(|period| tax_report(state.store(), state.config().config(), &period))
    {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /reports/social-security.
async fn contribution_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing social security report request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match request
        .period()
        .and_then(|period| contribution_report(state.store(), state.config().config(), &period))
    {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /contracts.
async fn list_contracts_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();

    match contracts::list_contracts(state.store(), today()) {
        Ok(contracts) => {
            info!(
                correlation_id = %correlation_id,
                count = contracts.len(),
                "Listed contracts"
            );
            json_response(StatusCode::OK, contracts)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /contracts/:id/renew.
///
/// The successor's term comes from the configured renewal policy.
async fn renew_contract_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, contract_id = %contract_id, "Renewing contract");

    let term = state.config().config().policy().renewal;
    match contracts::renew(state.store(), &contract_id, &term) {
        Ok(successor) => json_response(StatusCode::CREATED, successor),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /contracts/:id/terminate.
async fn terminate_contract_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, contract_id = %contract_id, "Terminating contract");

    match contracts::terminate(state.store(), &contract_id) {
        Ok(contract) => json_response(StatusCode::OK, contract),
        Err(err) => error_response(correlation_id, err),
    }
}
