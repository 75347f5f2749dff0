//! Contract state transitions.
//!
//! ```text
//! ACTIVE ──(as_of > end date)──> EXPIRED
//!   │                              │
//!   ├──────────> RENEWED <─────────┤
//!   └──────────> TERMINATED <──────┘
//! ```
//!
//! Expiry is lazy: nothing flips a contract to `EXPIRED` until
//! [`check_and_transition_expired`] observes it, which every payroll run and
//! every contract listing does first.

use chrono::{Duration, Months, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RenewalTerm;
use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, ContractState, EmployeeStatus};
use crate::store::PayrollStore;

/// Moves every `ACTIVE` contract whose end date is before `as_of` to
/// `EXPIRED` and returns their ids.
///
/// Idempotent: a second call with the same `as_of` finds nothing to do.
pub fn check_and_transition_expired(
    store: &dyn PayrollStore,
    as_of: NaiveDate,
) -> EngineResult<Vec<String>> {
    let mut expired = Vec::new();

    for contract in store.fetch_contracts()? {
        if contract.is_active() && contract.has_lapsed(as_of) {
            store.update_contract_state(&contract.id, ContractState::Expired)?;
            info!(
                contract_id = %contract.id,
                employee_id = %contract.employee_id,
                end_date = ?contract.end_date,
                "Contract expired"
            );
            expired.push(contract.id);
        }
    }

    debug!(as_of = %as_of, count = expired.len(), "Expiry check complete");
    Ok(expired)
}

/// Lists every contract after bringing expiry states up to date.
pub fn list_contracts(store: &dyn PayrollStore, as_of: NaiveDate) -> EngineResult<Vec<Contract>> {
    check_and_transition_expired(store, as_of)?;
    store.fetch_contracts()
}

/// Opens a new `ACTIVE` contract for an employee.
///
/// # Errors
///
/// - [`EngineError::Validation`] if `end_date` is before `start_date`
/// - [`EngineError::NotFound`] if the employee does not exist
/// - [`EngineError::Conflict`] if the employee already holds an `ACTIVE`
///   contract
pub fn open_contract(
    store: &dyn PayrollStore,
    employee_id: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> EngineResult<Contract> {
    if end_date.is_some_and(|end| end < start_date) {
        return Err(EngineError::validation(
            "end_date",
            format!("contract cannot end before it starts on {}", start_date),
        ));
    }

    let contract = store.insert_contract(Contract {
        id: Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        start_date,
        end_date,
        state: ContractState::Active,
        renewed_from: None,
    })?;

    info!(
        contract_id = %contract.id,
        employee_id,
        start_date = %start_date,
        "Contract opened"
    );
    Ok(contract)
}

/// Computes the end date of a successor starting on `start`.
fn successor_end(
    original: &Contract,
    start: NaiveDate,
    term: &RenewalTerm,
) -> EngineResult<Option<NaiveDate>> {
    let out_of_range = || {
        EngineError::validation(
            "end_date",
            format!("renewal of contract '{}' ends out of range", original.id),
        )
    };

    match term {
        RenewalTerm::Indefinite => Ok(None),
        RenewalTerm::SameDuration => {
            let days = original.duration_days().ok_or_else(out_of_range)?;
            start
                .checked_add_signed(Duration::days(days - 1))
                .map(Some)
                .ok_or_else(out_of_range)
        }
        RenewalTerm::Months { months } => start
            .checked_add_months(Months::new(*months))
            .and_then(|d| d.pred_opt())
            .map(Some)
            .ok_or_else(out_of_range),
    }
}

/// Renews a contract, creating its successor.
///
/// The successor starts the day after the original ends and runs for the
/// given term. The original becomes `RENEWED`; the successor is `ACTIVE`
/// and points back to it through `renewed_from`.
///
/// # Errors
///
/// - [`EngineError::NotFound`] for an unknown contract id
/// - [`EngineError::Validation`] if the contract has no end date
/// - [`EngineError::Conflict`] if the contract is already `RENEWED` or
///   `TERMINATED`, or its employee holds another `ACTIVE` contract
pub fn renew(
    store: &dyn PayrollStore,
    contract_id: &str,
    term: &RenewalTerm,
) -> EngineResult<Contract> {
    let original = store
        .fetch_contract(contract_id)?
        .ok_or_else(|| EngineError::not_found("contract", contract_id))?;

    if matches!(
        original.state,
        ContractState::Renewed | ContractState::Terminated
    ) {
        return Err(EngineError::conflict(format!(
            "contract '{}' is {:?} and cannot be renewed",
            contract_id, original.state
        )));
    }

    let end_date = original.end_date.ok_or_else(|| {
        EngineError::validation(
            "end_date",
            format!("contract '{}' is indefinite and cannot be renewed", contract_id),
        )
    })?;

    if store.has_other_active_contract(&original.employee_id, &original.id)? {
        return Err(EngineError::conflict(format!(
            "employee '{}' already has another active contract",
            original.employee_id
        )));
    }

    let start_date = end_date
        .succ_opt()
        .ok_or_else(|| EngineError::validation("end_date", "no day after contract end"))?;
    let successor = Contract {
        id: Uuid::new_v4().to_string(),
        employee_id: original.employee_id.clone(),
        start_date,
        end_date: successor_end(&original, start_date, term)?,
        state: ContractState::Active,
        renewed_from: Some(original.id.clone()),
    };

    store.update_contract_state(&original.id, ContractState::Renewed)?;
    let successor = match store.insert_contract(successor) {
        Ok(successor) => successor,
        Err(e) => {
            store.update_contract_state(&original.id, original.state)?;
            return Err(e);
        }
    };

    info!(
        contract_id = %original.id,
        successor_id = %successor.id,
        employee_id = %successor.employee_id,
        start_date = %successor.start_date,
        end_date = ?successor.end_date,
        "Contract renewed"
    );
    Ok(successor)
}

/// Terminates a contract and marks its employee `INACTIVE`.
///
/// The employee stays `ACTIVE` if they hold another `ACTIVE` contract, as
/// after an expired contract was followed by a newly opened one.
/// Terminating an already terminated contract returns it unchanged.
///
/// # Errors
///
/// - [`EngineError::NotFound`] for an unknown contract id
/// - [`EngineError::Conflict`] if the contract was renewed
pub fn terminate(store: &dyn PayrollStore, contract_id: &str) -> EngineResult<Contract> {
    let mut contract = store
        .fetch_contract(contract_id)?
        .ok_or_else(|| EngineError::not_found("contract", contract_id))?;

    match contract.state {
        ContractState::Terminated => return Ok(contract),
        ContractState::Renewed => {
            return Err(EngineError::conflict(format!(
                "contract '{}' was renewed; terminate its successor instead",
                contract_id
            )));
        }
        ContractState::Active | ContractState::Expired => {}
    }

    store.update_contract_state(contract_id, ContractState::Terminated)?;
    let still_employed = store.has_other_active_contract(&contract.employee_id, contract_id)?;
    if !still_employed {
        store.update_employee_status(&contract.employee_id, EmployeeStatus::Inactive)?;
    }
    contract.state = ContractState::Terminated;

    info!(
        contract_id,
        employee_id = %contract.employee_id,
        still_employed,
        "Contract terminated"
    );
    Ok(contract)
}
