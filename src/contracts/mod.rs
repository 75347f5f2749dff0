//! Contract lifecycle management.
//!
//! Opening, lazy expiry, renewal and termination of employment contracts.
//! All operations go through a [`PayrollStore`](crate::store::PayrollStore)
//! and take the reference date explicitly.

mod lifecycle;

pub use lifecycle::{check_and_transition_expired, list_contracts, open_contract, renew, terminate};
