//! Employment contract model and lifecycle states.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DateRange;

/// The persisted lifecycle state of a contract.
///
/// ```text
/// ACTIVE ──(end date passed)──> EXPIRED ──> RENEWED | TERMINATED
///    └───────────────(explicit action)────> RENEWED | TERMINATED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractState {
    /// In force. At most one per employee.
    Active,
    /// End date has passed; not yet renewed or terminated.
    Expired,
    /// Superseded by a successor contract.
    Renewed,
    /// Ended by an explicit termination.
    Terminated,
}

/// How a contract stands on a given date, combining its stored state with
/// its end date.
///
/// A contract whose stored state is still `Active` but whose end date is in
/// the past reports [`ContractStanding::DueForExpiry`] until the lazy expiry
/// check persists the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStanding {
    /// In force on the date.
    Active,
    /// Stored as active but its end date is before the date.
    DueForExpiry,
    /// Stored as expired.
    Expired,
    /// Stored as renewed.
    Renewed,
    /// Stored as terminated.
    Terminated,
}

/// An employment contract belonging to exactly one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Contract, ContractStanding, ContractState};
/// use chrono::NaiveDate;
///
/// let contract = Contract {
///     id: "ctr_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     end_date: Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
///     state: ContractState::Active,
///     renewed_from: None,
/// };
///
/// let dec_31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
/// let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// assert_eq!(contract.standing(dec_31), ContractStanding::Active);
/// assert_eq!(contract.standing(jan_1), ContractStanding::DueForExpiry);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier for the contract.
    pub id: String,
    /// The employee this contract belongs to.
    pub employee_id: String,
    /// First day the contract is in force.
    pub start_date: NaiveDate,
    /// Last day the contract is in force. `None` means indefinite.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Stored lifecycle state.
    pub state: ContractState,
    /// The contract this one renewed, if any. Lookup only.
    #[serde(default)]
    pub renewed_from: Option<String>,
}

impl Contract {
    /// Returns true if the stored state is `Active`.
    pub fn is_active(&self) -> bool {
        self.state == ContractState::Active
    }

    /// Returns true if the contract has a fixed end date before `as_of`.
    pub fn has_lapsed(&self, as_of: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < as_of)
    }

    /// Classifies the contract on `as_of` without mutating it.
    pub fn standing(&self, as_of: NaiveDate) -> ContractStanding {
        match self.state {
            ContractState::Active if self.has_lapsed(as_of) => ContractStanding::DueForExpiry,
            ContractState::Active => ContractStanding::Active,
            ContractState::Expired => ContractStanding::Expired,
            ContractState::Renewed => ContractStanding::Renewed,
            ContractState::Terminated => ContractStanding::Terminated,
        }
    }

    /// Returns true if the contract's validity covers at least one day of
    /// `range`, regardless of stored state.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        self.start_date <= range.end && self.end_date.is_none_or(|end| end >= range.start)
    }

    /// Returns true if the contract was in force on some day of `range`.
    ///
    /// Expiry and renewal end a contract at its end date, so an `EXPIRED` or
    /// `RENEWED` contract still covers the days it ran. A `TERMINATED`
    /// contract covers nothing.
    pub fn covers(&self, range: &DateRange) -> bool {
        self.state != ContractState::Terminated && self.overlaps(range)
    }

    /// Number of days the contract runs, both ends inclusive.
    /// `None` for indefinite contracts.
    pub fn duration_days(&self) -> Option<i64> {
        self.end_date
            .map(|end| (end - self.start_date).num_days() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(end: Option<NaiveDate>, state: ContractState) -> Contract {
        Contract {
            id: "ctr_001".to_string(),
            employee_id: "emp_001".to_string(),
            start_date: date(2024, 1, 1),
            end_date: end,
            state,
            renewed_from: None,
        }
    }

    #[test]
    fn test_standing_active_on_end_date() {
        let c = contract(Some(date(2024, 12, 31)), ContractState::Active);
        assert_eq!(c.standing(date(2024, 12, 31)), ContractStanding::Active);
    }

    #[test]
    fn test_standing_due_for_expiry_day_after_end() {
        let c = contract(Some(date(2024, 12, 31)), ContractState::Active);
        assert_eq!(c.standing(date(2025, 1, 1)), ContractStanding::DueForExpiry);
    }

    #[test]
    fn test_indefinite_contract_never_lapses() {
        let c = contract(None, ContractState::Active);
        assert!(!c.has_lapsed(date(2999, 1, 1)));
        assert_eq!(c.standing(date(2999, 1, 1)), ContractStanding::Active);
        assert_eq!(c.duration_days(), None);
    }

    #[test]
    fn test_standing_reflects_stored_terminal_states() {
        let as_of = date(2024, 6, 1);
        let end = Some(date(2024, 12, 31));
        assert_eq!(
            contract(end, ContractState::Expired).standing(as_of),
            ContractStanding::Expired
        );
        assert_eq!(
            contract(end, ContractState::Renewed).standing(as_of),
            ContractStanding::Renewed
        );
        assert_eq!(
            contract(end, ContractState::Terminated).standing(as_of),
            ContractStanding::Terminated
        );
    }

    #[test]
    fn test_overlaps_month() {
        let c = contract(Some(date(2024, 3, 10)), ContractState::Active);
        let march = DateRange {
            start: date(2024, 3, 1),
            end: date(2024, 3, 31),
        };
        let april = DateRange {
            start: date(2024, 4, 1),
            end: date(2024, 4, 30),
        };
        assert!(c.overlaps(&march));
        assert!(!c.overlaps(&april));
    }

    #[test]
    fn test_overlaps_when_starting_on_last_day() {
        let mut c = contract(None, ContractState::Active);
        c.start_date = date(2024, 5, 31);
        let may = DateRange {
            start: date(2024, 5, 1),
            end: date(2024, 5, 31),
        };
        assert!(c.overlaps(&may));
        c.start_date = date(2024, 6, 1);
        assert!(!c.overlaps(&may));
    }

    #[test]
    fn test_covers_ignores_expiry_and_renewal_but_not_termination() {
        let december = DateRange {
            start: date(2024, 12, 1),
            end: date(2024, 12, 31),
        };
        let end = Some(date(2024, 12, 31));
        assert!(contract(end, ContractState::Active).covers(&december));
        assert!(contract(end, ContractState::Expired).covers(&december));
        assert!(contract(end, ContractState::Renewed).covers(&december));
        assert!(!contract(end, ContractState::Terminated).covers(&december));

        let january = DateRange {
            start: date(2025, 1, 1),
            end: date(2025, 1, 31),
        };
        assert!(!contract(end, ContractState::Expired).covers(&january));
    }

    #[test]
    fn test_duration_days_inclusive() {
        let c = contract(Some(date(2024, 12, 31)), ContractState::Active);
        assert_eq!(c.duration_days(), Some(366));
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&ContractState::Renewed).unwrap(),
            "\"RENEWED\""
        );
        let state: ContractState = serde_json::from_str("\"EXPIRED\"").unwrap();
        assert_eq!(state, ContractState::Expired);
    }

    #[test]
    fn test_deserialize_contract_defaults() {
        let json = r#"{
            "id": "ctr_002",
            "employee_id": "emp_002",
            "start_date": "2025-01-01",
            "state": "ACTIVE"
        }"#;
        let c: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(c.end_date, None);
        assert_eq!(c.renewed_from, None);
        assert!(c.is_active());
    }
}
