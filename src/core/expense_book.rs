//! Expense book: the application service over the state store
//!
//! This module provides the ExpenseBook that orchestrates the user-facing
//! flows by coordinating between the StateStore, the Persister and the
//! settlement engine.
//!
//! Every mutation runs in two explicit steps:
//! 1. Validate the input and apply it to the in-memory store
//! 2. Schedule a best-effort write of the affected collection
//!
//! Validation failures abort before step 1, so nothing is mutated. Storage
//! failures in step 2 never undo step 1; they come back as
//! [`PersistenceAlert`]s from [`ExpenseBook::drain_alerts`] or
//! [`ExpenseBook::flush`].

use crate::core::settlement::{settle_with_status, MemberBalance, SettlementStatus};
use crate::core::state_store::StateStore;
use crate::core::traits::KeyValueStore;
use crate::storage::{PersistenceAlert, Persister};
use crate::types::{Expense, Group, GroupId, Person, PersonDraft, PersonId, SplitError};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Longest accepted mobile number, in digits
pub const MAX_MOBILE_DIGITS: usize = 10;

/// Timestamp-based id generator
///
/// Ids are milliseconds since the Unix epoch. The generator never hands out
/// the same value twice and never goes below an id it has observed, so two
/// records created within one millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u128,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for the current wall-clock time
    pub fn next_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.next_at(now)
    }

    /// Next id given the current time in milliseconds
    pub fn next_at(&mut self, now_ms: u128) -> String {
        let id = now_ms.max(self.last + 1);
        self.last = id;
        id.to_string()
    }

    /// Make sure future ids sort after an existing numeric id
    pub fn observe(&mut self, id: &str) {
        if let Ok(value) = id.parse::<u128>() {
            self.last = self.last.max(value);
        }
    }
}

/// Everything the group-details view renders
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetails {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<Person>,
    pub expenses: Vec<Expense>,
    /// Sum of all expenses
    pub total: f64,
    /// Per-member balances; empty when nothing has been spent
    pub balances: Vec<MemberBalance>,
    /// Settlement section state
    pub status: SettlementStatus,
}

/// Application service owning the state store and its persister
pub struct ExpenseBook {
    state: StateStore,
    persister: Persister,
    ids: IdGenerator,
}

impl ExpenseBook {
    /// Create a book over an existing state, without touching storage
    pub fn new(state: StateStore, persister: Persister) -> Self {
        let mut ids = IdGenerator::new();
        for person in state.persons() {
            ids.observe(&person.id);
        }
        for group in state.groups() {
            ids.observe(&group.id);
        }
        ExpenseBook {
            state,
            persister,
            ids,
        }
    }

    /// Open a book, hydrating it from the given store
    ///
    /// # Errors
    ///
    /// Returns an error if stored data cannot be read or decoded.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, SplitError> {
        let persister = Persister::new(store);
        let mut state = StateStore::new();
        persister.load(&mut state).await?;
        Ok(Self::new(state, persister))
    }

    /// Register a new contact
    ///
    /// # Errors
    ///
    /// Returns a validation error if a field is missing or malformed:
    /// - `name` must be non-empty and contain only letters and spaces
    /// - `mobile` must be 1 to 10 digits
    /// - `upi` must be non-empty
    pub fn add_person(&mut self, draft: PersonDraft) -> Result<Person, SplitError> {
        validate_person(&draft)?;

        let person = draft.into_person(self.ids.next_id());
        self.state.add_person(person.clone());
        self.persister.schedule_persons(self.state.persons());

        info!(person_id = %person.id, "person added");
        Ok(person)
    }

    /// Create a group from selected contacts
    ///
    /// Duplicate selections are ignored; members are snapshot copies of the
    /// selected persons.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty or contains anything but letters and spaces
    /// - No members are selected
    /// - A selected id does not belong to a registered person
    pub fn create_group(
        &mut self,
        name: &str,
        member_ids: &[PersonId],
    ) -> Result<Group, SplitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::validation("group name", "is required"));
        }
        if !is_letters_and_spaces(name) {
            return Err(SplitError::validation(
                "group name",
                "may contain only letters and spaces",
            ));
        }
        if member_ids.is_empty() {
            return Err(SplitError::validation(
                "members",
                "select at least one contact",
            ));
        }

        let mut members: Vec<Person> = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            if members.iter().any(|m| &m.id == id) {
                continue;
            }
            let person = self
                .state
                .find_person(id)
                .ok_or_else(|| SplitError::person_not_found(id))?;
            members.push(person.clone());
        }

        let group = Group::new(self.ids.next_id(), name, members);
        self.state.add_group(group.clone());
        self.persister.schedule_groups(self.state.groups());

        info!(group_id = %group.id, members = group.members.len(), "group created");
        Ok(group)
    }

    /// Log an expense paid by a group member
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The group does not exist
    /// - The person is not a member of the group
    /// - The amount is negative or not finite
    pub fn add_expense(
        &mut self,
        group_id: &str,
        person_id: &str,
        amount: f64,
    ) -> Result<(), SplitError> {
        let group = self
            .state
            .find_group(group_id)
            .ok_or_else(|| SplitError::group_not_found(group_id))?;

        let payer = group
            .member(person_id)
            .cloned()
            .ok_or_else(|| SplitError::not_a_group_member(group_id, person_id))?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(SplitError::invalid_amount(&amount.to_string()));
        }

        self.state.add_expense_to_group(group_id, payer, amount)?;
        self.persister.schedule_groups(self.state.groups());

        info!(group_id, person_id, amount, "expense added");
        Ok(())
    }

    /// Build the group-details view, recomputing the settlement
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` if no group has this id.
    pub fn group_details(&self, group_id: &str) -> Result<GroupDetails, SplitError> {
        let group = self
            .state
            .find_group(group_id)
            .ok_or_else(|| SplitError::group_not_found(group_id))?;

        let (settlement, status) = settle_with_status(group);
        let balances = settlement.map(|s| s.balances).unwrap_or_default();

        Ok(GroupDetails {
            id: group.id.clone(),
            name: group.name.clone(),
            members: group.members.clone(),
            expenses: group.expenses.clone(),
            total: group.total_expenses(),
            balances,
            status,
        })
    }

    /// All registered persons
    pub fn persons(&self) -> &[Person] {
        self.state.persons()
    }

    /// All groups
    pub fn groups(&self) -> &[Group] {
        self.state.groups()
    }

    /// Alerts from writes that already failed
    pub fn drain_alerts(&mut self) -> Vec<PersistenceAlert> {
        self.persister.drain_alerts()
    }

    /// Wait for all scheduled writes and return any alerts they raised
    pub async fn flush(&mut self) -> Vec<PersistenceAlert> {
        self.persister.flush().await
    }
}

/// Check the add-person form fields
pub fn validate_person(draft: &PersonDraft) -> Result<(), SplitError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(SplitError::validation("name", "is required"));
    }
    if !is_letters_and_spaces(name) {
        return Err(SplitError::validation(
            "name",
            "may contain only letters and spaces",
        ));
    }

    let mobile = draft.mobile.trim();
    if mobile.is_empty() {
        return Err(SplitError::validation("mobile", "is required"));
    }
    if !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(SplitError::validation("mobile", "must contain only digits"));
    }
    if mobile.len() > MAX_MOBILE_DIGITS {
        return Err(SplitError::validation("mobile", "must be at most 10 digits"));
    }

    if draft.upi.trim().is_empty() {
        return Err(SplitError::validation("upi", "is required"));
    }
    Ok(())
}

fn is_letters_and_spaces(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

/// Parse an amount typed into the expense form
///
/// Characters other than digits and `.` are dropped first. Empty input is
/// treated as `0`.
///
/// # Errors
///
/// Returns `InvalidAmount` if what remains is not a number (e.g. `1.2.3`).
pub fn parse_amount(text: &str) -> Result<f64, SplitError> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| SplitError::invalid_amount(text))
}
