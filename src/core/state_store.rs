//! In-memory state store for persons and groups
//!
//! This module provides the StateStore component that holds the current
//! collections of persons and groups. All mutations are append-only:
//! persons and groups are never edited or removed, and a group's expenses
//! only ever grow.
//!
//! # Lookups
//!
//! Collections are small and ordered by creation, so lookups are linear
//! scans by id. Reads hand out whole-collection snapshots as slices.
//!
//! # Unknown Groups
//!
//! Appending an expense to a group id that does not exist returns
//! [`SplitError::GroupNotFound`] and leaves the store untouched.

use crate::types::{Expense, Group, Person, SplitError};
use tracing::debug;

/// Append-only store of persons and groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateStore {
    /// Persons in creation order
    persons: Vec<Person>,
    /// Groups in creation order
    groups: Vec<Group>,
}

impl StateStore {
    /// Create a new empty state store
    pub fn new() -> Self {
        StateStore {
            persons: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Append a person
    ///
    /// No de-duplication is performed; the caller must supply a fresh id.
    pub fn add_person(&mut self, person: Person) {
        debug!(person_id = %person.id, name = %person.name, "adding person");
        self.persons.push(person);
    }

    /// Append a group
    pub fn add_group(&mut self, group: Group) {
        debug!(
            group_id = %group.id,
            name = %group.name,
            members = group.members.len(),
            "adding group"
        );
        self.groups.push(group);
    }

    /// Append an expense to the group with the given id
    ///
    /// # Arguments
    ///
    /// * `group_id` - The group to append to
    /// * `person` - The member who paid
    /// * `amount` - Amount paid
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the expense was appended
    /// * `Err(SplitError::GroupNotFound)` - If no group has this id; nothing is changed
    pub fn add_expense_to_group(
        &mut self,
        group_id: &str,
        person: Person,
        amount: f64,
    ) -> Result<(), SplitError> {
        let group = self
            .find_group_mut(group_id)
            .ok_or_else(|| SplitError::group_not_found(group_id))?;

        debug!(group_id, person_id = %person.id, amount, "adding expense");
        group.expenses.push(Expense::new(person, amount));
        Ok(())
    }

    /// All persons, in creation order
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// All groups, in creation order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Find a person by id
    pub fn find_person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    /// Find a group by id
    pub fn find_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn find_group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Whether both collections are empty
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.groups.is_empty()
    }

    /// Hydrate persons from storage, only if none are held in memory
    ///
    /// Returns `true` if the loaded persons were taken.
    pub fn load_persons(&mut self, persons: Vec<Person>) -> bool {
        if !self.persons.is_empty() {
            return false;
        }
        self.persons = persons;
        true
    }

    /// Hydrate groups from storage, only if none are held in memory
    ///
    /// Returns `true` if the loaded groups were taken.
    pub fn load_groups(&mut self, groups: Vec<Group>) -> bool {
        if !self.groups.is_empty() {
            return false;
        }
        self.groups = groups;
        true
    }
}
