//! Group and expense types for the expense splitter
//!
//! A group owns a snapshot of its members and an append-only list of
//! expenses. Settlements are never stored here; they are derived on demand
//! by [`crate::core::settlement`].

use super::person::Person;
use serde::{Deserialize, Serialize};

/// Group identifier
///
/// Generated the same way as [`PersonId`](super::PersonId).
pub type GroupId = String;

/// A single expense paid by one group member
///
/// The amount is a non-negative value in the single implicit currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The member who paid
    pub person: Person,

    /// Amount paid, full precision
    pub amount: f64,
}

impl Expense {
    pub fn new(person: Person, amount: f64) -> Self {
        Expense { person, amount }
    }
}

/// A named group of persons sharing expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Display name
    pub name: String,

    /// Snapshot of the members taken at creation time
    #[serde(default)]
    pub members: Vec<Person>,

    /// Expenses in the order they were logged
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Group {
    /// Create a new group with no expenses
    pub fn new(id: impl Into<GroupId>, name: impl Into<String>, members: Vec<Person>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            members,
            expenses: Vec::new(),
        }
    }

    /// Look up a member by person id
    pub fn member(&self, person_id: &str) -> Option<&Person> {
        self.members.iter().find(|m| m.id == person_id)
    }

    /// Sum of every expense amount in the group
    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}
