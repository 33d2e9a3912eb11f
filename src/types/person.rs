//! Person-related types for the expense splitter
//!
//! A person is a contact that can be added to groups and attributed expenses.

use serde::{Deserialize, Serialize};

/// Person identifier
///
/// Generated from the creation timestamp (milliseconds since the Unix epoch)
/// and stored as a decimal string.
pub type PersonId = String;

/// A registered contact
///
/// Persons are immutable once created and are never deleted. Groups capture
/// a snapshot copy of their members, so later changes elsewhere are not
/// reflected inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Mobile number (up to 10 digits)
    pub mobile: String,

    /// UPI payment address
    pub upi: String,
}

impl Person {
    /// Create a new person record
    pub fn new(
        id: impl Into<PersonId>,
        name: impl Into<String>,
        mobile: impl Into<String>,
        upi: impl Into<String>,
    ) -> Self {
        Person {
            id: id.into(),
            name: name.into(),
            mobile: mobile.into(),
            upi: upi.into(),
        }
    }
}

/// Unvalidated input for the add-person flow
///
/// Holds the raw form fields before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub mobile: String,
    pub upi: String,
}

impl PersonDraft {
    pub fn new(
        name: impl Into<String>,
        mobile: impl Into<String>,
        upi: impl Into<String>,
    ) -> Self {
        PersonDraft {
            name: name.into(),
            mobile: mobile.into(),
            upi: upi.into(),
        }
    }

    /// Attach an id, producing a stored person with trimmed fields
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            upi: self.upi.trim().to_string(),
        }
    }
}
