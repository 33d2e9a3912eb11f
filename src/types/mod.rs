//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `person`: Person records and the add-person draft
//! - `group`: Group and expense records
//! - `error`: Error types for the expense splitter

pub mod error;
pub mod group;
pub mod person;

pub use error::SplitError;
pub use group::{Expense, Group, GroupId};
pub use person::{Person, PersonDraft, PersonId};
