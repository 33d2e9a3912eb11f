//! Error types for the expense splitter
//!
//! This module defines all error types that can occur while recording persons,
//! groups and expenses, or while loading and saving them.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Missing or malformed form fields, invalid amounts
//! - **Lookup Errors**: Unknown person or group, payer not a group member
//! - **Storage Errors**: Key-value store read/write failures
//! - **Serialization Errors**: Stored JSON that cannot be decoded or encoded
//!
//! Degenerate settlement inputs (no members, no expenses) are not errors; they
//! are reported as [`crate::core::SettlementStatus`] variants.

use thiserror::Error;

/// Main error type for the expense splitter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// A required form field is missing or malformed
    ///
    /// The operation is aborted before any state is mutated.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Amount is negative, not finite, or not a number
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The rejected input, as entered
        amount: String,
    },

    /// No person with this id exists
    #[error("Person {id} not found")]
    PersonNotFound { id: String },

    /// No group with this id exists
    ///
    /// The store is left unchanged when this is returned.
    #[error("Group {id} not found")]
    GroupNotFound { id: String },

    /// The payer of an expense is not a member of the group
    #[error("Person {person} is not a member of group {group}")]
    NotAGroupMember { group: String, person: String },

    /// The key-value store failed to read or write a key
    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// Stored data under a key could not be encoded or decoded
    #[error("Serialization error for key '{key}': {message}")]
    Serialization { key: String, message: String },

    /// Writing rendered output failed
    #[error("I/O error: {message}")]
    IoError { message: String },
}

// Conversion from io::Error to SplitError
impl From<std::io::Error> for SplitError {
    fn from(error: std::io::Error) -> Self {
        SplitError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SplitError {
    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        SplitError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        SplitError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create a PersonNotFound error
    pub fn person_not_found(id: &str) -> Self {
        SplitError::PersonNotFound { id: id.to_string() }
    }

    /// Create a GroupNotFound error
    pub fn group_not_found(id: &str) -> Self {
        SplitError::GroupNotFound { id: id.to_string() }
    }

    /// Create a NotAGroupMember error
    pub fn not_a_group_member(group: &str, person: &str) -> Self {
        SplitError::NotAGroupMember {
            group: group.to_string(),
            person: person.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(key: &str, message: impl std::fmt::Display) -> Self {
        SplitError::Storage {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(key: &str, error: &serde_json::Error) -> Self {
        SplitError::Serialization {
            key: key.to_string(),
            message: error.to_string(),
        }
    }

    /// Whether this error comes from user input rather than the environment
    ///
    /// The CLI uses this to decide between a usage-style message and a
    /// storage failure report.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            SplitError::Storage { .. }
                | SplitError::Serialization { .. }
                | SplitError::IoError { .. }
        )
    }
}
