//! Expense Splitter Library
//! # Overview
//!
//! This library records contacts, groups and per-member expenses, and computes
//! settlements: the payments that even out an equal split of a group's spending.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Person, Group, Expense, SplitError)
//! - [`core`] - Business logic components:
//!   - [`core::state_store`] - Append-only in-memory persons and groups
//!   - [`core::settlement`] - Net balances and greedy debtor/creditor matching
//!   - [`core::expense_book`] - Validated user flows with best-effort persistence
//!   - [`core::traits`] - Key-value store abstraction
//! - [`storage`] - File and in-memory key-value stores, plus the persister
//! - [`io`] - Text and CSV rendering
//! - [`cli`] - CLI arguments parsing and command dispatch
//!
//! # Settlement
//!
//! Every member owes an equal share of the group total. A member's net balance
//! is what they paid minus that share:
//!
//! - **Positive**: the member is owed money (creditor)
//! - **Negative**: the member owes money (debtor)
//! - **Within 0.01 of zero**: settled
//!
//! Transfers pair the largest debtor with the largest creditor until one side
//! is exhausted. Settlements are derived on demand and never stored.
//!
//! # Persistence
//!
//! Persons and groups are saved as JSON arrays under the keys `persons` and
//! `groups`. Mutations apply in memory first; the write follows in the
//! background and a failure is reported as an alert without rolling back.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod storage;
pub mod types;

pub use crate::core::{
    compute_settlement, ExpenseBook, GroupDetails, KeyValueStore, Settlement, SettlementStatus,
    StateStore, Transfer,
};
pub use io::{format_amount, write_transfers_csv};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore, PersistenceAlert, StorageConfig};
pub use types::{Expense, Group, GroupId, Person, PersonDraft, PersonId, SplitError};
