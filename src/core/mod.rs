//! Core business logic module
//!
//! This module contains the expense-splitting components:
//! - `traits` - Key-value store abstraction for persistence
//! - `state_store` - Append-only in-memory persons and groups
//! - `settlement` - Balance and transfer computation
//! - `expense_book` - Validated user flows over the store and persister

pub mod expense_book;
pub mod settlement;
pub mod state_store;
pub mod traits;

pub use expense_book::{parse_amount, ExpenseBook, GroupDetails, IdGenerator};
pub use settlement::{
    compute_settlement, settle_group, settle_with_status, MemberBalance, Settlement,
    SettlementStatus, Transfer, SETTLEMENT_TOLERANCE,
};
pub use state_store::StateStore;
pub use traits::{KeyValueStore, GROUPS_KEY, PERSONS_KEY};
