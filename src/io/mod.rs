//! I/O module
//!
//! Handles rendering of persons, groups and settlements.
//!
//! # Components
//!
//! - `format` - Money formatting, text views, and CSV export of transfers

pub mod format;

pub use format::{
    format_amount, settlement_lines, write_group_details, write_groups, write_persons,
    write_transfers_csv,
};
