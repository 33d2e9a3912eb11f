//! Output formatting for groups and settlements
//!
//! This module centralizes all display concerns:
//! - Money formatting (two decimals, rupee symbol)
//! - Settlement section lines ("Bob pays Alice ₹100.00")
//! - Group details rendering for the terminal
//! - CSV export of transfers
//!
//! Amounts are rounded here and nowhere else; the engine keeps full precision.

use crate::core::expense_book::GroupDetails;
use crate::core::settlement::{SettlementStatus, Transfer};
use crate::types::{Group, Person};
use std::io::Write;

/// Currency symbol shown in front of every amount
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with two decimals
pub fn format_amount(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// Lines of the settlement section for a status
pub fn settlement_lines(status: &SettlementStatus) -> Vec<String> {
    match status {
        SettlementStatus::NoMembers => vec!["No members in this group.".to_string()],
        SettlementStatus::NoExpenses => vec!["No expenses yet.".to_string()],
        SettlementStatus::AllSettled => vec!["All settled up!".to_string()],
        SettlementStatus::Pending(transfers) => transfers.iter().map(transfer_line).collect(),
    }
}

/// One "who pays whom" line
pub fn transfer_line(transfer: &Transfer) -> String {
    format!(
        "{} pays {} {}",
        transfer.from.name,
        transfer.to.name,
        format_amount(transfer.amount)
    )
}

/// Render the group-details view as plain text
pub fn write_group_details(details: &GroupDetails, output: &mut dyn Write) -> std::io::Result<()> {
    writeln!(output, "{}", details.name)?;
    writeln!(output)?;

    writeln!(output, "Members")?;
    if details.members.is_empty() {
        writeln!(output, "  No members in this group.")?;
    }
    for member in &details.members {
        writeln!(output, "  {}", member.name)?;
    }
    writeln!(output)?;

    writeln!(output, "Expenses")?;
    if details.expenses.is_empty() {
        writeln!(output, "  No expenses yet.")?;
    } else {
        for expense in &details.expenses {
            writeln!(
                output,
                "  {:<20} {:>12}",
                expense.person.name,
                format_amount(expense.amount)
            )?;
        }
        writeln!(output, "  {:<20} {:>12}", "Total", format_amount(details.total))?;
    }

    // Mirrors the app: the settlement section only appears once something is spent.
    if !details.expenses.is_empty() {
        writeln!(output)?;
        writeln!(output, "Settlement")?;
        for line in settlement_lines(&details.status) {
            writeln!(output, "  {}", line)?;
        }
    }

    Ok(())
}

/// Render the contacts list
pub fn write_persons(persons: &[Person], output: &mut dyn Write) -> std::io::Result<()> {
    if persons.is_empty() {
        return writeln!(output, "No contacts yet.");
    }
    for person in persons {
        writeln!(
            output,
            "{}\t{}\t{}\t{}",
            person.id, person.name, person.mobile, person.upi
        )?;
    }
    Ok(())
}

/// Render the groups list shown on the home screen
pub fn write_groups(groups: &[Group], output: &mut dyn Write) -> std::io::Result<()> {
    if groups.is_empty() {
        return writeln!(output, "No groups yet.");
    }
    for group in groups {
        let noun = if group.members.len() == 1 {
            "member"
        } else {
            "members"
        };
        writeln!(
            output,
            "{}\t{}\t{} {}",
            group.id,
            group.name,
            group.members.len(),
            noun
        )?;
    }
    Ok(())
}

/// Write transfers in CSV format
///
/// Columns: from, from_id, to, to_id, amount (two decimals).
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_transfers_csv(transfers: &[Transfer], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["from", "from_id", "to", "to_id", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for transfer in transfers {
        writer
            .write_record(&[
                transfer.from.name.clone(),
                transfer.from.id.clone(),
                transfer.to.name.clone(),
                transfer.to.id.clone(),
                format!("{:.2}", transfer.amount),
            ])
            .map_err(|e| format!("Failed to write transfer record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
