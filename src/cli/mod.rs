// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;

pub use args::{CliArgs, Command, OutputFormat};

use crate::core::{parse_amount, ExpenseBook};
use crate::io::format::{write_group_details, write_groups, write_persons, write_transfers_csv};
use crate::types::{PersonDraft, SplitError};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or --help), clap
/// prints an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout stays clean for command output. An invalid
/// filter falls back to `warn`.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one command against the book, writing its result to `output`
///
/// Mutating commands schedule their persistence writes; the caller is
/// expected to [`ExpenseBook::flush`] before exiting.
///
/// # Errors
///
/// Returns validation and lookup errors from the book, and I/O errors from
/// writing the output.
pub fn execute(
    command: &Command,
    book: &mut ExpenseBook,
    output: &mut dyn Write,
) -> Result<(), SplitError> {
    match command {
        Command::AddPerson { name, mobile, upi } => {
            let person = book.add_person(PersonDraft::new(name, mobile, upi))?;
            writeln!(output, "{}", person.id)?;
        }
        Command::Contacts => write_persons(book.persons(), output)?,
        Command::CreateGroup { name, members } => {
            let group = book.create_group(name, members)?;
            writeln!(output, "{}", group.id)?;
        }
        Command::Groups => write_groups(book.groups(), output)?,
        Command::AddExpense {
            group,
            person,
            amount,
        } => {
            let amount = parse_amount(amount)?;
            book.add_expense(group, person, amount)?;
        }
        Command::Show { group, format } => {
            let details = book.group_details(group)?;
            match format {
                OutputFormat::Text => write_group_details(&details, output)?,
                OutputFormat::Csv => write_transfers_csv(details.status.transfers(), output)
                    .map_err(|message| SplitError::IoError { message })?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateStore;
    use crate::storage::{MemoryKeyValueStore, Persister};
    use std::sync::Arc;

    fn run(book: &mut ExpenseBook, args: &[&str]) -> Result<String, SplitError> {
        let mut argv = vec!["program"];
        argv.extend_from_slice(args);
        let parsed = CliArgs::try_parse_from(argv).unwrap();
        let mut output = Vec::new();
        execute(&parsed.command, book, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_commands_end_to_end() {
        let mut book = ExpenseBook::new(
            StateStore::new(),
            Persister::new(Arc::new(MemoryKeyValueStore::new())),
        );

        let alice = run(
            &mut book,
            &["add-person", "--name", "Alice", "--mobile", "1", "--upi", "a@upi"],
        )
        .unwrap();
        let bob = run(
            &mut book,
            &["add-person", "--name", "Bob", "--mobile", "2", "--upi", "b@upi"],
        )
        .unwrap();
        let (alice, bob) = (alice.trim().to_string(), bob.trim().to_string());

        let group = run(
            &mut book,
            &["create-group", "--name", "Lunch", "--member", alice.as_str(), "--member", bob.as_str()],
        )
        .unwrap();
        let group = group.trim().to_string();

        run(
            &mut book,
            &["add-expense", "--group", group.as_str(), "--person", alice.as_str(), "--amount", "80"],
        )
        .unwrap();

        let text = run(&mut book, &["show", group.as_str()]).unwrap();
        assert!(text.contains("Bob pays Alice ₹40.00"));

        let csv = run(&mut book, &["show", group.as_str(), "--format", "csv"]).unwrap();
        assert_eq!(
            csv,
            format!("from,from_id,to,to_id,amount\nBob,{},Alice,{},40.00\n", bob, alice)
        );

        let groups = run(&mut book, &["groups"]).unwrap();
        assert_eq!(groups, format!("{}\tLunch\t2 members\n", group));

        assert!(book.flush().await.is_empty());
    }

    #[tokio::test]
    async fn test_command_errors() {
        let mut book = ExpenseBook::new(
            StateStore::new(),
            Persister::new(Arc::new(MemoryKeyValueStore::new())),
        );

        assert!(matches!(
            run(&mut book, &["show", "missing"]),
            Err(SplitError::GroupNotFound { .. })
        ));
        assert!(matches!(
            run(
                &mut book,
                &["add-person", "--name", "", "--mobile", "1", "--upi", "a@upi"]
            ),
            Err(SplitError::Validation { .. })
        ));
        assert!(matches!(
            run(
                &mut book,
                &["add-expense", "--group", "g", "--person", "p", "--amount", "1.2.3"]
            ),
            Err(SplitError::InvalidAmount { .. })
        ));
    }
}
