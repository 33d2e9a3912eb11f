use crate::storage::{StorageConfig, DEFAULT_DATA_DIR};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Split group expenses and see who pays whom
#[derive(Parser, Debug)]
#[command(name = "expense-splitter")]
#[command(about = "Split group expenses and see who pays whom", long_about = None)]
pub struct CliArgs {
    /// Directory holding persons.json and groups.json
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "EXPENSE_SPLITTER_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        global = true,
        help = "Directory holding persons.json and groups.json"
    )]
    pub data_dir: PathBuf,

    /// Log filter directive
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        env = "EXPENSE_SPLITTER_LOG",
        default_value = "warn",
        global = true,
        help = "Log filter, e.g. 'info' or 'expense_splitter=debug'"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands, one per app screen
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a new contact
    AddPerson {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        upi: String,
    },

    /// List registered contacts
    Contacts,

    /// Create a group from contacts
    CreateGroup {
        #[arg(long)]
        name: String,
        /// Person id of a member (repeatable)
        #[arg(long = "member", value_name = "PERSON_ID")]
        members: Vec<String>,
    },

    /// List groups
    Groups,

    /// Log an expense paid by a group member
    AddExpense {
        #[arg(long = "group", value_name = "GROUP_ID")]
        group: String,
        #[arg(long = "person", value_name = "PERSON_ID")]
        person: String,
        /// Amount as typed; non-numeric characters are ignored
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },

    /// Show a group's expenses and settlement
    Show {
        #[arg(value_name = "GROUP_ID")]
        group: String,
        #[arg(long, value_name = "FORMAT", default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for the `show` command
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable group details
    Text,
    /// Transfers only, as CSV
    Csv,
}

impl CliArgs {
    /// Create a StorageConfig from CLI arguments
    pub fn to_storage_config(&self) -> StorageConfig {
        StorageConfig::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_add_person_parsing() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "add-person",
            "--name",
            "Alice",
            "--mobile",
            "9876543210",
            "--upi",
            "alice@upi",
        ])
        .unwrap();

        assert_eq!(
            parsed.command,
            Command::AddPerson {
                name: "Alice".to_string(),
                mobile: "9876543210".to_string(),
                upi: "alice@upi".to_string(),
            }
        );
    }

    #[test]
    fn test_create_group_repeated_members() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "create-group",
            "--name",
            "Trip",
            "--member",
            "1",
            "--member",
            "2",
        ])
        .unwrap();

        assert_eq!(
            parsed.command,
            Command::CreateGroup {
                name: "Trip".to_string(),
                members: vec!["1".to_string(), "2".to_string()],
            }
        );
    }

    #[rstest]
    #[case::default_format(&["program", "show", "g1"], OutputFormat::Text)]
    #[case::csv(&["program", "show", "g1", "--format", "csv"], OutputFormat::Csv)]
    fn test_show_format(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match parsed.command {
            Command::Show { group, format } => {
                assert_eq!(group, "g1");
                assert_eq!(format, expected);
            }
            other => panic!("Expected show, got {:?}", other),
        }
    }

    #[rstest]
    #[case::explicit(&["program", "--data-dir", "/tmp/x", "groups"], "/tmp/x")]
    #[case::after_subcommand(&["program", "groups", "--data-dir", "/tmp/y"], "/tmp/y")]
    fn test_data_dir(#[case] args: &[&str], #[case] expected: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.to_storage_config().data_dir, PathBuf::from(expected));
    }

    #[test]
    fn test_amount_accepts_leading_minus() {
        let parsed = CliArgs::try_parse_from([
            "program", "add-expense", "--group", "g", "--person", "p", "--amount", "-5",
        ])
        .unwrap();
        assert!(matches!(parsed.command, Command::AddExpense { ref amount, .. } if amount == "-5"));
    }

    // Error handling tests
    #[rstest]
    #[case::missing_command(&["program"])]
    #[case::unknown_command(&["program", "delete-group", "g1"])]
    #[case::missing_upi(&["program", "add-person", "--name", "A", "--mobile", "1"])]
    #[case::invalid_format(&["program", "show", "g1", "--format", "xml"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
