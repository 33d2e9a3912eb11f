//! Expense Splitter CLI
//!
//! Command-line front end for recording contacts, groups and expenses, and for
//! showing who pays whom.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- add-person --name Alice --mobile 9876543210 --upi alice@upi
//! cargo run -- create-group --name "Goa Trip" --member <ID> --member <ID>
//! cargo run -- add-expense --group <GROUP_ID> --person <ID> --amount 300
//! cargo run -- show <GROUP_ID>
//! cargo run -- --data-dir ./trip-data show <GROUP_ID> --format csv > transfers.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (including failed background saves, which are reported as warnings)
//! - 1: Error (validation failure, unknown group or person, unreadable store)

use expense_splitter::cli;
use expense_splitter::ExpenseBook;
use std::process;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let config = args.to_storage_config();
    let mut book = match ExpenseBook::open(Arc::new(config.open_store())).await {
        Ok(book) => book,
        Err(e) => {
            error!(data_dir = %config.data_dir.display(), error = %e, "failed to load data");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut output = std::io::stdout();
    let result = cli::execute(&args.command, &mut book, &mut output);

    // Saves are best-effort; wait for them so a short-lived process does not drop them
    for alert in book.flush().await {
        eprintln!("Warning: {}", alert);
    }

    if let Err(e) = result {
        if !e.is_user_error() {
            error!(error = %e, "command failed");
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
