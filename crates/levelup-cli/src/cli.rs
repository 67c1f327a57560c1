use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "date must use valid calendar values".to_string())
}

/// Extended help shown after `levelup check --help`.
pub const CHECK_AFTER_HELP: &str = "\
How check works:
  Each incoming row is compared with transactions already in your ledger.
  Nothing is written. Run `levelup transactions import` to store rows.

  A row is a duplicate when a stored transaction has the same description
  (ignoring case and extra spaces), the same amount to the cent (ignoring
  sign), and a date no more than 3 days away.

  Category suggestions, strongest first:
    exact    category of the matching stored transaction
    prefix3  first 3 words match a categorized description
    prefix2  first 2 words match at least 2 categorized descriptions
    prefix1  first word matches at least 3 categorized descriptions

  Accepted formats:
    JSON: one top-level array of transaction objects
    CSV:  one header row with field names

  <path> is a local file path. Use `-` to read stdin explicitly.
  Example: cat rows.json | levelup check -

Batch fields:
  date (required)          YYYY-MM-DD, a real calendar date
  description (required)   raw transaction text
  amount (required)        signed number; compared to the nearest cent
  category (optional)      category name, used by `transactions import`

  JSON example:
  [
    {\"date\": \"2024-01-12\", \"description\": \"TRADER JOES #123\", \"amount\": -42.50}
  ]

  CSV example:
  date,description,amount
  2024-01-12,TRADER JOES #123,-42.50

Any invalid row rejects the whole batch; fix the listed rows and rerun.
";

#[derive(Debug, Parser)]
#[command(
    name = "levelup",
    version,
    about = "transaction de-duplication and category suggestions",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Flag duplicates and suggest categories for an incoming batch
    #[command(after_long_help = CHECK_AFTER_HELP)]
    Check {
        /// Path to a JSON or CSV batch (use `-` for stdin)
        path: Option<String>,
        /// Account the batch belongs to, echoed back in the result
        #[arg(long)]
        account: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Import and list stored transactions
    #[command(arg_required_else_help = true)]
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },
    /// Manage the category catalog
    #[command(arg_required_else_help = true)]
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransactionsCommand {
    /// Write a batch to the ledger, creating unknown categories by name
    Import {
        /// Path to a JSON or CSV batch (use `-` for stdin)
        path: Option<String>,
        /// Account id stored on every imported row
        #[arg(long)]
        account: Option<String>,
        /// Leave out rows that duplicate stored transactions
        #[arg(long)]
        skip_duplicates: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List stored transactions, newest first
    List {
        /// Start date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<NaiveDate>,
        /// End date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<NaiveDate>,
        /// Maximum rows to return (default 50)
        #[arg(long)]
        limit: Option<i64>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoriesCommand {
    /// Add a category
    Add {
        /// Category name; must be unique ignoring case
        name: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List categories with their transaction counts
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
