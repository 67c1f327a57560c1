use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::{BatchIssue, BatchSummary};

pub(crate) const CHECK_HELP_COMMAND: &str = "levelup check --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `levelup {cmd} --help` for usage."),
            None => "Run `levelup --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_input_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_input_format",
            message,
            vec![
                "Provide a JSON array of transaction objects or a CSV with a header row."
                    .to_string(),
                format!("Run `{CHECK_HELP_COMMAND}` to confirm field requirements."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "csv"],
        }))
    }

    pub fn batch_schema_mismatch(
        required_headers: Vec<String>,
        optional_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        Self::new(
            "batch_schema_mismatch",
            "CSV headers do not satisfy the batch schema.",
            vec![
                "Include all required headers; optional headers may be omitted.".to_string(),
                "Do not include unknown headers.".to_string(),
                format!("Run `{CHECK_HELP_COMMAND}` to review required and optional fields."),
            ],
        )
        .with_data(json!({
            "required_headers": required_headers,
            "optional_headers": optional_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn batch_validation_failed(summary: BatchSummary, issues: Vec<BatchIssue>) -> Self {
        let issue_count = summary.rows_invalid;
        Self::new(
            "batch_validation_failed",
            &format!(
                "Batch failed validation: {issue_count} rows need fixes. Nothing was checked or written."
            ),
            vec![
                "Fix the listed issues in your source file.".to_string(),
                "Rerun the same command with the corrected file.".to_string(),
            ],
        )
        .with_data(json!({
            "summary": summary,
            "issues": issues,
        }))
    }

    pub fn category_exists(name: &str, category_id: &str) -> Self {
        Self::new(
            "category_exists",
            &format!("A category named `{name}` already exists."),
            vec![
                "Run `levelup categories list` to see existing categories.".to_string(),
                "Pick a different name or reuse the existing category.".to_string(),
            ],
        )
        .with_data(json!({
            "name": name,
            "category_id": category_id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_ledger_row(path: &Path, txn_id: &str, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "internal_ledger_row_unreadable",
            &format!("Stored transaction `{txn_id}` in `{location}` could not be read: {detail}"),
            vec![
                "Inspect the row with `levelup transactions list --json`.".to_string(),
                "Restore the ledger from backup if the row was edited by hand.".to_string(),
            ],
        )
    }

    pub fn ledger_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_permission_denied",
            &format!("Cannot initialize ledger at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `LEVELUP_HOME` to a writable directory."
            )],
        )
    }

    pub fn ledger_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_locked",
            &format!("Ledger database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn ledger_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_corrupt",
            &format!("Ledger database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite ledger file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Ledger migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn ledger_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_failed",
            &format!("Ledger initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    /// Storage and runtime faults, as opposed to problems with the caller's input.
    pub fn is_service_fault(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "ledger_init_permission_denied"
                    | "ledger_locked"
                    | "ledger_corrupt"
                    | "migration_failed"
                    | "ledger_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
