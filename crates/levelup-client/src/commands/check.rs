use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::ClientResult;
use crate::batch::{self, LoadedBatch, format_iso_date};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CheckData, CheckSummary, CheckWindow, CheckedRow};
use crate::ledger::{categories, transactions};
use crate::matching::{ExistingRecord, build_index, build_suggestions, match_candidate};
use crate::setup::load_setup;
use crate::state::open_readonly_connection;

const COMMAND: &str = "check";

#[derive(Debug, Default)]
pub struct CheckOptions<'a> {
    pub path: Option<String>,
    pub account_id: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<String>, account_id: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(CheckOptions {
        path,
        account_id,
        home_override: None,
        stdin_override: None,
    })
}

/// Reports, for every incoming row, whether it duplicates a stored
/// transaction and which category it most likely belongs to. Read-only.
#[doc(hidden)]
#[instrument(skip_all, fields(path = ?options.path, account_id = ?options.account_id))]
pub fn run_with_options(options: CheckOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let batch = batch::load(options.path.clone(), options.stdin_override, COMMAND)?;

    let connection = open_readonly_connection(&setup.db_path)?;
    let (from, to) = match batch.fetch_window() {
        Some(window) => window,
        None => {
            return Err(batch::invalid_input_error(
                "The batch contains no transactions.",
                COMMAND,
            ));
        }
    };
    let existing = transactions::fetch_window(&connection, &setup.db_path, from, to)?;
    let category_names = categories::name_lookup(&connection, &setup.db_path)?;
    debug!(
        from = %format_iso_date(from),
        to = %format_iso_date(to),
        existing = existing.len(),
        "fetched existing records"
    );

    let rows = check_rows(&batch, &existing, &category_names);
    let summary = CheckSummary {
        rows_checked: rows.len() as i64,
        duplicates: rows.iter().filter(|row| row.is_duplicate).count() as i64,
        suggested: rows
            .iter()
            .filter(|row| row.suggested_category_id.is_some())
            .count() as i64,
    };
    debug!(
        rows = summary.rows_checked,
        duplicates = summary.duplicates,
        suggested = summary.suggested,
        "batch checked"
    );

    let data = CheckData {
        account_id: options.account_id,
        source: batch.source.source_kind.as_str().to_string(),
        path: batch.source.source_ref.clone(),
        window: CheckWindow {
            from: format_iso_date(from),
            to: format_iso_date(to),
            existing_records: existing.len() as i64,
        },
        summary,
        rows,
        ledger: setup.ledger_context(),
    };

    success(COMMAND, data)
}

/// Matches every row in input order. Index and suggestion table live only
/// for this call.
fn check_rows(
    batch: &LoadedBatch,
    existing: &[ExistingRecord],
    category_names: &HashMap<String, String>,
) -> Vec<CheckedRow> {
    let index = build_index(existing);
    let suggestions = build_suggestions(existing);

    batch
        .rows
        .iter()
        .map(|batch_row| {
            let outcome = match_candidate(&batch_row.candidate, &index, &suggestions);
            let suggested_category_name = outcome
                .suggested_category_id
                .as_ref()
                .and_then(|category_id| category_names.get(category_id))
                .cloned();

            CheckedRow {
                row: batch_row.row,
                date: format_iso_date(batch_row.candidate.date),
                description: batch_row.candidate.description.clone(),
                amount: batch_row.candidate.amount,
                is_duplicate: outcome.is_duplicate,
                existing_transaction_id: outcome.existing_id,
                existing_category_id: outcome.existing_category_id,
                suggested_category_id: outcome.suggested_category_id,
                suggested_category_name,
                suggestion_source: outcome
                    .suggestion_source
                    .map(|source| source.as_str().to_string()),
            }
        })
        .collect()
}
