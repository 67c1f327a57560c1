use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::TransactionBehavior;
use tracing::debug;

use crate::batch::{self, LoadedBatch, format_iso_date};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    ImportSummary, SkippedRow, TransactionImportData, TransactionListData,
};
use crate::ledger::transactions::NewTransaction;
use crate::ledger::{categories, now_timestamp, transactions};
use crate::matching::{build_index, build_suggestions, match_candidate};
use crate::setup::load_setup;
use crate::state::{map_sqlite_error, open_connection, open_readonly_connection};
use crate::{ClientError, ClientResult};

const IMPORT_COMMAND: &str = "transactions import";
const LIST_COMMAND: &str = "transactions list";

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Default)]
pub struct TransactionImportOptions<'a> {
    pub path: Option<String>,
    pub account_id: Option<String>,
    pub skip_duplicates: bool,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

#[derive(Debug, Default)]
pub struct TransactionListOptions<'a> {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub home_override: Option<&'a Path>,
}

pub fn import(
    path: Option<String>,
    account_id: Option<String>,
    skip_duplicates: bool,
) -> ClientResult<SuccessEnvelope> {
    import_with_options(TransactionImportOptions {
        path,
        account_id,
        skip_duplicates,
        home_override: None,
        stdin_override: None,
    })
}

/// Writes a validated batch to the ledger in one transaction. Category names
/// that do not exist yet are created along the way. With `skip_duplicates`,
/// rows the matcher flags against stored history are reported, not written.
#[doc(hidden)]
pub fn import_with_options(
    options: TransactionImportOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let batch = batch::load(options.path.clone(), options.stdin_override, IMPORT_COMMAND)?;
    let db_path = setup.db_path.clone();

    let mut connection = open_connection(&db_path)?;
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(&db_path, &error))?;

    let duplicate_ids = if options.skip_duplicates {
        find_duplicates(&transaction, &db_path, &batch)?
    } else {
        HashMap::new()
    };

    let created_at = now_timestamp();
    let mut category_ids: HashMap<String, String> = HashMap::new();
    let mut categories_created = 0_i64;
    let mut inserted = 0_i64;
    let mut skipped = Vec::new();

    for batch_row in &batch.rows {
        if let Some(existing_id) = duplicate_ids.get(&batch_row.row) {
            skipped.push(SkippedRow {
                row: batch_row.row,
                date: format_iso_date(batch_row.candidate.date),
                description: batch_row.candidate.description.clone(),
                amount: batch_row.candidate.amount,
                existing_transaction_id: existing_id.clone(),
            });
            continue;
        }

        let category_id = match batch_row.category.as_deref() {
            Some(name) => Some(resolve_category(
                &transaction,
                &db_path,
                name,
                &mut category_ids,
                &mut categories_created,
            )?),
            None => None,
        };

        transactions::insert_transaction(
            &transaction,
            &db_path,
            &NewTransaction {
                account_id: options.account_id.as_deref(),
                posted_at: batch_row.candidate.date,
                amount: batch_row.candidate.amount,
                description: &batch_row.candidate.description,
                category_id: category_id.as_deref(),
            },
            &created_at,
        )?;
        inserted += 1;
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(&db_path, &error))?;
    debug!(
        inserted,
        skipped = skipped.len(),
        categories_created,
        "batch imported"
    );

    let skipped_duplicates = skipped.len() as i64;
    let message = if skipped_duplicates > 0 {
        format!("Imported {inserted} transactions; skipped {skipped_duplicates} duplicates.")
    } else {
        format!("Imported {inserted} transactions.")
    };

    // Re-read so the ledger context reflects the rows just written.
    let refreshed = load_setup(options.home_override)?;

    let data = TransactionImportData {
        account_id: options.account_id,
        source: batch.source.source_kind.as_str().to_string(),
        path: batch.source.source_ref.clone(),
        message,
        summary: ImportSummary {
            rows_read: batch.summary.rows_read,
            inserted,
            skipped_duplicates,
            categories_created,
        },
        skipped,
        ledger: refreshed.ledger_context(),
    };
    success(IMPORT_COMMAND, data)
}

/// Category id for `name`, creating the category on first use. `cache` is
/// keyed by normalized name so spelling variants in one batch share an id.
fn resolve_category(
    connection: &rusqlite::Connection,
    db_path: &Path,
    name: &str,
    cache: &mut HashMap<String, String>,
    created: &mut i64,
) -> ClientResult<String> {
    let key = categories::name_key(name);
    if let Some(category_id) = cache.get(&key) {
        return Ok(category_id.clone());
    }

    let record = match categories::find_by_name(connection, db_path, name)? {
        Some(record) => record,
        None => {
            *created += 1;
            categories::insert_category(connection, db_path, name)?
        }
    };
    cache.insert(key, record.category_id.clone());
    Ok(record.category_id)
}

/// Row number to the matched stored transaction, for rows that duplicate
/// stored history.
fn find_duplicates(
    connection: &rusqlite::Connection,
    db_path: &Path,
    batch: &LoadedBatch,
) -> ClientResult<HashMap<i64, Option<String>>> {
    let Some((from, to)) = batch.fetch_window() else {
        return Ok(HashMap::new());
    };
    let existing = transactions::fetch_window(connection, db_path, from, to)?;
    let index = build_index(&existing);
    let suggestions = build_suggestions(&existing);

    let duplicates = batch
        .rows
        .iter()
        .filter_map(|batch_row| {
            let outcome = match_candidate(&batch_row.candidate, &index, &suggestions);
            outcome
                .is_duplicate
                .then_some((batch_row.row, outcome.existing_id))
        })
        .collect::<HashMap<i64, Option<String>>>();
    Ok(duplicates)
}

pub fn list(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: Option<i64>,
) -> ClientResult<SuccessEnvelope> {
    list_with_options(TransactionListOptions {
        from,
        to,
        limit,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: TransactionListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let limit = options.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("--limit must be between 1 and {MAX_LIST_LIMIT}; got {limit}."),
            Some(LIST_COMMAND),
        ));
    }
    if let (Some(from), Some(to)) = (options.from, options.to) {
        if from > to {
            return Err(ClientError::invalid_argument_for_command(
                &format!(
                    "--from ({}) must not be after --to ({}).",
                    format_iso_date(from),
                    format_iso_date(to)
                ),
                Some(LIST_COMMAND),
            ));
        }
    }

    let setup = load_setup(options.home_override)?;
    let connection = open_readonly_connection(&setup.db_path)?;
    let rows = transactions::list_transactions(
        &connection,
        &setup.db_path,
        options.from,
        options.to,
        limit,
    )?;

    let data = TransactionListData {
        from: options.from.map(format_iso_date),
        to: options.to.map(format_iso_date),
        limit,
        rows,
    };
    success(LIST_COMMAND, data)
}
