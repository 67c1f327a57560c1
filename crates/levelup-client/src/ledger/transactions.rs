use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use ulid::Ulid;

use crate::batch::format_iso_date;
use crate::contracts::types::TransactionItem;
use crate::matching::ExistingRecord;
use crate::state::map_sqlite_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct NewTransaction<'a> {
    pub(crate) account_id: Option<&'a str>,
    pub(crate) posted_at: NaiveDate,
    pub(crate) amount: Decimal,
    pub(crate) description: &'a str,
    pub(crate) category_id: Option<&'a str>,
}

/// Stored transactions dated within `[from, to]`, newest first.
pub(crate) fn fetch_window(
    connection: &Connection,
    db_path: &Path,
    from: NaiveDate,
    to: NaiveDate,
) -> ClientResult<Vec<ExistingRecord>> {
    let mut statement = connection
        .prepare(
            "SELECT txn_id, posted_at, amount, category_id, description
             FROM internal_transactions
             WHERE posted_at BETWEEN ?1 AND ?2
             ORDER BY posted_at DESC, txn_id DESC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map(params![format_iso_date(from), format_iso_date(to)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut records = Vec::new();
    for row in rows_iter {
        let (id, posted_at, amount, category_id, description) =
            row.map_err(|error| map_sqlite_error(db_path, &error))?;
        let date = parse_stored_date(db_path, &id, &posted_at)?;
        let amount = parse_stored_amount(db_path, &id, &amount)?;
        records.push(ExistingRecord {
            id,
            date,
            amount,
            category_id,
            description,
        });
    }
    Ok(records)
}

/// Inserts one row and returns its new `txn_<ulid>` id.
pub(crate) fn insert_transaction(
    connection: &Connection,
    db_path: &Path,
    row: &NewTransaction<'_>,
    created_at: &str,
) -> ClientResult<String> {
    let txn_id = format!("txn_{}", Ulid::new());
    connection
        .execute(
            "INSERT INTO internal_transactions (
                txn_id,
                account_id,
                posted_at,
                amount,
                description,
                category_id,
                created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &txn_id,
                row.account_id,
                format_iso_date(row.posted_at),
                row.amount.to_string(),
                row.description,
                row.category_id,
                created_at
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(txn_id)
}

pub(crate) fn list_transactions(
    connection: &Connection,
    db_path: &Path,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
) -> ClientResult<Vec<TransactionItem>> {
    let mut statement = connection
        .prepare(
            "SELECT
                t.txn_id,
                t.account_id,
                t.posted_at,
                t.amount,
                t.description,
                t.category_id,
                c.name
             FROM internal_transactions t
             LEFT JOIN internal_categories c ON c.category_id = t.category_id
             WHERE (?1 IS NULL OR t.posted_at >= ?1)
               AND (?2 IS NULL OR t.posted_at <= ?2)
             ORDER BY t.posted_at DESC, t.txn_id DESC
             LIMIT ?3",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map(
            params![from.map(format_iso_date), to.map(format_iso_date), limit],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            },
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        let (txn_id, account_id, posted_at, amount, description, category_id, category_name) =
            row.map_err(|error| map_sqlite_error(db_path, &error))?;
        let amount = parse_stored_amount(db_path, &txn_id, &amount)?;
        rows.push(TransactionItem {
            txn_id,
            account_id,
            posted_at,
            amount,
            description,
            category_id,
            category_name,
        });
    }
    Ok(rows)
}

fn parse_stored_date(db_path: &Path, txn_id: &str, value: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|error| {
        ClientError::internal_ledger_row(
            db_path,
            txn_id,
            &format!("posted_at `{value}` is not YYYY-MM-DD ({error})"),
        )
    })
}

fn parse_stored_amount(db_path: &Path, txn_id: &str, value: &str) -> ClientResult<Decimal> {
    Decimal::from_str(value).map_err(|error| {
        ClientError::internal_ledger_row(
            db_path,
            txn_id,
            &format!("amount `{value}` is not a decimal ({error})"),
        )
    })
}
