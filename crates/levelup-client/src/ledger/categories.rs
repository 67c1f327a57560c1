use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;
use ulid::Ulid;

use crate::ClientResult;
use crate::contracts::types::CategoryItem;
use crate::ledger::now_timestamp;
use crate::matching::normalize;
use crate::state::map_sqlite_error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryRecord {
    pub(crate) category_id: String,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

/// Uniqueness key for category names: case and spacing do not matter.
pub(crate) fn name_key(name: &str) -> String {
    normalize(name)
}

pub(crate) fn find_by_name(
    connection: &Connection,
    db_path: &Path,
    name: &str,
) -> ClientResult<Option<CategoryRecord>> {
    connection
        .query_row(
            "SELECT category_id, name, created_at
             FROM internal_categories
             WHERE name_key = ?1
             LIMIT 1",
            [name_key(name)],
            |row| {
                Ok(CategoryRecord {
                    category_id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))
}

pub(crate) fn insert_category(
    connection: &Connection,
    db_path: &Path,
    name: &str,
) -> ClientResult<CategoryRecord> {
    let record = CategoryRecord {
        category_id: format!("cat_{}", Ulid::new()),
        name: name.to_string(),
        created_at: now_timestamp(),
    };

    connection
        .execute(
            "INSERT INTO internal_categories (category_id, name, name_key, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &record.category_id,
                &record.name,
                name_key(name),
                &record.created_at
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    debug!(category_id = %record.category_id, name = %record.name, "category created");
    Ok(record)
}

/// Category id to display name, for every category in the ledger.
pub(crate) fn name_lookup(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<HashMap<String, String>> {
    let mut statement = connection
        .prepare("SELECT category_id, name FROM internal_categories")
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let rows_iter = statement
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut names = HashMap::new();
    for row in rows_iter {
        let (category_id, name) = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        names.insert(category_id, name);
    }
    Ok(names)
}

pub(crate) fn list_with_counts(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<Vec<CategoryItem>> {
    let mut statement = connection
        .prepare(
            "SELECT
                c.category_id,
                c.name,
                c.created_at,
                COUNT(t.txn_id) AS transaction_count
             FROM internal_categories c
             LEFT JOIN internal_transactions t ON t.category_id = c.category_id
             GROUP BY c.category_id, c.name, c.created_at
             ORDER BY c.name_key ASC, c.category_id ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            Ok(CategoryItem {
                category_id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                transaction_count: row.get(3)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(rows)
}
