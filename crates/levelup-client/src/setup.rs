use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use crate::contracts::types::{DataRange, LedgerContext};
use crate::migrations::{
    REQUIRED_INDEX_NAMES, REQUIRED_META_KEYS, run_pending, safe_repair_statement,
};
use crate::state::{
    ensure_ledger_directory, ledger_db_path, map_sqlite_error, open_connection, resolve_ledger_home,
};
use crate::{ClientError, ClientResult};

const EXPECTED_USER_VERSION: i64 = 1;

/// Tables the ledger cannot work without, with the columns queries rely on.
const CORE_TABLES: [(&str, &[&str]); 3] = [
    ("internal_meta", &["key", "value"]),
    (
        "internal_categories",
        &["category_id", "name", "name_key", "created_at"],
    ),
    (
        "internal_transactions",
        &[
            "txn_id",
            "account_id",
            "posted_at",
            "amount",
            "description",
            "category_id",
            "created_at",
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: PathBuf,
    pub schema_version: String,
    pub data_range: DataRange,
}

impl SetupContext {
    pub fn ledger_context(&self) -> LedgerContext {
        LedgerContext {
            db_path: self.db_path.display().to_string(),
            schema_version: self.schema_version.clone(),
            data_range: self.data_range.clone(),
        }
    }
}

/// Something setup found wrong with an existing ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemaGap {
    MissingIndex(&'static str),
    MissingMetaKey(&'static str),
    MissingTable(&'static str),
    MissingColumn(&'static str, &'static str),
    DriftedMeta(&'static str),
    UnexpectedUserVersion(i64),
}

impl SchemaGap {
    /// Gaps setup can close by re-running canonical bootstrap SQL.
    fn is_repairable(&self) -> bool {
        matches!(self, Self::MissingIndex(_) | Self::MissingMetaKey(_))
    }
}

pub fn ensure_initialized() -> ClientResult<SetupContext> {
    load_setup(None)
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    load_setup(Some(home_override))
}

/// Opens (creating if needed) the ledger, migrates it, and repairs missing
/// indexes or meta rows. Any other schema damage is `ledger_corrupt`.
pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    let ledger_home = resolve_ledger_home(home_override)?;
    ensure_ledger_directory(&ledger_home)?;

    let db_path = ledger_db_path(&ledger_home);
    let mut connection = open_connection(&db_path)?;
    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;

    let gaps = inspect_schema(&connection, &db_path)?;
    if let Some(fatal) = gaps.iter().find(|gap| !gap.is_repairable()) {
        warn!(db_path = %db_path.display(), gap = ?fatal, "ledger schema damaged");
        return Err(ClientError::ledger_corrupt(&db_path));
    }
    for gap in &gaps {
        repair(&connection, &db_path, gap)?;
    }

    let (schema_version, data_range) = read_ledger_summary(&connection, &db_path)?;
    debug!(db_path = %db_path.display(), %schema_version, repaired = gaps.len(), "ledger ready");

    Ok(SetupContext {
        db_path,
        schema_version,
        data_range,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    if let rusqlite_migration::Error::RusqliteError { err, .. } = error {
        let mapped = map_sqlite_error(db_path, err);
        if matches!(
            mapped.code.as_str(),
            "ledger_locked" | "ledger_corrupt" | "ledger_init_permission_denied"
        ) {
            return mapped;
        }
    }
    ClientError::migration_failed(db_path, &error.to_string())
}

fn inspect_schema(connection: &Connection, db_path: &Path) -> ClientResult<Vec<SchemaGap>> {
    let mut gaps = Vec::new();

    let user_version = connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if user_version != EXPECTED_USER_VERSION {
        gaps.push(SchemaGap::UnexpectedUserVersion(user_version));
    }

    for (table_name, required_columns) in CORE_TABLES {
        let columns = table_columns(connection, db_path, table_name)?;
        if columns.is_empty() {
            gaps.push(SchemaGap::MissingTable(table_name));
            continue;
        }
        for column in required_columns {
            if !columns.iter().any(|present| present == column) {
                gaps.push(SchemaGap::MissingColumn(table_name, *column));
            }
        }
    }
    if !gaps.is_empty() {
        // Meta and index checks assume the core tables are intact.
        return Ok(gaps);
    }

    for (meta_key, expected_value) in REQUIRED_META_KEYS {
        match meta_value(connection, db_path, meta_key)? {
            None => gaps.push(SchemaGap::MissingMetaKey(meta_key)),
            Some(value) if value != expected_value => gaps.push(SchemaGap::DriftedMeta(meta_key)),
            Some(_) => {}
        }
    }

    for index_name in REQUIRED_INDEX_NAMES {
        if !index_exists(connection, db_path, index_name)? {
            gaps.push(SchemaGap::MissingIndex(index_name));
        }
    }

    Ok(gaps)
}

fn repair(connection: &Connection, db_path: &Path, gap: &SchemaGap) -> ClientResult<()> {
    match gap {
        SchemaGap::MissingMetaKey(meta_key) => {
            let default_value = REQUIRED_META_KEYS
                .iter()
                .find(|(key, _)| key == meta_key)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    ClientError::ledger_init_failed(db_path, "Unknown meta key in repair.")
                })?;
            connection
                .execute(
                    "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                    params![meta_key, default_value],
                )
                .map_err(|error| map_sqlite_error(db_path, &error))?;
        }
        SchemaGap::MissingIndex(index_name) => {
            let sql = safe_repair_statement(index_name).ok_or_else(|| {
                ClientError::ledger_init_failed(db_path, "Missing canonical SQL for index repair.")
            })?;
            connection
                .execute_batch(&sql)
                .map_err(|error| map_sqlite_error(db_path, &error))?;
        }
        _ => return Err(ClientError::ledger_corrupt(db_path)),
    }
    debug!(gap = ?gap, "repaired ledger schema");
    Ok(())
}

/// Column names of `table_name`; empty when the table does not exist.
fn table_columns(
    connection: &Connection,
    db_path: &Path,
    table_name: &str,
) -> ClientResult<Vec<String>> {
    let mut statement = connection
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let names = statement
        .query_map([table_name], |row| row.get::<_, String>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    names
        .collect::<Result<Vec<String>, _>>()
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn meta_value(connection: &Connection, db_path: &Path, key: &str) -> ClientResult<Option<String>> {
    connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn index_exists(connection: &Connection, db_path: &Path, index_name: &str) -> ClientResult<bool> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1)",
            [index_name],
            |row| row.get::<_, bool>(0),
        )
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn read_ledger_summary(
    connection: &Connection,
    db_path: &Path,
) -> ClientResult<(String, DataRange)> {
    let schema_version =
        meta_value(connection, db_path, "schema_version")?.unwrap_or_else(|| "v1".to_string());
    let data_range = connection
        .query_row(
            "SELECT MIN(posted_at), MAX(posted_at) FROM internal_transactions",
            [],
            |row| {
                Ok(DataRange {
                    earliest: row.get(0)?,
                    latest: row.get(1)?,
                })
            },
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok((schema_version, data_range))
}
