use std::collections::HashMap;

use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");
const SAFE_REPAIR_START: &str = "-- levelup:safe_repair:start:";
const SAFE_REPAIR_END: &str = "-- levelup:safe_repair:end:";

pub const REQUIRED_META_KEYS: [(&str, &str); 2] = [
    ("schema_version", "v1"),
    ("batch_contract_version", "v1"),
];

pub const REQUIRED_INDEX_NAMES: [&str; 2] = [
    "idx_internal_transactions_posted_at",
    "idx_internal_transactions_category_id",
];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    let migrations = Migrations::new(vec![M::up(BOOTSTRAP_SQL)]);
    migrations.to_latest(conn)
}

/// Canonical SQL for an object that setup may recreate when it goes missing.
pub fn safe_repair_statement(statement_name: &str) -> Option<String> {
    parse_safe_repair_statements().remove(statement_name)
}

fn parse_safe_repair_statements() -> HashMap<String, String> {
    let mut blocks: HashMap<String, String> = HashMap::new();
    let mut active_name: Option<String> = None;
    let mut active_sql = String::new();

    for line in BOOTSTRAP_SQL.lines() {
        let trimmed = line.trim();

        if let Some(name) = trimmed.strip_prefix(SAFE_REPAIR_START) {
            active_name = Some(name.to_string());
            active_sql.clear();
            continue;
        }

        if let Some(name) = trimmed.strip_prefix(SAFE_REPAIR_END) {
            if active_name.as_deref() == Some(name) {
                blocks.insert(name.to_string(), active_sql.trim().to_string());
            }
            active_name = None;
            active_sql.clear();
            continue;
        }

        if active_name.is_some() {
            active_sql.push_str(line);
            active_sql.push('\n');
        }
    }

    blocks
}
