use std::fs;
use std::path::{Path, PathBuf};

use levelup_client::setup::ensure_initialized_at;
use rusqlite::Connection;
use tempfile::{TempDir, tempdir};

/// Initialized ledger in a fresh temp dir: (guard, home, db path).
fn initialized_ledger() -> Option<(TempDir, PathBuf, PathBuf)> {
    let dir = tempdir().ok()?;
    let home = dir.path().join("ledger-home");
    let context = ensure_initialized_at(&home).ok()?;
    Some((dir, home, context.db_path))
}

fn damage(db_path: &Path, sql: &str) {
    let connection = Connection::open(db_path);
    assert!(connection.is_ok());
    if let Ok(conn) = connection {
        assert!(conn.execute_batch(sql).is_ok(), "damage failed: {sql}");
    }
}

fn index_names(db_path: &Path) -> Vec<String> {
    Connection::open(db_path)
        .and_then(|conn| {
            let mut statement = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name",
            )?;
            let names = statement
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<String>, _>>();
            names
        })
        .unwrap_or_default()
}

fn meta_value(db_path: &Path, key: &str) -> Option<String> {
    Connection::open(db_path)
        .and_then(|conn| {
            conn.query_row("SELECT value FROM internal_meta WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
        })
        .ok()
}

#[test]
fn first_run_creates_ledger_under_home_override() {
    let ledger = initialized_ledger();
    assert!(ledger.is_some());
    if let Some((_dir, home, db_path)) = ledger {
        assert_eq!(db_path, home.join("ledger.db"));
        assert!(db_path.exists());

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            assert_eq!(setup_context.schema_version, "v1");
            assert_eq!(setup_context.data_range.earliest, None);
            assert_eq!(setup_context.data_range.latest, None);
        }
    }
}

#[test]
fn repeated_setup_keeps_schema_at_version_one() {
    let ledger = initialized_ledger();
    assert!(ledger.is_some());
    if let Some((_dir, home, db_path)) = ledger {
        for _ in 0..3 {
            assert!(ensure_initialized_at(&home).is_ok());
        }
        let version = Connection::open(&db_path)
            .and_then(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0)));
        assert_eq!(version.ok(), Some(1));
        assert_eq!(index_names(&db_path).len(), 2);
    }
}

#[test]
fn missing_index_and_meta_key_are_restored() {
    let ledger = initialized_ledger();
    assert!(ledger.is_some());
    if let Some((_dir, home, db_path)) = ledger {
        damage(
            &db_path,
            "DROP INDEX idx_internal_transactions_posted_at;
             DELETE FROM internal_meta WHERE key = 'batch_contract_version';",
        );
        assert_eq!(index_names(&db_path).len(), 1);

        assert!(ensure_initialized_at(&home).is_ok());
        assert_eq!(
            index_names(&db_path),
            vec![
                "idx_internal_transactions_category_id".to_string(),
                "idx_internal_transactions_posted_at".to_string(),
            ]
        );
        assert_eq!(meta_value(&db_path, "batch_contract_version"), Some("v1".to_string()));
    }
}

#[test]
fn schema_damage_setup_cannot_repair_is_ledger_corrupt() {
    let cases = [
        "UPDATE internal_meta SET value = 'v9' WHERE key = 'schema_version';",
        "DROP TABLE internal_transactions;",
        "ALTER TABLE internal_transactions DROP COLUMN account_id;",
    ];

    for sql in cases {
        let ledger = initialized_ledger();
        assert!(ledger.is_some());
        if let Some((_dir, home, db_path)) = ledger {
            damage(&db_path, sql);

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err(), "expected failure after: {sql}");
            if let Err(error) = failed {
                assert_eq!(error.code, "ledger_corrupt");
                assert!(error.is_service_fault());
            }
        }
    }
}

#[test]
fn exclusive_lock_held_elsewhere_is_ledger_locked() {
    let ledger = initialized_ledger();
    assert!(ledger.is_some());
    if let Some((_dir, home, db_path)) = ledger {
        let holder = Connection::open(&db_path);
        assert!(holder.is_ok());
        if let Ok(conn) = holder {
            assert!(conn.execute_batch("BEGIN EXCLUSIVE;").is_ok());

            let locked = ensure_initialized_at(&home);
            assert!(locked.is_err());
            if let Err(error) = locked {
                assert_eq!(error.code, "ledger_locked");
            }

            assert!(conn.execute_batch("ROLLBACK;").is_ok());
        }
        assert!(ensure_initialized_at(&home).is_ok());
    }
}

#[test]
fn non_sqlite_file_is_ledger_corrupt() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let home = dir.path().join("ledger-home");
        assert!(fs::create_dir_all(&home).is_ok());
        assert!(fs::write(home.join("ledger.db"), "not-a-sqlite-database").is_ok());

        let result = ensure_initialized_at(&home);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "ledger_corrupt");
        }
    }
}
