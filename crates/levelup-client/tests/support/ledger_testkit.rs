use std::fs;
use std::path::{Path, PathBuf};

use levelup_client::ClientResult;
use levelup_client::SuccessEnvelope;
use levelup_client::commands::categories::{self, CategoryAddOptions};
use levelup_client::commands::check::{self, CheckOptions};
use levelup_client::commands::transactions::{self, TransactionImportOptions};
use serde_json::Value;
use tempfile::{TempDir, tempdir};

pub fn temp_home() -> std::io::Result<(TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("ledger-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_fixture(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let written = fs::write(&path, body);
    assert!(written.is_ok());
    path
}

pub fn json_batch(rows: &[Value]) -> String {
    Value::Array(rows.to_vec()).to_string()
}

pub fn import_stdin(
    home: &Path,
    body: &str,
    skip_duplicates: bool,
) -> ClientResult<SuccessEnvelope> {
    transactions::import_with_options(TransactionImportOptions {
        path: None,
        account_id: Some("checking".to_string()),
        skip_duplicates,
        home_override: Some(home),
        stdin_override: Some(body.to_string()),
    })
}

/// Imports `rows` and fails the test if the ledger rejects them.
pub fn seed(home: &Path, rows: &[Value]) {
    let imported = import_stdin(home, &json_batch(rows), false);
    assert!(imported.is_ok(), "seed import failed: {:?}", imported.err());
}

pub fn check_stdin(home: &Path, body: &str) -> ClientResult<SuccessEnvelope> {
    check::run_with_options(CheckOptions {
        path: None,
        account_id: None,
        home_override: Some(home),
        stdin_override: Some(body.to_string()),
    })
}

/// Runs a check and returns its `data.rows` array.
pub fn checked_rows(home: &Path, rows: &[Value]) -> Vec<Value> {
    let checked = check_stdin(home, &json_batch(rows));
    assert!(checked.is_ok(), "check failed: {:?}", checked.err());
    checked
        .ok()
        .and_then(|envelope| envelope.data["rows"].as_array().cloned())
        .unwrap_or_default()
}

pub fn add_category(home: &Path, name: &str) -> ClientResult<SuccessEnvelope> {
    categories::add_with_options(CategoryAddOptions {
        name: name.to_string(),
        home_override: Some(home),
    })
}

pub fn category_id(home: &Path, name: &str) -> Option<String> {
    let listed = categories::list_with_options(categories::CategoryListOptions {
        home_override: Some(home),
    })
    .ok()?;
    listed.data["rows"]
        .as_array()?
        .iter()
        .find(|row| row["name"] == name)
        .and_then(|row| row["category_id"].as_str().map(str::to_string))
}
