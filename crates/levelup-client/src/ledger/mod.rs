//! Reads and writes against the ledger tables. Every function takes an open
//! connection plus the database path used for error reporting; callers own
//! transaction boundaries.

pub(crate) mod categories;
pub(crate) mod transactions;

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// UTC wall-clock time as `YYYY-MM-DDTHH:MM:SSZ`.
pub(crate) fn now_timestamp() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0);
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::Connection;

    use crate::migrations::run_pending;

    pub(crate) fn migrated_connection() -> Option<Connection> {
        let mut connection = Connection::open_in_memory().ok()?;
        run_pending(&mut connection).ok()?;
        Some(connection)
    }
}
