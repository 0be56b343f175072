//! `SQLite` schema for the key-value store.
//!
//! The layout version lives in `PRAGMA user_version`. A database written by
//! a newer release is refused rather than read with the wrong layout.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Layout version written by this release.
pub const SCHEMA_VERSION: i32 = 1;

const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Create the tables if missing and stamp the layout version.
///
/// # Errors
///
/// Returns [`Error::SchemaTooNew`] for a database from a newer release, or
/// a query error if the tables cannot be created.
pub fn initialize(conn: &Connection) -> Result<()> {
    let found: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(Error::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(CREATE_ENTRIES_TABLE)?;
    if found < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_version(conn: &Connection) -> i32 {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_initialize_creates_entries_and_stamps_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let tables: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
        assert_eq!(user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_keeps_existing_entries() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO entries (key, value) VALUES ('networqr_fullname', 'Jane Doe')",
            [],
        )
        .unwrap();

        initialize(&conn).unwrap();
        let value: String = conn
            .query_row(
                "SELECT value FROM entries WHERE key = 'networqr_fullname'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "Jane Doe");
    }

    #[test]
    fn test_initialize_refuses_newer_layout() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 3)
            .unwrap();

        let err = initialize(&conn).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "contact store was written by a newer version (schema {}, supported {SCHEMA_VERSION})",
                SCHEMA_VERSION + 3
            )
        );
    }
}
