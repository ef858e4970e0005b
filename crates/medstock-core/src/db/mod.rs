//! Database layer for medstock.

mod medicines;
mod movements;
mod schema;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use crate::error::EngineError;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] EngineError),
}

pub type DbResult<T> = Result<T, DbError>;

/// Medicine store backed by a single SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `path` and apply the schema.
    ///
    /// File databases run in WAL mode so readers in other processes do not
    /// block movement writes.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let journal: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal = %journal, "opened medstock database");

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Throwaway store, used by tests and the in-memory FFI factory.
    pub fn open_in_memory() -> DbResult<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Underlying connection, for queries outside this module.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_tables() {
        let db = Database::open_in_memory().unwrap();
        let mut stmt = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(tables, vec!["medicines", "stock_movements"]);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = Database::open_in_memory().unwrap();
        let result = db.conn().execute(
            "INSERT INTO stock_movements (medicine_id, kind, quantity, occurred_on) VALUES ('ghost', 'consumed', 1, '2024-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medstock.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO medicines (id, name, expiration_date) VALUES ('m1', 'Saline', '2025-01-01')",
                    [],
                )
                .unwrap();
        }

        // Schema creation is idempotent and data survives.
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
