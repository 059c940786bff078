//! `SQLite` database connection and operations.
//!
//! The database is stored at `~/.tamostudy/tamostudy.db` and contains tables for:
//! - The local study profile
//! - Unlocked achievements
//! - Focus and break phase history

use std::path::Path;

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::config::Paths;
use crate::error::TamoError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database described by `paths`, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the database
    /// cannot be opened or migrations fail.
    pub fn open_in(paths: &Paths) -> Result<Self, TamoError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path, running pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, TamoError> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path).map_err(|e| {
            TamoError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, TamoError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TamoError::Database(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, TamoError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| TamoError::Database(format!("Failed to enable foreign keys: {e}")))?;

        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, committing if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a database error if the transaction
    /// cannot be started or committed.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, TamoError>,
    ) -> Result<T, TamoError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| TamoError::Database(format!("Failed to begin transaction: {e}")))?;

        let value = f(&tx)?;

        tx.commit()
            .map_err(|e| TamoError::Database(format!("Failed to commit transaction: {e}")))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(migrations::get_version(db.connection()).unwrap() > 0);
    }

    #[test]
    fn test_open_in_creates_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("data"));

        let db = Database::open_in(&paths).unwrap();
        assert!(migrations::get_version(db.connection()).unwrap() > 0);
        assert!(paths.database.exists());
    }

    #[test]
    fn test_reopen_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open_at(&db_path).unwrap();
            assert!(migrations::get_version(db.connection()).unwrap() > 0);
        }

        // Reopening must not re-run migrations
        let db = Database::open_at(&db_path).unwrap();
        assert!(migrations::get_version(db.connection()).unwrap() > 0);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut db = Database::open_in_memory().unwrap();

        let result: Result<(), TamoError> = db.transaction(|tx| {
            tx.execute(
                "INSERT INTO achievements (achievement, unlocked_at) VALUES ('x', 'now')",
                [],
            )
            .map_err(|e| TamoError::Database(e.to_string()))?;
            Err(TamoError::Database("abort".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM achievements", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
