//! Database migrations for tamostudy.
//!
//! Each migration upgrades the schema by one version and runs when the
//! database is opened. The version lives in `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::error::TamoError;

/// Current schema version.
const CURRENT_VERSION: i32 = 3;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn get_version(conn: &Connection) -> Result<i32, TamoError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| TamoError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), TamoError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| TamoError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub fn run(conn: &Connection) -> Result<(), TamoError> {
    let current = get_version(conn)?;

    for version in (current + 1)..=CURRENT_VERSION {
        info!(version, "applying database migration");
        match version {
            1 => migrate_v1(conn)?,
            2 => migrate_v2(conn)?,
            3 => migrate_v3(conn)?,
            _ => {
                return Err(TamoError::Database(format!(
                    "Unknown migration version: {version}"
                )))
            }
        }
        set_version(conn, version)?;
    }

    Ok(())
}

/// Migration v1: profile and phase history.
fn migrate_v1(conn: &Connection) -> Result<(), TamoError> {
    conn.execute_batch(
        r"
        -- The single local profile
        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            total_focus_seconds INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        -- One row per finished or broken phase
        CREATE TABLE IF NOT EXISTS focus_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mode TEXT NOT NULL,
            phase TEXT NOT NULL,
            started_at TEXT NOT NULL,
            ended_at TEXT NOT NULL,
            planned_seconds INTEGER NOT NULL,
            elapsed_seconds INTEGER NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            pomodoro_index INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_started
        ON focus_sessions(started_at);
        ",
    )
    .map_err(|e| TamoError::Database(format!("Migration v1 failed: {e}")))
}

/// Migration v2: achievements.
fn migrate_v2(conn: &Connection) -> Result<(), TamoError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS achievements (
            achievement TEXT PRIMARY KEY,
            unlocked_at TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| TamoError::Database(format!("Migration v2 failed: {e}")))
}

/// Migration v3: pet, tokens and food inventory.
fn migrate_v3(conn: &Connection) -> Result<(), TamoError> {
    conn.execute_batch(
        r"
        ALTER TABLE profile ADD COLUMN tokens INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE profile ADD COLUMN hunger INTEGER NOT NULL DEFAULT 5;
        ALTER TABLE profile ADD COLUMN happiness INTEGER NOT NULL DEFAULT 5;
        ALTER TABLE profile ADD COLUMN pet_checked_on TEXT;

        -- Time studied before tokens existed still pays out
        UPDATE profile SET tokens = total_focus_seconds / 60;

        CREATE TABLE IF NOT EXISTS inventory (
            food TEXT PRIMARY KEY,
            count INTEGER NOT NULL CHECK (count >= 0)
        );
        ",
    )
    .map_err(|e| TamoError::Database(format!("Migration v3 failed: {e}")))
}
