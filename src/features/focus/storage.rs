//! Focus phase history.
//!
//! Every finished or broken phase is stored as one `SessionRecord`.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use rusqlite::{params, types::Type, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mode::FocusMode;
use super::session::{Phase, PhaseSummary};
use crate::error::TamoError;

const RECORD_COLUMNS: &str = "id, mode, phase, started_at, ended_at, planned_seconds, \
                              elapsed_seconds, completed, pomodoro_index";

/// A stored focus or break phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Database ID (None if not persisted)
    pub id: Option<i64>,
    /// Mode of the session the phase belonged to
    pub mode: FocusMode,
    /// Focusing or OnBreak
    pub phase: Phase,
    /// When the phase started
    pub started_at: DateTime<Utc>,
    /// When the phase ended
    pub ended_at: DateTime<Utc>,
    /// Planned length in seconds
    pub planned_seconds: i64,
    /// Time actually spent in seconds
    pub elapsed_seconds: i64,
    /// Whether the countdown ran out
    pub completed: bool,
    /// 1-based Pomodoro session number
    pub pomodoro_index: Option<u32>,
}

impl SessionRecord {
    /// Build a record for a phase that ended at `ended_at`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_summary(summary: &PhaseSummary, ended_at: DateTime<Utc>) -> Self {
        let elapsed_seconds = summary.elapsed.total_seconds() as i64;

        Self {
            id: None,
            mode: summary.mode,
            phase: summary.phase,
            started_at: ended_at - Duration::seconds(elapsed_seconds),
            ended_at,
            planned_seconds: summary.planned_seconds as i64,
            elapsed_seconds,
            completed: summary.completed,
            pomodoro_index: summary.pomodoro_index,
        }
    }

    /// Check if this was a focus phase.
    #[must_use]
    pub fn is_focus(&self) -> bool {
        self.phase == Phase::Focusing
    }

    /// Time spent in the phase.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::seconds(self.elapsed_seconds)
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}

/// Storage for focus phase records.
pub struct FocusStorage<'a> {
    conn: &'a Connection,
}

impl<'a> FocusStorage<'a> {
    /// Use an open connection (or transaction).
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a record and set its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert(&self, record: &mut SessionRecord) -> Result<i64, TamoError> {
        self.conn
            .execute(
                r"INSERT INTO focus_sessions
                  (mode, phase, started_at, ended_at, planned_seconds, elapsed_seconds, completed, pomodoro_index)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.mode.as_str(),
                    record.phase.as_str(),
                    record.started_at.to_rfc3339(),
                    record.ended_at.to_rfc3339(),
                    record.planned_seconds,
                    record.elapsed_seconds,
                    record.completed,
                    record.pomodoro_index,
                ],
            )
            .map_err(|e| TamoError::Database(format!("Failed to insert session: {e}")))?;

        let id = self.conn.last_insert_rowid();
        record.id = Some(id);
        debug!(id, phase = %record.phase, seconds = record.elapsed_seconds, "phase recorded");
        Ok(id)
    }

    /// Most recent records first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, TamoError> {
        self.query(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM focus_sessions ORDER BY ended_at DESC, id DESC LIMIT ?1"
            ),
            params![limit],
        )
    }

    /// Records that started within `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, TamoError> {
        self.query(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM focus_sessions
                 WHERE started_at >= ?1 AND started_at < ?2
                 ORDER BY started_at DESC, id DESC"
            ),
            params![start.to_rfc3339(), end.to_rfc3339()],
        )
    }

    /// Local days with any focus time, across the whole history.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn focus_days(&self) -> Result<BTreeSet<NaiveDate>, TamoError> {
        let mut stmt = self
            .conn
            .prepare(
                r"SELECT started_at FROM focus_sessions
                  WHERE phase = 'focusing' AND elapsed_seconds > 0",
            )
            .map_err(|e| TamoError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| parse_timestamp(row, 0))
            .map_err(|e| TamoError::Database(format!("Failed to query focus days: {e}")))?;

        let mut days = BTreeSet::new();
        for row in rows {
            let started =
                row.map_err(|e| TamoError::Database(format!("Failed to read session: {e}")))?;
            days.insert(started.with_timezone(&Local).date_naive());
        }
        Ok(days)
    }

    /// Delete the whole history, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_all(&self) -> Result<usize, TamoError> {
        self.conn
            .execute("DELETE FROM focus_sessions", [])
            .map_err(|e| TamoError::Database(format!("Failed to delete sessions: {e}")))
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<SessionRecord>, TamoError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| TamoError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_record)
            .map_err(|e| TamoError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| TamoError::Database(format!("Failed to read session: {e}")))
    }
}

/// Convert a database row to a `SessionRecord`.
fn row_to_record(row: &Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    let mode: String = row.get(1)?;
    let phase: String = row.get(2)?;

    Ok(SessionRecord {
        id: Some(row.get(0)?),
        mode: FocusMode::from_db(&mode).ok_or_else(|| invalid_column(1, &mode))?,
        phase: Phase::from_db(&phase).ok_or_else(|| invalid_column(2, &phase))?,
        started_at: parse_timestamp(row, 3)?,
        ended_at: parse_timestamp(row, 4)?,
        planned_seconds: row.get(5)?,
        elapsed_seconds: row.get(6)?,
        completed: row.get(7)?,
        pomodoro_index: row.get(8)?,
    })
}

pub(crate) fn parse_timestamp(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn invalid_column(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unknown value '{value}'").into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::timer::ElapsedTime;
    use crate::storage::Database;
    use chrono::TimeZone;

    fn summary(phase: Phase, minutes: u32, completed: bool) -> PhaseSummary {
        PhaseSummary {
            mode: FocusMode::Pomodoro,
            phase,
            elapsed: ElapsedTime::new(minutes, 0),
            planned_seconds: 1500,
            completed,
            pomodoro_index: Some(1),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_from_summary() {
        let record = SessionRecord::from_summary(&summary(Phase::Focusing, 25, true), at(10));

        assert_eq!(record.started_at, at(10) - Duration::minutes(25));
        assert_eq!(record.elapsed_seconds, 1500);
        assert!(record.is_focus());
        assert!(record.id.is_none());
    }

    #[test]
    fn test_insert_sets_id() {
        let db = Database::open_in_memory().unwrap();
        let storage = FocusStorage::new(db.connection());

        let mut record = SessionRecord::from_summary(&summary(Phase::Focusing, 25, true), at(10));
        let id = storage.insert(&mut record).unwrap();
        assert_eq!(record.id, Some(id));

        let loaded = storage.recent(1).unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_recent() {
        let db = Database::open_in_memory().unwrap();
        let storage = FocusStorage::new(db.connection());

        for hour in 8..13 {
            let mut record =
                SessionRecord::from_summary(&summary(Phase::Focusing, 25, true), at(hour));
            storage.insert(&mut record).unwrap();
        }

        let recent = storage.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].ended_at, at(12));
        assert_eq!(storage.recent(10).unwrap().len(), 5);
    }

    #[test]
    fn test_focus_days_exclude_breaks() {
        let db = Database::open_in_memory().unwrap();
        let storage = FocusStorage::new(db.connection());

        let mut focus = SessionRecord::from_summary(&summary(Phase::Focusing, 25, true), at(10));
        let mut rest = SessionRecord::from_summary(&summary(Phase::OnBreak, 5, true), at(11));
        let mut broken = SessionRecord::from_summary(&summary(Phase::Focusing, 3, false), at(12));
        let mut empty = SessionRecord::from_summary(&summary(Phase::Focusing, 0, false), at(12));
        let mut later = SessionRecord::from_summary(
            &summary(Phase::OnBreak, 5, true),
            at(10) + Duration::days(3),
        );
        for record in [&mut focus, &mut rest, &mut broken, &mut empty, &mut later] {
            storage.insert(record).unwrap();
        }

        let expected: BTreeSet<_> = [&focus, &broken]
            .iter()
            .map(|r| r.started_at_local().date_naive())
            .collect();
        assert_eq!(storage.focus_days().unwrap(), expected);

        let in_range = storage.range(at(10), at(23)).unwrap();
        assert_eq!(in_range.len(), 3);
    }

    #[test]
    fn test_delete_all() {
        let db = Database::open_in_memory().unwrap();
        let storage = FocusStorage::new(db.connection());

        let mut record = SessionRecord::from_summary(&summary(Phase::Focusing, 1, true), at(9));
        storage.insert(&mut record).unwrap();

        assert_eq!(storage.delete_all().unwrap(), 1);
        assert!(storage.recent(10).unwrap().is_empty());
    }
}
