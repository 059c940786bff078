//! Focus reports.
//!
//! Summarizes the phase history for a period of days.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::storage::{FocusStorage, SessionRecord};
use super::timer::format_duration;
use crate::error::TamoError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    #[default]
    Week,
    /// Last 30 days
    Month,
    /// All time
    #[value(name = "all")]
    AllTime,
}

impl ReportPeriod {
    /// First day covered by this period, counting back from `today`.
    ///
    /// Returns `None` for all time.
    #[must_use]
    pub fn first_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Today => Some(today),
            Self::Week => Some(today - Duration::days(6)),
            Self::Month => Some(today - Duration::days(29)),
            Self::AllTime => None,
        }
    }

    /// UTC bounds `[start, end)` of this period in the local timezone.
    #[must_use]
    pub fn date_range(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self
            .first_day(today)
            .map_or(DateTime::<Utc>::UNIX_EPOCH, local_midnight);
        let end = local_midnight(today + Duration::days(1));
        (start, end)
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::AllTime => "All Time",
        }
    }
}

/// Start of a local day, in UTC.
fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive), |t| t.with_timezone(&Utc))
}

/// Focus report data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusReport {
    /// Report period name
    pub period: String,
    /// Total focus time in seconds, broken phases included
    pub focus_seconds: i64,
    /// Total break time in seconds
    pub break_seconds: i64,
    /// Focus phases that ran to 00:00
    pub completed_phases: i64,
    /// Phases broken off early
    pub broken_phases: i64,
    /// Average focus phase length in seconds
    pub avg_focus_seconds: i64,
    /// Longest focus phase in seconds
    pub longest_focus_seconds: i64,
    /// Focus seconds by day of week, Monday first
    pub by_day_of_week: [i64; 7],
    /// Daily breakdown, newest first
    pub daily: Vec<DailyFocusTime>,
    /// Consecutive days with focus time, ending today or yesterday.
    /// Counted over the whole history, not just this period.
    pub streak_days: i64,
}

/// Focus time per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocusTime {
    /// Date
    pub date: NaiveDate,
    /// Focus seconds
    pub seconds: i64,
    /// Focus phase count
    pub phases: i64,
}

impl FocusReport {
    /// Generate a report for the given period.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn generate(storage: &FocusStorage<'_>, period: ReportPeriod) -> Result<Self, TamoError> {
        Self::generate_at(storage, period, Local::now().date_naive())
    }

    fn generate_at(
        storage: &FocusStorage<'_>,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<Self, TamoError> {
        let (start, end) = period.date_range(today);
        let records = storage.range(start, end)?;
        let focus_days = storage.focus_days()?;
        Ok(Self::from_records(period, &records, &focus_days, today))
    }

    /// Build a report from already loaded records.
    ///
    /// `focus_days` holds every day with focus time and drives the streak.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_records(
        period: ReportPeriod,
        records: &[SessionRecord],
        focus_days: &BTreeSet<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let focus: Vec<_> = records.iter().filter(|r| r.is_focus()).collect();

        let focus_seconds: i64 = focus.iter().map(|r| r.elapsed_seconds).sum();
        let break_seconds: i64 = records
            .iter()
            .filter(|r| !r.is_focus())
            .map(|r| r.elapsed_seconds)
            .sum();
        let completed_phases = focus.iter().filter(|r| r.completed).count() as i64;
        let broken_phases = records.iter().filter(|r| !r.completed).count() as i64;

        let avg_focus_seconds = if focus.is_empty() {
            0
        } else {
            focus_seconds / focus.len() as i64
        };
        let longest_focus_seconds = focus.iter().map(|r| r.elapsed_seconds).max().unwrap_or(0);

        let mut by_day_of_week = [0i64; 7];
        let mut daily_map: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for record in &focus {
            let started = record.started_at_local();
            by_day_of_week[started.weekday().num_days_from_monday() as usize] +=
                record.elapsed_seconds;

            let entry = daily_map.entry(started.date_naive()).or_insert((0, 0));
            entry.0 += record.elapsed_seconds;
            entry.1 += 1;
        }

        let streak_days = calculate_streak(focus_days, today);
        let daily = daily_map
            .into_iter()
            .rev()
            .map(|(date, (seconds, phases))| DailyFocusTime {
                date,
                seconds,
                phases,
            })
            .collect();

        Self {
            period: period.display_name().to_string(),
            focus_seconds,
            break_seconds,
            completed_phases,
            broken_phases,
            avg_focus_seconds,
            longest_focus_seconds,
            by_day_of_week,
            daily,
            streak_days,
        }
    }

    /// Format the report for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Focus Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total focus time:   {}",
            format_duration(Duration::seconds(self.focus_seconds))
        ));
        lines.push(format!(
            "  Total break time:   {}",
            format_duration(Duration::seconds(self.break_seconds))
        ));
        lines.push(format!("  Completed phases:   {}", self.completed_phases));
        lines.push(format!("  Broken phases:      {}", self.broken_phases));
        lines.push(format!(
            "  Average focus:      {}",
            format_duration(Duration::seconds(self.avg_focus_seconds))
        ));
        lines.push(format!(
            "  Longest focus:      {}",
            format_duration(Duration::seconds(self.longest_focus_seconds))
        ));
        lines.push(format!("  Current streak:     {} days", self.streak_days));
        lines.push(String::new());

        if self.focus_seconds > 0 {
            lines.push("By Day of Week".to_string());
            lines.push("─".repeat(40));
            let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
            let max_day = self.by_day_of_week.iter().max().copied().unwrap_or(1).max(1);

            for (day, seconds) in days.iter().zip(self.by_day_of_week) {
                let bar_len = (seconds as f64 / max_day as f64 * 20.0) as usize;
                lines.push(format!(
                    "  {day} {:>4}m {}",
                    seconds / 60,
                    "█".repeat(bar_len)
                ));
            }
            lines.push(String::new());
        }

        if !self.daily.is_empty() {
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));

            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>4}m ({} phases)",
                    day.date,
                    day.seconds / 60,
                    day.phases
                ));
            }
        }

        lines.join("\n")
    }
}

/// Count consecutive focus days back from today, or from yesterday when
/// nothing was done today yet.
fn calculate_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> i64 {
    let mut check_date = today;
    if !days.contains(&check_date) {
        check_date = today - Duration::days(1);
    }

    let mut streak = 0;
    while days.contains(&check_date) {
        streak += 1;
        check_date -= Duration::days(1);
    }

    streak
}
