//! Clock arithmetic for focus sessions.
//!
//! Provides the minute/second countdown, the elapsed-time counter and
//! duration parsing/formatting helpers.

use std::time::Instant;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Interval between timer ticks.
pub const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Tick deadlines on a fixed one-second grid.
///
/// Work done between ticks shortens the next wait instead of delaying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    next: Instant,
}

impl Ticker {
    /// First tick is due one [`TICK`] after `now`.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self { next: now + TICK }
    }

    /// Move the grid so the next tick is one [`TICK`] after `now`.
    pub fn restart(&mut self, now: Instant) {
        self.next = now + TICK;
    }

    /// Time left until the next tick.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> std::time::Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consume one tick if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += TICK;
        true
    }

    /// Sleep until the next tick is due, then consume it.
    pub fn wait(&mut self) {
        std::thread::sleep(self.until_next(Instant::now()));
        self.next += TICK;
    }
}

/// A minute/second countdown.
///
/// `seconds` always stays in `0..=59`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    minutes: u32,
    seconds: u32,
}

impl Countdown {
    /// Create a countdown, carrying whole minutes out of `seconds`.
    #[must_use]
    pub const fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes + seconds / 60,
            seconds: seconds % 60,
        }
    }

    /// Create a countdown of whole minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes, 0)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns true if the countdown is at 00:00 after this tick.
    pub fn tick(&mut self) -> bool {
        if self.seconds == 0 {
            if self.minutes == 0 {
                return true;
            }
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            self.seconds -= 1;
        }

        self.is_zero()
    }

    /// Remaining whole minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Remaining seconds within the current minute.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Total remaining seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> u64 {
        self.minutes as u64 * 60 + self.seconds as u64
    }

    /// Check if the countdown has run out.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Time spent in the current phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTime {
    /// Whole minutes.
    pub minutes: u32,
    /// Seconds within the current minute (`0..=59`).
    pub seconds: u32,
}

impl ElapsedTime {
    /// Create an elapsed time, carrying whole minutes out of `seconds`.
    #[must_use]
    pub const fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes + seconds / 60,
            seconds: seconds % 60,
        }
    }

    /// Add one second.
    pub fn advance(&mut self) {
        self.seconds += 1;
        if self.seconds == 60 {
            self.minutes += 1;
            self.seconds = 0;
        }
    }

    /// Total elapsed seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> u64 {
        self.minutes as u64 * 60 + self.seconds as u64
    }
}

impl std::fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Format a number of seconds as fractional hours, e.g. "2.5 hrs".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_hours(seconds: i64) -> String {
    format!("{:.1} hrs", seconds as f64 / 3600.0)
}

/// Parse a duration string like "25m", "1h30m", "90s".
///
/// Returns `None` for zero, malformed or out-of-range input.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    // Plain number means minutes
    if let Ok(minutes) = s.parse::<i64>() {
        return if minutes > 0 {
            Duration::try_minutes(minutes)
        } else {
            None
        };
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if current_num.is_empty() {
            return None;
        } else {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let seconds = match c {
                'h' => num.checked_mul(3600)?,
                'm' => num.checked_mul(60)?,
                's' => num,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(seconds)?;
        }
    }

    // Trailing number without unit is minutes
    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0)) * width as f64) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
