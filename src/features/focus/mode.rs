//! Timer modes and their settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::timer::Countdown;
use crate::config::FocusConfig;
use crate::error::TamoError;

/// Longest custom countdown, in minutes.
pub const MAX_CUSTOM_MINUTES: u32 = 999;
/// Step and bounds of the interval countdown, in minutes.
pub const INTERVAL_STEP_MINUTES: u32 = 5;
pub const MAX_INTERVAL_MINUTES: u32 = 120;
/// Bounds of a Pomodoro cycle.
pub const MAX_POMODORO_SESSIONS: u32 = 12;
pub const MAX_POMODORO_MINUTES: u32 = 99;

/// How a focus session counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    /// A single countdown of any minutes and seconds.
    Custom,
    /// A single countdown chosen in 5-minute steps.
    Interval,
    /// Alternating focus and break phases for a number of sessions.
    Pomodoro,
}

impl FocusMode {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Custom => "Custom Countdown",
            Self::Interval => "Interval Countdown",
            Self::Pomodoro => "Pomodoro",
        }
    }

    /// Stable identifier used in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Interval => "interval",
            Self::Pomodoro => "pomodoro",
        }
    }

    /// Parse the database identifier.
    #[must_use]
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "custom" => Some(Self::Custom),
            "interval" => Some(Self::Interval),
            "pomodoro" => Some(Self::Pomodoro),
            _ => None,
        }
    }
}

impl std::fmt::Display for FocusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Settings for one timer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TimerConfig {
    /// Fixed custom duration.
    Custom { minutes: u32, seconds: u32 },
    /// 5-minute step countdown.
    Interval { minutes: u32 },
    /// Multi-cycle Pomodoro.
    Pomodoro {
        sessions: u32,
        focus_minutes: u32,
        break_minutes: u32,
    },
}

impl TimerConfig {
    /// Build the config for `mode` from the configured defaults.
    #[must_use]
    pub const fn from_settings(mode: FocusMode, settings: &FocusConfig) -> Self {
        match mode {
            FocusMode::Custom => Self::Custom {
                minutes: settings.custom_minutes,
                seconds: settings.custom_seconds,
            },
            FocusMode::Interval => Self::Interval {
                minutes: settings.interval_minutes,
            },
            FocusMode::Pomodoro => Self::Pomodoro {
                sessions: settings.pomodoro_sessions,
                focus_minutes: settings.pomodoro_focus_minutes,
                break_minutes: settings.pomodoro_break_minutes,
            },
        }
    }

    /// The mode this config belongs to.
    #[must_use]
    pub const fn mode(&self) -> FocusMode {
        match self {
            Self::Custom { .. } => FocusMode::Custom,
            Self::Interval { .. } => FocusMode::Interval,
            Self::Pomodoro { .. } => FocusMode::Pomodoro,
        }
    }

    /// Check the settings are in range.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` describing the first bad value.
    pub fn validate(&self) -> Result<(), TamoError> {
        match *self {
            Self::Custom { minutes, seconds } => {
                if seconds > 59 {
                    return Err(TamoError::InvalidInput(format!(
                        "seconds must be between 0 and 59, got {seconds}"
                    )));
                }
                if minutes > MAX_CUSTOM_MINUTES {
                    return Err(TamoError::InvalidInput(format!(
                        "custom countdown is limited to {MAX_CUSTOM_MINUTES} minutes, got {minutes}"
                    )));
                }
                if minutes == 0 && seconds == 0 {
                    return Err(TamoError::InvalidInput(
                        "countdown must be longer than zero".to_string(),
                    ));
                }
            }
            Self::Interval { minutes } => {
                if minutes == 0
                    || minutes % INTERVAL_STEP_MINUTES != 0
                    || minutes > MAX_INTERVAL_MINUTES
                {
                    return Err(TamoError::InvalidInput(format!(
                        "interval must be a multiple of {INTERVAL_STEP_MINUTES} between {INTERVAL_STEP_MINUTES} and {MAX_INTERVAL_MINUTES} minutes, got {minutes}"
                    )));
                }
            }
            Self::Pomodoro {
                sessions,
                focus_minutes,
                break_minutes,
            } => {
                if sessions == 0 || sessions > MAX_POMODORO_SESSIONS {
                    return Err(TamoError::InvalidInput(format!(
                        "pomodoro sessions must be between 1 and {MAX_POMODORO_SESSIONS}, got {sessions}"
                    )));
                }
                for (name, value) in [("focus", focus_minutes), ("break", break_minutes)] {
                    if value == 0 || value > MAX_POMODORO_MINUTES {
                        return Err(TamoError::InvalidInput(format!(
                            "pomodoro {name} length must be between 1 and {MAX_POMODORO_MINUTES} minutes, got {value}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Length of a focus phase.
    #[must_use]
    pub const fn focus_length(&self) -> Countdown {
        match *self {
            Self::Custom { minutes, seconds } => Countdown::new(minutes, seconds),
            Self::Interval { minutes } => Countdown::from_minutes(minutes),
            Self::Pomodoro { focus_minutes, .. } => Countdown::from_minutes(focus_minutes),
        }
    }

    /// Length of a break phase (Pomodoro only).
    #[must_use]
    pub const fn break_length(&self) -> Option<Countdown> {
        match *self {
            Self::Pomodoro { break_minutes, .. } => Some(Countdown::from_minutes(break_minutes)),
            _ => None,
        }
    }

    /// Number of focus phases in the session.
    #[must_use]
    pub const fn total_sessions(&self) -> u32 {
        match *self {
            Self::Pomodoro { sessions, .. } => sessions,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = FocusConfig::default();

        assert_eq!(
            TimerConfig::from_settings(FocusMode::Pomodoro, &settings),
            TimerConfig::Pomodoro {
                sessions: 4,
                focus_minutes: 25,
                break_minutes: 5,
            }
        );
        assert_eq!(
            TimerConfig::from_settings(FocusMode::Custom, &settings).mode(),
            FocusMode::Custom
        );
    }

    #[test]
    fn test_validate_custom() {
        assert!(TimerConfig::Custom { minutes: 1, seconds: 30 }.validate().is_ok());
        assert!(TimerConfig::Custom { minutes: 0, seconds: 5 }.validate().is_ok());
        assert!(TimerConfig::Custom { minutes: 0, seconds: 0 }.validate().is_err());
        assert!(TimerConfig::Custom { minutes: 5, seconds: 60 }.validate().is_err());
        assert!(TimerConfig::Custom { minutes: 1000, seconds: 0 }.validate().is_err());
    }

    #[test]
    fn test_validate_interval() {
        assert!(TimerConfig::Interval { minutes: 5 }.validate().is_ok());
        assert!(TimerConfig::Interval { minutes: 120 }.validate().is_ok());
        assert!(TimerConfig::Interval { minutes: 0 }.validate().is_err());
        assert!(TimerConfig::Interval { minutes: 12 }.validate().is_err());
        assert!(TimerConfig::Interval { minutes: 125 }.validate().is_err());
    }

    #[test]
    fn test_validate_pomodoro() {
        let ok = TimerConfig::Pomodoro {
            sessions: 4,
            focus_minutes: 25,
            break_minutes: 5,
        };
        assert!(ok.validate().is_ok());

        let no_sessions = TimerConfig::Pomodoro {
            sessions: 0,
            focus_minutes: 25,
            break_minutes: 5,
        };
        assert!(matches!(
            no_sessions.validate(),
            Err(TamoError::InvalidInput(_))
        ));

        let no_break = TimerConfig::Pomodoro {
            sessions: 2,
            focus_minutes: 25,
            break_minutes: 0,
        };
        let err = no_break.validate().unwrap_err();
        assert!(err.to_string().contains("break"));
    }

    #[test]
    fn test_lengths() {
        let pomodoro = TimerConfig::Pomodoro {
            sessions: 3,
            focus_minutes: 25,
            break_minutes: 5,
        };
        assert_eq!(pomodoro.focus_length(), Countdown::from_minutes(25));
        assert_eq!(pomodoro.break_length(), Some(Countdown::from_minutes(5)));
        assert_eq!(pomodoro.total_sessions(), 3);

        let custom = TimerConfig::Custom { minutes: 1, seconds: 30 };
        assert_eq!(custom.focus_length().total_seconds(), 90);
        assert_eq!(custom.break_length(), None);
        assert_eq!(custom.total_sessions(), 1);
    }

    #[test]
    fn test_mode_db_round_trip() {
        for mode in [FocusMode::Custom, FocusMode::Interval, FocusMode::Pomodoro] {
            assert_eq!(FocusMode::from_db(mode.as_str()), Some(mode));
        }
        assert_eq!(FocusMode::from_db("stopwatch"), None);
    }
}
