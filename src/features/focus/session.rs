//! The focus-session timer state machine.
//!
//! A `TimerSession` is a pure state object: the host calls [`TimerSession::tick`]
//! once per second and reacts to the returned [`TickEvent`]. It never sleeps,
//! reads the clock or talks to the outside world.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mode::{FocusMode, TimerConfig};
use super::timer::{Countdown, ElapsedTime};
use crate::error::TamoError;

/// Phase of a timer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session is running.
    #[default]
    Idle,
    /// Counting down a focus phase.
    Focusing,
    /// Counting down a Pomodoro break.
    OnBreak,
}

impl Phase {
    /// Stable identifier used in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Focusing => "focusing",
            Self::OnBreak => "on_break",
        }
    }

    /// Parse the database identifier.
    #[must_use]
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "focusing" => Some(Self::Focusing),
            "on_break" => Some(Self::OnBreak),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Focusing => write!(f, "Focusing"),
            Self::OnBreak => write!(f, "Break"),
        }
    }
}

/// What happened during a finished (or broken) phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    /// Mode of the session the phase belonged to.
    pub mode: FocusMode,
    /// The phase that ended.
    pub phase: Phase,
    /// Time spent in the phase.
    pub elapsed: ElapsedTime,
    /// Planned length of the phase in seconds.
    pub planned_seconds: u64,
    /// Whether the countdown ran out (false when broken early).
    pub completed: bool,
    /// 1-based Pomodoro session number.
    pub pomodoro_index: Option<u32>,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing ran: the session is idle or paused.
    Skipped,
    /// The countdown moved on.
    Continue,
    /// A phase finished and the next one has started.
    PhaseEnded(PhaseSummary),
    /// The last phase finished; the session is idle again.
    AllSessionsComplete(PhaseSummary),
}

/// Focus timer state machine.
#[derive(Debug, Clone, Default)]
pub struct TimerSession {
    config: Option<TimerConfig>,
    phase: Phase,
    remaining: Countdown,
    planned: Countdown,
    elapsed: ElapsedTime,
    current_pomodoro: u32,
    paused: bool,
}

impl TimerSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start focusing with the given settings.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if the settings are out of range or
    /// a session is already running.
    pub fn start(&mut self, config: TimerConfig) -> Result<(), TamoError> {
        if self.is_active() {
            return Err(TamoError::InvalidInput(
                "a focus session is already running".to_string(),
            ));
        }
        config.validate()?;

        self.config = Some(config);
        self.current_pomodoro = 1;
        self.paused = false;
        self.enter(Phase::Focusing, config.focus_length());

        debug!(mode = %config.mode(), remaining = %self.remaining, "focus session started");
        Ok(())
    }

    /// Advance the session by one second.
    pub fn tick(&mut self) -> TickEvent {
        let Some(config) = self.config else {
            return TickEvent::Skipped;
        };
        if self.phase == Phase::Idle || self.paused {
            return TickEvent::Skipped;
        }

        self.elapsed.advance();
        if !self.remaining.tick() {
            return TickEvent::Continue;
        }

        let summary = self.summary(config, true);

        match (self.phase, config.break_length()) {
            (Phase::Focusing, Some(break_length))
                if self.current_pomodoro < config.total_sessions() =>
            {
                debug!(session = self.current_pomodoro, "focus phase ended, starting break");
                self.enter(Phase::OnBreak, break_length);
                TickEvent::PhaseEnded(summary)
            }
            (Phase::OnBreak, _) => {
                self.current_pomodoro += 1;
                debug!(session = self.current_pomodoro, "break ended, starting focus phase");
                self.enter(Phase::Focusing, config.focus_length());
                TickEvent::PhaseEnded(summary)
            }
            _ => {
                debug!("all sessions complete");
                self.reset();
                TickEvent::AllSessionsComplete(summary)
            }
        }
    }

    /// End the current phase early and return to Idle.
    ///
    /// Returns the summary of the interrupted phase, or `None` when idle.
    pub fn break_now(&mut self) -> Option<PhaseSummary> {
        let config = self.config?;
        if self.phase == Phase::Idle {
            return None;
        }

        let summary = self.summary(config, false);
        debug!(phase = %self.phase, elapsed = %self.elapsed, "session broken early");
        self.reset();
        Some(summary)
    }

    /// Pause the countdown.
    ///
    /// Returns true if the session was running.
    pub fn pause(&mut self) -> bool {
        if self.phase == Phase::Idle || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    /// Resume a paused countdown.
    ///
    /// Returns true if the session was paused.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Mode of the running session.
    #[must_use]
    pub fn mode(&self) -> Option<FocusMode> {
        self.config.as_ref().map(TimerConfig::mode)
    }

    /// Remaining time in the current phase.
    #[must_use]
    pub const fn remaining(&self) -> Countdown {
        self.remaining
    }

    /// Time spent in the current phase.
    #[must_use]
    pub const fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }

    /// Check if a session is running or paused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Check if the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Remaining minutes, zero padded ("MM").
    #[must_use]
    pub fn display_minutes(&self) -> String {
        format!("{:02}", self.remaining.minutes())
    }

    /// Remaining seconds, zero padded ("SS").
    #[must_use]
    pub fn display_seconds(&self) -> String {
        format!("{:02}", self.remaining.seconds())
    }

    /// Progress through the current phase (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let planned = self.planned.total_seconds();
        if planned == 0 || self.phase == Phase::Idle {
            return 0.0;
        }
        1.0 - (self.remaining.total_seconds() as f64 / planned as f64)
    }

    /// Pomodoro position, e.g. "2 / 4" while focusing or "Break".
    #[must_use]
    pub fn pomodoro_label(&self) -> Option<String> {
        let config = self.config?;
        if config.mode() != FocusMode::Pomodoro {
            return None;
        }

        match self.phase {
            Phase::Focusing => Some(format!(
                "{} / {}",
                self.current_pomodoro,
                config.total_sessions()
            )),
            Phase::OnBreak => Some("Break".to_string()),
            Phase::Idle => None,
        }
    }

    fn enter(&mut self, phase: Phase, length: Countdown) {
        self.phase = phase;
        self.remaining = length;
        self.planned = length;
        self.elapsed = ElapsedTime::default();
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining = Countdown::default();
        self.planned = Countdown::default();
        self.elapsed = ElapsedTime::default();
        self.current_pomodoro = 0;
        self.paused = false;
    }

    fn summary(&self, config: TimerConfig, completed: bool) -> PhaseSummary {
        PhaseSummary {
            mode: config.mode(),
            phase: self.phase,
            elapsed: self.elapsed,
            planned_seconds: self.planned.total_seconds(),
            completed,
            pomodoro_index: (config.mode() == FocusMode::Pomodoro)
                .then_some(self.current_pomodoro),
        }
    }
}
