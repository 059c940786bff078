//! Focus timer.
//!
//! A study session counts down in one of three modes:
//! - Custom: one countdown of any length
//! - Interval: one countdown chosen in 5-minute steps
//! - Pomodoro: focus phases separated by breaks
//!
//! The state machine lives in [`session`]; [`observer`] turns its events
//! into notifications for the profile, the sound player and the screen.

pub mod mode;
pub mod observer;
pub mod recorder;
pub mod report;
pub mod session;
pub mod sound;
pub mod storage;
pub mod timer;

pub use mode::{FocusMode, TimerConfig};
pub use observer::{FocusController, ObserverList, SessionLog, SessionObserver, SessionOutcome};
pub use recorder::SessionRecorder;
pub use report::{FocusReport, ReportPeriod};
pub use session::{Phase, PhaseSummary, TickEvent, TimerSession};
pub use sound::{sound_sink, CommandSound, TerminalBell};
pub use storage::{FocusStorage, SessionRecord};
pub use timer::{format_duration, parse_duration, Countdown, ElapsedTime, Ticker, TICK};
