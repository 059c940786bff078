//! Focus command implementation.
//!
//! Runs sessions in the foreground and reads the phase history.

use std::io::Write;
use std::time::Instant;

use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::args::{FocusCommands, OutputFormat, StartArgs};
use crate::config::{Config, FocusConfig, Paths};
use crate::error::TamoError;
use crate::features::focus::timer::{format_duration_mmss, format_hours, render_progress_bar};
use crate::features::focus::{
    parse_duration, sound_sink, Countdown, FocusController, FocusMode, FocusReport, FocusStorage,
    ObserverList, Phase, PhaseSummary, SessionLog, SessionObserver, SessionOutcome,
    SessionRecorder, Ticker, TimerConfig, TimerSession,
};
use crate::features::profile::Achievement;
use crate::logging::LogTarget;
use crate::output::{format_history, format_unlocked, to_json};
use crate::storage::Database;
use crate::tui;

/// Execute focus subcommands.
///
/// # Errors
///
/// Returns an error if the settings are invalid, the database cannot be
/// used, or the timer screen fails.
pub fn focus(
    cmd: FocusCommands,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let db = Database::open_in(paths)?;

    match cmd {
        FocusCommands::Start(args) => start_session(db, &args, config, format),

        FocusCommands::History { limit } => {
            let records = FocusStorage::new(db.connection()).recent(limit)?;
            format_history(&records, format)
        }

        FocusCommands::Report { period } => {
            let report = FocusReport::generate(&FocusStorage::new(db.connection()), period)?;
            match format {
                OutputFormat::Json => to_json(&report),
                OutputFormat::Pretty => Ok(report.format()),
            }
        }

        FocusCommands::Clear { force } => clear_history(&db, force, format),
    }
}

/// Where `focus start` sends its log lines.
#[must_use]
pub fn log_target(cmd: &FocusCommands, paths: &Paths) -> LogTarget {
    match cmd {
        FocusCommands::Start(args) if !args.plain => LogTarget::File(paths.log_file.clone()),
        _ => LogTarget::Stderr,
    }
}

/// Combine command-line options with the configured defaults.
///
/// # Errors
///
/// Returns `TamoError::InvalidInput` if an option does not fit the mode or
/// the resulting settings are out of range.
pub fn timer_config(args: &StartArgs, settings: &FocusConfig) -> Result<TimerConfig, TamoError> {
    let mode = args.mode.unwrap_or(settings.mode);
    let mut config = TimerConfig::from_settings(mode, settings);

    let pomodoro_only = args.sessions.is_some() || args.focus.is_some() || args.break_minutes.is_some();
    if pomodoro_only && mode != FocusMode::Pomodoro {
        return Err(TamoError::InvalidInput(
            "--sessions, --focus and --break only apply to pomodoro mode".to_string(),
        ));
    }

    match &mut config {
        TimerConfig::Custom { minutes, seconds } => {
            if let Some(duration) = args.duration.as_deref() {
                let length = parse_length(duration)?;
                *minutes = length.minutes();
                *seconds = length.seconds();
            }
        }
        TimerConfig::Interval { minutes } => {
            if let Some(duration) = args.duration.as_deref() {
                let length = parse_length(duration)?;
                if length.seconds() != 0 {
                    return Err(TamoError::InvalidInput(format!(
                        "interval length must be whole minutes, got {duration}"
                    )));
                }
                *minutes = length.minutes();
            }
        }
        TimerConfig::Pomodoro {
            sessions,
            focus_minutes,
            break_minutes,
        } => {
            if args.duration.is_some() {
                return Err(TamoError::InvalidInput(
                    "--duration does not apply to pomodoro mode; use --focus".to_string(),
                ));
            }
            *sessions = args.sessions.unwrap_or(*sessions);
            *focus_minutes = args.focus.unwrap_or(*focus_minutes);
            *break_minutes = args.break_minutes.unwrap_or(*break_minutes);
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_length(input: &str) -> Result<Countdown, TamoError> {
    let invalid = || TamoError::InvalidInput(format!("invalid duration: {input}"));
    let duration = parse_duration(input).ok_or_else(invalid)?;
    let seconds = u32::try_from(duration.num_seconds()).map_err(|_| invalid())?;
    Ok(Countdown::new(seconds / 60, seconds % 60))
}

/// What a foreground run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Mode of the session
    pub mode: FocusMode,
    /// How the last session ended
    pub outcome: Option<SessionOutcome>,
    /// Phases reported
    pub phases: usize,
    /// Seconds spent focusing
    pub focus_seconds: u64,
    /// Seconds spent on breaks
    pub break_seconds: u64,
    /// Profile total after the run
    pub total_focus_seconds: i64,
    /// Tokens in the profile after the run
    pub tokens: i64,
    /// Achievements unlocked during the run
    pub unlocked: Vec<Achievement>,
}

impl RunSummary {
    fn new(
        mode: FocusMode,
        log: &SessionLog,
        recorder: &SessionRecorder,
        unlocked: Vec<Achievement>,
    ) -> Self {
        Self {
            mode,
            outcome: log.last_outcome(),
            phases: log.phases().len(),
            focus_seconds: log.seconds_in(Phase::Focusing),
            break_seconds: log.seconds_in(Phase::OnBreak),
            total_focus_seconds: recorder.profile().total_focus_seconds,
            tokens: recorder.profile().tokens,
            unlocked,
        }
    }

    /// Format for display.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn format(&self, notify_achievements: bool) -> String {
        let headline = match self.outcome {
            Some(SessionOutcome::Completed) => "Session complete!".green().bold().to_string(),
            Some(SessionOutcome::Broken) => "Session stopped early.".yellow().bold().to_string(),
            None => "No session finished.".dimmed().to_string(),
        };

        let mut lines = vec![
            headline,
            format!(
                "  Focused:      {}",
                format_duration_mmss(chrono::Duration::seconds(self.focus_seconds as i64))
            ),
        ];
        if self.break_seconds > 0 {
            lines.push(format!(
                "  On break:     {}",
                format_duration_mmss(chrono::Duration::seconds(self.break_seconds as i64))
            ));
        }
        lines.push(format!(
            "  Total focus:  {}",
            format_hours(self.total_focus_seconds)
        ));
        lines.push(format!("  Tokens:       {}", self.tokens));

        if notify_achievements {
            lines.extend(self.unlocked.iter().map(|a| format_unlocked(*a)));
        }

        lines.join("\n")
    }
}

/// Run a session in the foreground.
fn start_session(
    db: Database,
    args: &StartArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let timer = timer_config(args, &config.focus)?;
    let play_sound = config.focus.sound && !args.no_sound;
    let sound = if play_sound {
        Some(sound_sink(&config.focus)?)
    } else {
        None
    };
    let recorder = SessionRecorder::new(db, &config.general.profile_name)?
        .with_credit_breaks(config.focus.credit_breaks);
    let controller = FocusController::new(play_sound);
    let notify = config.focus.achievement_notifications;

    info!(mode = %timer.mode(), plain = args.plain, "starting focus session");

    let summary = if args.plain {
        run_plain_session(controller, timer, recorder, sound)?
    } else {
        let mut app = tui::App::new(controller, timer, recorder, sound, notify)?;
        tui::run(&mut app)?;
        RunSummary::new(timer.mode(), &app.log, &app.recorder, app.unlocked)
    };

    match format {
        OutputFormat::Json => to_json(&summary),
        OutputFormat::Pretty => Ok(summary.format(notify)),
    }
}

fn run_plain_session(
    mut controller: FocusController,
    timer: TimerConfig,
    mut recorder: SessionRecorder,
    mut sound: Option<Box<dyn SessionObserver>>,
) -> Result<RunSummary, TamoError> {
    let mut log = SessionLog::new();
    let mut printer = LinePrinter::new(std::io::stdout());

    {
        let mut observers = ObserverList::new()
            .with(&mut recorder)
            .with(&mut log)
            .with(&mut printer);
        if let Some(sound) = sound.as_deref_mut() {
            observers = observers.with(sound);
        }

        let mut ticker = Ticker::starting_at(Instant::now());
        run_plain(&mut controller, timer, &mut observers, |session| {
            print!("\r{}", progress_line(session));
            std::io::stdout().flush().ok();
            ticker.wait();
        })?;
    }
    println!();

    if let Some(e) = printer.take_error() {
        debug!(error = %e, "failed to write progress line");
    }
    if let Some(e) = recorder.take_error() {
        return Err(e);
    }

    let unlocked = recorder.take_unlocked();
    Ok(RunSummary::new(timer.mode(), &log, &recorder, unlocked))
}

fn progress_line(session: &TimerSession) -> String {
    format!(
        "  {}:{} {} {}",
        session.display_minutes(),
        session.display_seconds(),
        render_progress_bar(session.progress(), 20),
        session.pomodoro_label().unwrap_or_default()
    )
}

/// Drive a session to idle, calling `wait` before every tick.
///
/// # Errors
///
/// Returns `TamoError::InvalidInput` if the session cannot start.
pub fn run_plain(
    controller: &mut FocusController,
    config: TimerConfig,
    observer: &mut dyn SessionObserver,
    mut wait: impl FnMut(&TimerSession),
) -> Result<(), TamoError> {
    controller.start(config, observer)?;

    while controller.session().is_active() {
        wait(controller.session());
        controller.tick(observer);
    }

    Ok(())
}

/// Prints one line per phase change.
pub struct LinePrinter<W: Write> {
    out: W,
    error: Option<std::io::Error>,
}

impl<W: Write> LinePrinter<W> {
    /// Print to `out`.
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// The first write failure, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "\r{text:<40}") {
            self.error = Some(e);
        }
    }
}

impl<W: Write> SessionObserver for LinePrinter<W> {
    fn phase_started(&mut self, phase: Phase, length: Countdown) {
        self.line(&format!("{phase} for {length}"));
    }

    fn report_elapsed(&mut self, summary: &PhaseSummary) {
        let verb = if summary.completed { "done" } else { "stopped" };
        let label = match (summary.phase, summary.pomodoro_index) {
            (Phase::Focusing, Some(index)) => format!("Focus #{index}"),
            (phase, _) => phase.to_string(),
        };
        self.line(&format!("{label} {verb} after {}", summary.elapsed));
    }
}

/// Delete the phase history.
fn clear_history(db: &Database, force: bool, format: OutputFormat) -> Result<String, TamoError> {
    if !force {
        return Err(TamoError::InvalidInput(
            "This will delete all focus history.\nUse --force to confirm.".to_string(),
        ));
    }

    let deleted = FocusStorage::new(db.connection()).delete_all()?;
    info!(deleted, "focus history cleared");

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": deleted })),
        OutputFormat::Pretty => Ok(format!("Deleted {deleted} phases from focus history.")),
    }
}
