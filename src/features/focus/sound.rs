//! Completion sounds.
//!
//! Two sinks: the terminal bell, or an external player command such as
//! `paplay ~/sounds/bell.ogg`. A leading `~/` in the command is expanded
//! from `HOME`; nothing else is shell-expanded.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::observer::SessionObserver;
use super::session::Phase;
use crate::config::FocusConfig;
use crate::error::TamoError;

/// Rings the terminal bell.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<std::io::Stdout> {
    /// Ring the bell on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    /// Ring the bell on the given writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SessionObserver for TerminalBell<W> {
    fn play_completion_sound(&mut self, _phase: Phase) -> Result<(), TamoError> {
        self.out
            .write_all(b"\x07")
            .and_then(|()| self.out.flush())
            .map_err(|e| TamoError::Sound(format!("Failed to ring terminal bell: {e}")))
    }
}

/// Runs an external command to play the sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSound {
    program: String,
    args: Vec<String>,
}

impl CommandSound {
    /// Parse a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if the command line is empty.
    pub fn parse(command_line: &str) -> Result<Self, TamoError> {
        Self::parse_with_home(command_line, std::env::var("HOME").ok().as_deref())
    }

    fn parse_with_home(command_line: &str, home: Option<&str>) -> Result<Self, TamoError> {
        let mut parts = command_line
            .split_whitespace()
            .map(|part| expand_home(part, home));
        let program = parts
            .next()
            .ok_or_else(|| TamoError::InvalidInput("sound command is empty".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Start the command without waiting for it to finish.
    ///
    /// The player is reaped on a background thread; a failing exit status
    /// is logged there.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::Sound` if the command cannot start.
    pub fn play(&self) -> Result<(), TamoError> {
        debug!(program = %self.program, "playing completion sound");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TamoError::Sound(format!("Failed to run {}: {e}", self.program)))?;

        let program = self.program.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                warn!(program = %program, %status, "sound command failed");
            }
            Ok(_) => {}
            Err(e) => warn!(program = %program, error = %e, "could not wait for sound command"),
        });
        Ok(())
    }
}

fn expand_home(part: &str, home: Option<&str>) -> String {
    match (part.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => format!("{}/{rest}", home.trim_end_matches('/')),
        _ if part == "~" => home.unwrap_or(part).to_string(),
        _ => part.to_string(),
    }
}

impl SessionObserver for CommandSound {
    fn play_completion_sound(&mut self, _phase: Phase) -> Result<(), TamoError> {
        self.play()
    }
}

/// Build the configured sound sink.
///
/// # Errors
///
/// Returns `TamoError::InvalidInput` if the configured command is empty.
pub fn sound_sink(config: &FocusConfig) -> Result<Box<dyn SessionObserver>, TamoError> {
    match config.sound_command.as_deref() {
        Some(command) => Ok(Box::new(CommandSound::parse(command)?)),
        None => Ok(Box::new(TerminalBell::stdout())),
    }
}
