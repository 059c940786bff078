//! Logging initialization.
//!
//! Events go to stderr, except while the timer screen owns the terminal,
//! when they are appended to the log file instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::error::TamoError;

/// Environment variable holding a filter directive, e.g. `tamostudy=debug`.
pub const LOG_ENV: &str = "TAMO_LOG";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

/// Build the event filter.
///
/// `TAMO_LOG` wins over everything; otherwise `--verbose` means debug and
/// the configured level is used.
///
/// # Errors
///
/// Returns `TamoError::Config` if the directive cannot be parsed.
pub fn build_filter(
    config: &LoggingConfig,
    verbose: bool,
    env: Option<&str>,
) -> Result<EnvFilter, TamoError> {
    let directive = match env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => "debug",
        _ => config.level.as_str(),
    };

    EnvFilter::try_new(directive)
        .map_err(|e| TamoError::Config(format!("Invalid log filter '{directive}': {e}")))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the log file cannot be opened,
/// or a subscriber is already installed.
pub fn init(config: &LoggingConfig, verbose: bool, target: &LogTarget) -> Result<(), TamoError> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(config, verbose, env.as_deref())?;

    let layer = match target {
        LogTarget::Stderr => fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .boxed(),
        LogTarget::File(path) => fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TamoError::Config(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(?target, "logging initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File, TamoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TamoError::Config(format!("Failed to open log file {}: {e}", path.display())))
}
