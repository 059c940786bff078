//! Command implementations for tamostudy.
//!
//! Each command returns the text to print.

mod config;
mod focus;
mod pet;
mod profile;

pub use config::config;
pub use focus::{focus, log_target, run_plain, timer_config, LinePrinter, RunSummary};
pub use pet::{feed, shop};
pub use profile::{achievements, profile};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TamoError;

/// Generate a completion script.
///
/// # Errors
///
/// Returns an error if the script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, TamoError> {
    let mut command = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut command, "tamo", &mut buf);

    String::from_utf8(buf)
        .map_err(|e| TamoError::Config(format!("Completion script is not UTF-8: {e}")))
}
