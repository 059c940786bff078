//! tamostudy - a virtual pet study companion
//!
//! This crate provides a focus timer (custom, interval and Pomodoro modes)
//! that credits study time to a local profile, unlocks achievements and keeps
//! a phase history for reports.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TamoError;
pub use features::focus::{FocusController, TimerConfig, TimerSession};
