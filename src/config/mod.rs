//! Configuration management for tamostudy.
//!
//! This module handles loading and saving configuration from `~/.tamostudy/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, FocusConfig, GeneralConfig, LoggingConfig};
