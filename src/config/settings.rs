//! Configuration settings for tamostudy.
//!
//! Settings are loaded from `~/.tamostudy/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::TamoError;
use crate::features::focus::FocusMode;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus timer settings.
    pub focus: FocusConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Name used when the local profile is first created.
    #[serde(default = "default_profile_name")]
    pub profile_name: String,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the `colored` crate.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Focus timer settings.
///
/// These are the defaults for `tamo focus start`; command-line flags win.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Timer mode used when none is given.
    #[serde(default = "default_mode")]
    pub mode: FocusMode,
    /// Custom countdown minutes.
    #[serde(default = "default_custom_minutes")]
    pub custom_minutes: u32,
    /// Custom countdown seconds.
    #[serde(default)]
    pub custom_seconds: u32,
    /// Interval countdown length in minutes (multiple of 5).
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// Number of Pomodoro focus sessions.
    #[serde(default = "default_pomodoro_sessions")]
    pub pomodoro_sessions: u32,
    /// Pomodoro focus length in minutes.
    #[serde(default = "default_pomodoro_focus")]
    pub pomodoro_focus_minutes: u32,
    /// Pomodoro break length in minutes.
    #[serde(default = "default_pomodoro_break")]
    pub pomodoro_break_minutes: u32,
    /// Play a sound when a phase ends.
    #[serde(default = "default_true")]
    pub sound: bool,
    /// External command used to play the completion sound.
    ///
    /// The terminal bell is used when unset.
    #[serde(default)]
    pub sound_command: Option<String>,
    /// Show a message when an achievement unlocks.
    #[serde(default = "default_true")]
    pub achievement_notifications: bool,
    /// Credit break phases to the profile as well as focus phases.
    #[serde(default = "default_true")]
    pub credit_breaks: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `TAMO_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_profile_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "student".to_string())
}

const fn default_mode() -> FocusMode {
    FocusMode::Pomodoro
}

const fn default_custom_minutes() -> u32 {
    25
}

const fn default_interval_minutes() -> u32 {
    25
}

const fn default_pomodoro_sessions() -> u32 {
    4
}

const fn default_pomodoro_focus() -> u32 {
    25
}

const fn default_pomodoro_break() -> u32 {
    5
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            profile_name: default_profile_name(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            custom_minutes: default_custom_minutes(),
            custom_seconds: 0,
            interval_minutes: default_interval_minutes(),
            pomodoro_sessions: default_pomodoro_sessions(),
            pomodoro_focus_minutes: default_pomodoro_focus(),
            pomodoro_break_minutes: default_pomodoro_break(),
            sound: default_true(),
            sound_command: None,
            achievement_notifications: default_true(),
            credit_breaks: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, TamoError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TamoError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TamoError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), TamoError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| TamoError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            TamoError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
