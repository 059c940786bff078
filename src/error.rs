//! Error types for tamostudy.

use thiserror::Error;

/// Errors produced by the tamostudy library.
#[derive(Debug, Error)]
pub enum TamoError {
    /// Configuration could not be read, parsed or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// The local database failed.
    #[error("database error: {0}")]
    Database(String),

    /// A timer setting or duration was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion sound could not be played.
    #[error("sound playback failed: {0}")]
    Sound(String),

    /// The terminal could not be set up or drawn.
    #[error("terminal error: {0}")]
    Terminal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TamoError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::NotFound(_) => 3,
            _ => 1,
        }
    }
}
