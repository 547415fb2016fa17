//! Mission loading errors

use sector_triggers::TriggerError;
use thiserror::Error;

/// Errors raised while loading configuration or sector content.
///
/// Nothing in the per-tick loop returns these; runtime anomalies are logged.
#[derive(Debug, Error)]
pub enum MissionError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Sector JSON could not be parsed (includes unknown action types)
    #[error("Sector parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Configuration TOML could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    /// A START_CINEMATIC action names a script the sector does not define
    #[error("Trigger '{trigger}' references unknown script '{script}'")]
    UnknownScript { trigger: String, script: String },
    /// Two triggers share an id
    #[error("Duplicate trigger id: {0}")]
    DuplicateTrigger(String),
    /// Trigger geometry is invalid
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(#[from] TriggerError),
}

/// Result type for mission loading
pub type Result<T> = std::result::Result<T, MissionError>;
