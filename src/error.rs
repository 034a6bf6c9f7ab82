//! Error types for the outer surfaces (storage, tuning files)
//!
//! The simulation itself has no failure modes: misses and overflows are
//! gameplay events. These errors only come from I/O around it, and callers
//! are expected to log them and fall back to defaults.

use thiserror::Error;

/// Failure reading or writing the persistent scalar store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse tuning file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
