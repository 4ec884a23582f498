//! Binding configuration errors.

use thiserror::Error;

/// Errors raised when a binding or its defaults are misconfigured.
///
/// Write failures are not configuration errors; they are captured by the
/// binding's `ActionRunner` and surfaced through `Notice::WriteFailed`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("range [{min}, {max}] cannot hold two thumbs {min_distance} apart")]
    RangeTooNarrow {
        min: f64,
        max: f64,
        min_distance: f64,
    },

    #[error("invalid slider bounds: {message}")]
    InvalidBounds { message: String },

    #[error("{minutes} is not a minute of the day")]
    InvalidMinutes { minutes: u32 },

    #[error("failed to parse binding defaults: {message}")]
    Parse { message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse {
            message: error.to_string(),
        }
    }
}
