//! Error types shared across iPoint crates.

use std::path::PathBuf;

/// Top-level error type for iPoint operations.
///
/// Expected absence (no face, no eyes, out-of-range landmarks) is never
/// an error; it travels as `Option` and ends in the hidden-pointer sentinel.
#[derive(Debug, thiserror::Error)]
pub enum IpointError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid screen size {width}x{height}")]
    InvalidScreen { width: f32, height: f32 },

    #[error("Tracking error: {message}")]
    Tracking { message: String },

    #[error("Sink error ({sink}): {message}")]
    Sink { sink: String, message: String },

    #[error("Frame stream error: {message}")]
    Stream { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using IpointError.
pub type IpointResult<T> = Result<T, IpointError>;

impl IpointError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking {
            message: msg.into(),
        }
    }

    pub fn sink(sink: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Sink {
            sink: sink.into(),
            message: msg.into(),
        }
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream {
            message: msg.into(),
        }
    }

    pub fn invalid_screen(width: f32, height: f32) -> Self {
        Self::InvalidScreen { width, height }
    }
}
