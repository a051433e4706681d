//! Error types for the Pistachio launcher.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for launcher operations.
#[derive(Debug, Error)]
pub enum LauncherError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Backend process errors
    #[error("Backend launch failed: {message}")]
    LaunchFailed { message: String },

    #[error("Failed to signal process {pid}: {message}")]
    SignalFailed { pid: u32, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(err: std::io::Error) -> Self {
        LauncherError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl LauncherError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LauncherError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}
