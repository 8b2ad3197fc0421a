//! Error types for kiosk-player
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kiosk-player
#[derive(Error, Debug)]
pub enum Error {
    /// Selector does not resolve to an existing playlist entry
    #[error("no such media item: {0}")]
    NotFound(String),

    /// Index outside the current playlist bounds
    #[error("index {index} is out of range for a playlist of {len} entries")]
    OutOfRange { index: i64, len: usize },

    /// Path and index given together but naming different entries
    #[error("inconsistent index and path (path: \"{path}\", index: {index})")]
    InconsistentSelector { path: String, index: i64 },

    /// Malformed request
    #[error("{0}")]
    InvalidInput(String),

    /// No configured media kind matches the item
    #[error("unsupported media type: {}", .0.display())]
    UnsupportedMedia(PathBuf),

    /// Display process could not be started
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<kiosk_common::Error> for Error {
    fn from(e: kiosk_common::Error) -> Self {
        match e {
            kiosk_common::Error::Config(msg) => Error::Config(msg),
        }
    }
}

impl Error {
    /// Whether the error was caused by the client's request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::OutOfRange { .. }
                | Error::InconsistentSelector { .. }
                | Error::InvalidInput(_)
        )
    }
}

/// Convenience Result type using kiosk-player Error
pub type Result<T> = std::result::Result<T, Error>;
