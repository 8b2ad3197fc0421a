//! Common error types for the kiosk services

use thiserror::Error;

/// Common result type for kiosk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across kiosk services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
