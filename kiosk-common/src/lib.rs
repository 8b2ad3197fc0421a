//! # Kiosk Common Library
//!
//! Shared code for the kiosk signage services including:
//! - Error types
//! - Bootstrap configuration (TOML file + compiled defaults)
//! - API request/response types

pub mod api;
pub mod config;
pub mod error;

pub use api::types::PlaybackStatus;
pub use error::{Error, Result};
