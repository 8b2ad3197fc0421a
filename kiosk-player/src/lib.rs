//! # Kiosk Player Library (kiosk-player)
//!
//! HTTP-controlled signage player: keeps exactly one external display program
//! (video player or image viewer) running for the selected media item and
//! replaces it with the default item when nothing is selected.
//!
//! **Architecture:** axum REST API → [`playback::Player`] handle → command
//! channel → [`playback::Supervisor`] loop owning the display process.

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod playback;
pub mod playlist;
pub mod server;
pub mod state;

pub use error::{Error, Result};
pub use state::SharedState;
