//! Shared API request/response types
//!
//! Types used by the player's `/api` endpoints and by any client that
//! drives it (web UI, remote control scripts).

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Playback Types
// ========================================

/// Playback status as reported by `GET /api`
///
/// `Stop` means the default item is selected; `Play`/`Pause` follow the
/// supervisor's playing flag for any other selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Play,
    Pause,
    Stop,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Play => write!(f, "play"),
            PlaybackStatus::Pause => write!(f, "pause"),
            PlaybackStatus::Stop => write!(f, "stop"),
        }
    }
}

/// Currently selected playlist entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentEntry {
    /// Path of the selected item, as listed in the playlist
    pub path: String,

    /// Position in the playlist, `None` if the item vanished from disk
    pub index: Option<usize>,
}

/// Response body of `GET /api`
///
/// # Examples
///
/// ```
/// use kiosk_common::api::types::{PlaybackStatus, StatusResponse};
///
/// let idle = StatusResponse {
///     error: String::new(),
///     playlist: vec!["videos/a.mp4".to_string()],
///     current: None,
///     status: PlaybackStatus::Stop,
/// };
/// let json = serde_json::to_value(&idle).unwrap();
/// assert!(json["current"].is_null());
/// assert_eq!(json["status"], "stop");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always empty on success
    pub error: String,

    /// Playlist entries in playback order
    pub playlist: Vec<String>,

    /// Selected entry, `None` when the default item is selected
    pub current: Option<CurrentEntry>,

    /// Derived playback status
    pub status: PlaybackStatus,
}

// ========================================
// Request Types
// ========================================

/// Request body of `POST /api/play`
///
/// `index` stays a raw JSON value so that integer strings (`"3"`) are
/// accepted alongside integers; the handler converts it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayRequest {
    /// Playlist path of the item to play
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Playlist index of the item to play
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
}

// ========================================
// Error Response Types
// ========================================

/// Body of every control endpoint response
///
/// `error` is empty on success, otherwise `"<status>: <message>"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Successful response (`{"error": ""}`)
    pub fn ok() -> Self {
        Self {
            error: String::new(),
        }
    }

    /// Failure response with an HTTP status code prefix
    pub fn with_status(status: u16, message: impl std::fmt::Display) -> Self {
        Self {
            error: format!("{}: {}", status, message),
        }
    }
}
