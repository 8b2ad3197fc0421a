//! HTTP request handlers
//!
//! Each handler takes one playlist snapshot so that all positional lookups in
//! a request agree with each other, then calls into the [`Player`] handle.
//!
//! [`Player`]: crate::playback::Player

use super::error::ApiError;
use super::AppState;
use crate::error::Error;
use crate::media::MediaItem;
use crate::playlist::{Playlist, PlaylistSnapshot};
use axum::{body::Bytes, extract::State, Json};
use kiosk_common::api::types::{CurrentEntry, ErrorResponse, PlayRequest, StatusResponse};
use kiosk_common::PlaybackStatus;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "kiosk-player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// GET /api - Playlist, selection and playback status
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    let snapshot = load_snapshot(&state.playlist).await?;
    let (current, status) = state.player.current_with_status().await;

    let current = (status != PlaybackStatus::Stop).then(|| {
        let index = snapshot.index_of(&current).ok();
        if index.is_none() {
            debug!("Selected item {} is not in the playlist", current);
        }
        CurrentEntry {
            path: current.to_path_string(),
            index,
        }
    });

    Ok(Json(StatusResponse {
        error: String::new(),
        playlist: snapshot.to_path_strings(),
        current,
        status,
    }))
}

/// POST /api/next - Select the next entry, wrapping; the first entry from idle
pub async fn go_next(State(state): State<AppState>) -> ApiResult<ErrorResponse> {
    let snapshot = load_snapshot(&state.playlist).await?;
    let current = selected(&state).await;
    let target = snapshot.next_after(current.as_ref())?;
    state.player.play(target).await;
    Ok(Json(ErrorResponse::ok()))
}

/// POST /api/prev - Select the previous entry, wrapping; the last entry from idle
pub async fn go_prev(State(state): State<AppState>) -> ApiResult<ErrorResponse> {
    let snapshot = load_snapshot(&state.playlist).await?;
    let current = selected(&state).await;
    let target = snapshot.prev_before(current.as_ref())?;
    state.player.play(target).await;
    Ok(Json(ErrorResponse::ok()))
}

/// POST /api/resume
pub async fn resume(State(state): State<AppState>) -> Json<ErrorResponse> {
    state.player.resume();
    Json(ErrorResponse::ok())
}

/// POST /api/pause
pub async fn pause(State(state): State<AppState>) -> Json<ErrorResponse> {
    state.player.pause();
    Json(ErrorResponse::ok())
}

/// POST /api/stop - Select the default item
pub async fn stop(State(state): State<AppState>) -> Json<ErrorResponse> {
    state.player.stop().await;
    Json(ErrorResponse::ok())
}

/// POST /api/play - Select an entry by path and/or index
///
/// The body is parsed by hand so malformed JSON gets the API's own error
/// format instead of the extractor's rejection.
pub async fn play(State(state): State<AppState>, body: Bytes) -> ApiResult<ErrorResponse> {
    let request: PlayRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("bad request: {}", e);
        Error::InvalidInput("invalid json".to_string())
    })?;

    let snapshot = load_snapshot(&state.playlist).await?;
    let item = resolve_selector(&snapshot, &request)?;
    state.player.play(item).await;
    Ok(Json(ErrorResponse::ok()))
}

// ============================================================================
// Helpers
// ============================================================================

/// Current selection, `None` when idle
async fn selected(state: &AppState) -> Option<MediaItem> {
    let current = state.player.current().await;
    (!state.player.is_default(&current)).then_some(current)
}

/// Enumerate the playlist off the async runtime
async fn load_snapshot(playlist: &Playlist) -> Result<PlaylistSnapshot, ApiError> {
    let playlist = playlist.clone();
    tokio::task::spawn_blocking(move || playlist.snapshot())
        .await
        .map_err(|e| ApiError(Error::Internal(format!("playlist enumeration failed: {}", e))))
}

/// Resolve a play request against one playlist enumeration
///
/// - path only: must be present in the playlist, else NotFound
/// - index only: must be in range, else OutOfRange
/// - both: the index must name the same item as the path, else InconsistentSelector
/// - neither: InvalidInput
pub fn resolve_selector(
    snapshot: &PlaylistSnapshot,
    request: &PlayRequest,
) -> crate::Result<MediaItem> {
    let index = request.index.as_ref().map(parse_index).transpose()?;

    match (request.path.as_deref(), index) {
        (None, None) => Err(Error::InvalidInput("must set index or path".to_string())),
        (Some(path), None) => {
            let item = MediaItem::from(path);
            snapshot.index_of(&item)?;
            Ok(item)
        }
        (None, Some(index)) => snapshot.at_signed(index),
        (Some(path), Some(index)) => {
            let item = snapshot.at_signed(index)?;
            if item != MediaItem::from(path) {
                return Err(Error::InconsistentSelector {
                    path: path.to_string(),
                    index,
                });
            }
            Ok(item)
        }
    }
}

/// Accept JSON integers and strings holding an integer
fn parse_index(value: &Value) -> crate::Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::InvalidInput("index must be int".to_string()))
}
