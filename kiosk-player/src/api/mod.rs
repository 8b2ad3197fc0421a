//! REST API for playback control
//!
//! | Method | Path          | Handler                |
//! |--------|---------------|------------------------|
//! | GET    | /health       | [`handlers::health`]     |
//! | GET    | /api          | [`handlers::get_status`] |
//! | POST   | /api/next     | [`handlers::go_next`]    |
//! | POST   | /api/prev     | [`handlers::go_prev`]    |
//! | POST   | /api/resume   | [`handlers::resume`]     |
//! | POST   | /api/pause    | [`handlers::pause`]      |
//! | POST   | /api/stop     | [`handlers::stop`]       |
//! | POST   | /api/play     | [`handlers::play`]       |
//!
//! Anything else is served from the static UI directory when one is configured.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::playback::Player;
use crate::playlist::Playlist;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Control handle of the playback supervisor
    pub player: Player,
    /// Playlist view over the media directory
    pub playlist: Playlist,
    /// Static web UI directory
    pub static_dir: Option<PathBuf>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::get_status))
        .route("/api/next", post(handlers::go_next))
        .route("/api/prev", post(handlers::go_prev))
        .route("/api/resume", post(handlers::resume))
        .route("/api/pause", post(handlers::pause))
        .route("/api/stop", post(handlers::stop))
        .route("/api/play", post(handlers::play));

    if let Some(dir) = &state.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local UIs
        .layer(CorsLayer::permissive())
}
