//! Shared playback state
//!
//! Selection and playing flag, shared between the API handlers and the
//! supervision loop.
//!
//! - `current` is written by API-triggered calls (and by the loop's fallback
//!   to the default item); each assignment is atomic, last writer wins.
//! - `playing` is an atomic flag. The loop forces it to `true` on launch and
//!   `false` on exit; resume/pause flip it with compare-and-swap so that
//!   concurrent callers enqueue at most one toggle.

use crate::media::MediaItem;
use kiosk_common::PlaybackStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Shared state accessible by the API and the supervisor
pub struct SharedState {
    /// Current selection; the default item when nothing is selected
    current: RwLock<MediaItem>,

    /// Whether the display process is (believed to be) playing
    playing: AtomicBool,

    /// Sentinel selection meaning "stopped"
    default_item: MediaItem,
}

impl SharedState {
    /// Create state with `initial` selected (the default item if `None`)
    pub fn new(default_item: MediaItem, initial: Option<MediaItem>) -> Self {
        Self {
            current: RwLock::new(initial.unwrap_or_else(|| default_item.clone())),
            playing: AtomicBool::new(false),
            default_item,
        }
    }

    pub fn default_item(&self) -> &MediaItem {
        &self.default_item
    }

    pub fn is_default(&self, item: &MediaItem) -> bool {
        *item == self.default_item
    }

    /// Get current selection
    pub async fn current(&self) -> MediaItem {
        self.current.read().await.clone()
    }

    /// Set current selection
    pub async fn set_current(&self, item: MediaItem) {
        *self.current.write().await = item;
    }

    /// Replace the selection only if it is still `expected`
    ///
    /// Returns whether the replacement happened. Used by the loop so that a
    /// fallback never overwrites a selection made concurrently by a client.
    pub async fn replace_current(&self, expected: &MediaItem, item: MediaItem) -> bool {
        let mut current = self.current.write().await;
        if *current == *expected {
            *current = item;
            true
        } else {
            false
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }

    /// Flip `playing` from `from` to `!from`; false if it already had the target value
    pub fn toggle_playing_from(&self, from: bool) -> bool {
        self.playing
            .compare_exchange(from, !from, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Status as reported to clients
    pub async fn status(&self) -> PlaybackStatus {
        self.current_with_status().await.1
    }

    /// Selection and its status, read under one lock
    pub async fn current_with_status(&self) -> (MediaItem, PlaybackStatus) {
        let current = self.current.read().await;
        let status = if self.is_default(&current) {
            PlaybackStatus::Stop
        } else if self.is_playing() {
            PlaybackStatus::Play
        } else {
            PlaybackStatus::Pause
        };
        (current.clone(), status)
    }
}
