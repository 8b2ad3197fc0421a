//! Client-facing playback control
//!
//! [`Player`] is the narrow command interface the HTTP layer talks to. Every
//! call returns as soon as the selection is updated and the command is
//! queued; the supervision loop acts on it asynchronously.

use super::command::{Command, CommandSender};
use crate::media::MediaItem;
use crate::state::SharedState;
use kiosk_common::PlaybackStatus;
use std::sync::Arc;
use tracing::{debug, info};

/// Cloneable handle to the playback supervisor
#[derive(Clone)]
pub struct Player {
    state: Arc<SharedState>,
    commands: CommandSender,
}

impl Player {
    pub(super) fn new(state: Arc<SharedState>, commands: CommandSender) -> Self {
        Self { state, commands }
    }

    /// Select `item` and interrupt whatever is displayed
    pub async fn play(&self, item: MediaItem) {
        info!("Play requested: {}", item);
        self.state.set_current(item).await;
        self.commands.send(Command::Kill);
    }

    /// Resume playback; no-op if already playing
    pub fn resume(&self) {
        if self.state.toggle_playing_from(false) {
            self.commands.send(Command::TogglePlayPause);
        } else {
            debug!("Resume ignored, already playing");
        }
    }

    /// Pause playback; no-op if already paused
    pub fn pause(&self) {
        if self.state.toggle_playing_from(true) {
            self.commands.send(Command::TogglePlayPause);
        } else {
            debug!("Pause ignored, already paused");
        }
    }

    /// Select the default item
    pub async fn stop(&self) {
        self.play(self.state.default_item().clone()).await;
    }

    pub async fn current(&self) -> MediaItem {
        self.state.current().await
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn default_item(&self) -> &MediaItem {
        self.state.default_item()
    }

    pub fn is_default(&self, item: &MediaItem) -> bool {
        self.state.is_default(item)
    }

    pub async fn status(&self) -> PlaybackStatus {
        self.state.status().await
    }

    /// Selection and derived status, consistent with each other
    pub async fn current_with_status(&self) -> (MediaItem, PlaybackStatus) {
        self.state.current_with_status().await
    }
}
