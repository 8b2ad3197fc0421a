//! Playback supervisor
//!
//! Owns the display process lifecycle. Each loop iteration:
//!
//! 1. Resolves the media kind of the current selection and picks its profile.
//!    Unsupported, missing or unlaunchable items fall back to the default item.
//! 2. Launches the display process and marks playback as playing.
//! 3. Races the command drain (control bytes into the process input, ending on
//!    `Kill`) against the process exiting. The loser is dropped in place, which
//!    cancels it before the loop moves on; no second queue consumer can outlive
//!    its iteration.
//! 4. Marks playback as not playing, terminates and reaps the process if it is
//!    still running, and starts over with whatever is selected now.
//!
//! There is no exit timeout: a display program that hangs while ignoring both
//! its quit byte and the kill signal blocks the loop.

use super::command::{command_channel, Command, CommandReceiver};
use super::player::Player;
use super::process::{ControlInput, DisplayProcess};
use crate::error::Error;
use crate::media::{MediaItem, MediaProfiles, Shortcuts};
use crate::state::SharedState;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Settings for a [`Supervisor`]
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    pub profiles: MediaProfiles,
    pub default_item: MediaItem,
    pub initial_item: Option<MediaItem>,
    /// Pause before relaunching a process that exited with failure
    pub respawn_delay: Duration,
}

/// Supervision loop; consumes the command channel
pub struct Supervisor {
    state: Arc<SharedState>,
    commands: CommandReceiver,
    profiles: Arc<MediaProfiles>,
    respawn_delay: Duration,
}

/// What the loop does after an iteration
#[derive(Debug, PartialEq, Eq)]
enum Cycle {
    Continue,
    Shutdown,
}

/// Why the command drain ended
#[derive(Debug, PartialEq, Eq)]
enum DrainOutcome {
    Killed,
    InputClosed,
    ChannelClosed,
}

enum RaceOutcome {
    Drained(DrainOutcome),
    Exited(std::io::Result<ExitStatus>),
}

impl Supervisor {
    /// Create the supervisor and the handle used to control it
    pub fn new(options: SupervisorOptions) -> (Self, Player) {
        let state = Arc::new(SharedState::new(options.default_item, options.initial_item));
        let (tx, rx) = command_channel();
        let supervisor = Self {
            state: Arc::clone(&state),
            commands: rx,
            profiles: Arc::new(options.profiles),
            respawn_delay: options.respawn_delay,
        };
        (supervisor, Player::new(state, tx))
    }

    /// Run until every [`Player`] handle has been dropped
    pub async fn run(mut self) {
        info!("Playback supervisor started");
        while self.run_cycle().await == Cycle::Continue {}
        info!("Command channel closed, playback supervisor stopped");
    }

    async fn run_cycle(&mut self) -> Cycle {
        let item = self.state.current().await;
        let profiles = Arc::clone(&self.profiles);

        let profile = match profiles.profile_for(&item) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("{}", e);
                return self.fall_back(&item).await;
            }
        };
        if !item.exists() {
            warn!("{}", Error::NotFound(item.to_string()));
            return self.fall_back(&item).await;
        }

        let mut process = match DisplayProcess::spawn(profile, &item) {
            Ok(process) => process,
            Err(e) => {
                error!("{}", e);
                return self.fall_back(&item).await;
            }
        };
        self.state.set_playing(true);

        let mut input = process.take_input();
        let outcome = tokio::select! {
            drained = drain_commands(&mut self.commands, input.as_mut(), &profile.shortcuts) => {
                RaceOutcome::Drained(drained)
            }
            status = process.wait() => RaceOutcome::Exited(status),
        };
        self.state.set_playing(false);
        drop(input);

        match outcome {
            RaceOutcome::Exited(Ok(status)) => {
                info!("Display process for {} exited: {}", item, status);
                if status.success() {
                    Cycle::Continue
                } else {
                    self.respawn_pause().await
                }
            }
            RaceOutcome::Exited(Err(e)) => {
                error!("Failed waiting for display process of {}: {}", item, e);
                process.terminate();
                self.respawn_pause().await
            }
            RaceOutcome::Drained(drained) => {
                process.terminate();
                match process.wait().await {
                    Ok(status) => debug!("Display process for {} stopped: {}", item, status),
                    Err(e) => warn!("Failed reaping display process of {}: {}", item, e),
                }
                if drained == DrainOutcome::ChannelClosed {
                    Cycle::Shutdown
                } else {
                    Cycle::Continue
                }
            }
        }
    }

    /// Replace a selection that cannot be displayed with the default item
    async fn fall_back(&mut self, failed: &MediaItem) -> Cycle {
        self.state.set_playing(false);

        if self.state.is_default(failed) {
            warn!("Default item {} cannot be displayed, waiting for the next command", failed);
            return self.idle().await;
        }

        let default_item = self.state.default_item().clone();
        if self.state.replace_current(failed, default_item).await {
            info!("Falling back to default item {}", self.state.default_item());
        }
        Cycle::Continue
    }

    /// Block until any command arrives
    async fn idle(&mut self) -> Cycle {
        match self.commands.recv().await {
            Some(command) => {
                debug!("Woken by {:?}", command);
                Cycle::Continue
            }
            None => Cycle::Shutdown,
        }
    }

    /// Wait before relaunching; any command ends the wait early
    async fn respawn_pause(&mut self) -> Cycle {
        if self.respawn_delay.is_zero() {
            return Cycle::Continue;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.respawn_delay) => Cycle::Continue,
            command = self.commands.recv() => match command {
                Some(command) => {
                    debug!("Respawn delay cut short by {:?}", command);
                    Cycle::Continue
                }
                None => Cycle::Shutdown,
            },
        }
    }
}

/// Forward queued commands to the display process until a `Kill`
///
/// Writes are best-effort: a failed write means the process is gone, which
/// ends the drain without surfacing an error.
async fn drain_commands(
    commands: &mut CommandReceiver,
    mut input: Option<&mut ControlInput>,
    shortcuts: &Shortcuts,
) -> DrainOutcome {
    loop {
        let Some(command) = commands.recv().await else {
            return DrainOutcome::ChannelClosed;
        };
        debug!("Command: {:?}", command);

        if let (Some(byte), Some(stdin)) = (shortcuts.byte_for(command), input.as_deref_mut()) {
            if let Err(e) = stdin.send(byte).await {
                debug!("process missing: {}", e);
                return match command {
                    Command::Kill => DrainOutcome::Killed,
                    Command::TogglePlayPause => DrainOutcome::InputClosed,
                };
            }
        }

        if command == Command::Kill {
            return DrainOutcome::Killed;
        }
    }
}
