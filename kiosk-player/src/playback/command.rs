//! Control command channel
//!
//! Unbounded FIFO between the API-facing [`Player`](super::Player) handles
//! (many producers) and the supervision loop (single consumer). Sending never
//! blocks and never fails; commands are not deduplicated.

use tokio::sync::mpsc;
use tracing::debug;

/// Control command delivered to the display process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Stop the current process so the loop relaunches with the current selection
    Kill,

    /// Toggle pause/resume in the display program
    TogglePlayPause,
}

/// Create a connected sender/receiver pair
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Producer half; cheap to clone
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Enqueue a command
    ///
    /// If the supervision loop has already shut down the command is dropped.
    pub fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            debug!("Supervisor gone, dropping {:?}", command);
        }
    }
}

/// Consumer half, owned by the supervision loop
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandReceiver {
    /// Wait for the next command; `None` once every sender is gone
    ///
    /// Cancel-safe: dropping the future before it completes loses no command.
    pub async fn recv(&mut self) -> Option<Command> {
        self.rx.recv().await
    }

    /// Take a command if one is already queued
    pub fn try_recv(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}
