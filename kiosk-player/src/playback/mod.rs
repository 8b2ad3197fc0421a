//! Playback supervision
//!
//! - `command`: control command channel (API → supervisor)
//! - `player`: cloneable control handle used by the API
//! - `process`: display process launch and control input
//! - `supervisor`: the supervision loop

pub mod command;
pub mod player;
pub mod process;
pub mod supervisor;

pub use command::{command_channel, Command, CommandReceiver, CommandSender};
pub use player::Player;
pub use process::{ControlInput, DisplayProcess};
pub use supervisor::{Supervisor, SupervisorOptions};
