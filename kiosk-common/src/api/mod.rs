//! Wire types shared between the player service and its HTTP clients

pub mod types;
