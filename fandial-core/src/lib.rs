//! Board-agnostic core logic for the FanDial firmware
//!
//! This crate contains everything between the hardware traits and the
//! board support code:
//!
//! - Configuration types and a TOML subset parser
//! - Connection state machine with retry backoff
//! - Setpoint synchronisation with echo suppression
//! - Button gesture tracking
//! - The polling control loop tying it all together

#![no_std]
#![deny(unsafe_code)]

// Must come first so the macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod config;
pub mod connection;
pub mod control;
pub mod sync;

#[cfg(test)]
mod testing;

pub use config::DialConfig;
pub use connection::{ConnectError, ConnectionManager, ConnectionState, LinkStatus};
pub use control::{ControlLoop, CycleOutcome, Peripherals};
pub use sync::{LocalChange, RemoteOutcome, SyncEngine};
