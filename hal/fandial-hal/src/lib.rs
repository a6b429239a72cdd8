//! FanDial Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the dial firmware consumes.
//! Board support crates (M5Dial, custom ESP32-S3 boards, host simulators)
//! implement them; the core logic never touches registers or sockets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fandial-core (sync, connection, loop)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fandial-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  MQTT client  │       │ board drivers │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::Transport`] - Publish/subscribe messaging client
//! - [`encoder::RotaryEncoder`] - Dial position register
//! - [`output::Speaker`], [`output::PowerControl`] - Fire-and-forget outputs
//! - [`clock::Clock`] - Monotonic millisecond counter
//!
//! Push buttons and blocking delays use the `embedded-hal` traits directly.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod encoder;
pub mod output;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use encoder::RotaryEncoder;
pub use output::{PowerControl, Speaker};
pub use transport::{Credentials, Transport, TransportErrorKind};
