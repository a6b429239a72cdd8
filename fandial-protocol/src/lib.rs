//! FanDial messaging protocol
//!
//! This crate defines what travels over the broker between the dial and
//! the rest of the home automation setup.
//!
//! # Channel Overview
//!
//! ```text
//! ┌──────────────────┬───────────┬──────────────────────────────┐
//! │ CHANNEL          │ DIRECTION │ PAYLOAD                      │
//! ├──────────────────┼───────────┼──────────────────────────────┤
//! │ fan01            │ pub + sub │ decimal percentage "0".."100"│
//! │ /T9602-1/temp    │ sub       │ free text (inside reading)   │
//! │ /T9602/temp      │ sub       │ free text (outside reading)  │
//! └──────────────────┴───────────┴──────────────────────────────┘
//! ```
//!
//! Numeric payloads are parsed permissively: garbage degrades to zero
//! instead of failing, matching what other publishers on the bus expect.

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod inbound;
pub mod setpoint;
pub mod text;

pub use channel::{Channel, ChannelError, ChannelMap, MAX_CHANNEL_LEN};
pub use inbound::InboundMessage;
pub use setpoint::{parse_decimal, Setpoint, SetpointPayload};
pub use text::{TextValue, MAX_TEXT_LEN, WAITING_TEXT};
