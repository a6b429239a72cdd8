//! Rendering for the FanDial round display
//!
//! This crate provides:
//! - `color_for` gradient mapping from percentage to RGB565
//! - `Layout` geometry for the fill bar, text bands and labels
//! - `DisplayBackend` trait with region-scoped drawing primitives
//! - `RenderState` which tracks what is on screen and repaints only what
//!   the caller asks for
//! - `GraphicsBackend`, an adapter for any `embedded-graphics` draw target
//!
//! # Screen Layout
//!
//! ```text
//!          ┌───────────────┐
//!        ╱  Outside Temp    ╲   <- band at h/2 - 80
//!       │   Inside Temp      │  <- band at h/2 - 60
//!       │                    │
//!       │        42%         │  <- centre
//!       │▓▓▓▓▓▓ FAN01 ▓▓▓▓▓▓▓│  <- fill bar rises from the bottom
//!        ╲▓▓▓▓▓ Speed ▓▓▓▓▓╱
//!          └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod color;
pub mod graphics;
pub mod layout;
pub mod render;

// Re-export key types
pub use backend::{Anchor, DisplayBackend, DisplayError, Font, Region, TextStyle};
pub use color::{color_for, gradient_rgb, FILL_COLOR};
pub use embedded_graphics::pixelcolor::Rgb565;
pub use graphics::GraphicsBackend;
pub use layout::{Layout, TextBand};
pub use render::{RedrawPlan, RenderSnapshot, RenderState, StatusScreen};
