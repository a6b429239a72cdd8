//! Control loop and button gestures

mod driver;
mod gesture;

pub use driver::{ControlLoop, CycleOutcome, Peripherals};
pub use gesture::{ButtonTracker, Gesture};
