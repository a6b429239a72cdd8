//! Rotary encoder abstraction
//!
//! The encoder exposes a signed position counter maintained by the driver
//! (quadrature decoding and detent handling happen below this trait).

/// Rotary encoder position register
pub trait RotaryEncoder {
    /// Read the current position counter
    fn read_position(&mut self) -> i32;

    /// Overwrite the position counter
    ///
    /// Used when a remote update moves the setpoint, so the next local
    /// reading starts from the new value.
    fn set_position(&mut self, position: i32);

    /// Reset the counter to zero
    fn reset_baseline(&mut self) {
        self.set_position(0);
    }
}
