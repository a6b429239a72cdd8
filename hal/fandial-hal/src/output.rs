//! Fire-and-forget outputs
//!
//! None of these report success; the firmware never waits on them.

/// Audio feedback output (piezo or I2S speaker)
pub trait Speaker {
    /// Play a tone of `freq_hz` for `duration_ms`
    ///
    /// Implementations must not block for the tone duration.
    fn tone(&mut self, freq_hz: u32, duration_ms: u32);
}

/// Power management hook
pub trait PowerControl {
    /// Cut power to the device
    ///
    /// On real hardware this does not return. Host implementations may
    /// return, in which case the caller stops its loop.
    fn power_off(&mut self);
}
