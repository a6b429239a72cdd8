//! Time source abstraction

/// Monotonic millisecond clock
///
/// Mirrors the usual `millis()` counter: the value wraps around after
/// roughly 49 days, so consumers compare timestamps with `wrapping_sub`.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `earlier`, tolerant of wrap-around
    fn elapsed_since(&self, earlier: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier)
    }
}
