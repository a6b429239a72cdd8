//! Push-button gesture detection
//!
//! Polled once per loop cycle with the debounced button level. A press
//! released before the long-press threshold is a click; holding past the
//! threshold fires a single long press and the eventual release is
//! swallowed.

/// Recognised button gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Short press, reported on release
    Click,
    /// Held for at least the long-press time, reported while still held
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Released,
    Pressed { since_ms: u32 },
    /// Long press already reported; waiting for release
    Held,
}

/// Turns button levels into gestures
#[derive(Debug, Clone)]
pub struct ButtonTracker {
    long_press_ms: u32,
    phase: Phase,
}

impl ButtonTracker {
    pub fn new(long_press_ms: u32) -> Self {
        Self {
            long_press_ms,
            phase: Phase::Released,
        }
    }

    /// Returns true while the button is down
    pub fn is_pressed(&self) -> bool {
        !matches!(self.phase, Phase::Released)
    }

    /// Feed the current level; returns a gesture when one completes
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<Gesture> {
        match (self.phase, pressed) {
            (Phase::Released, true) => {
                self.phase = Phase::Pressed { since_ms: now_ms };
                None
            }
            (Phase::Pressed { since_ms }, true) => {
                if now_ms.wrapping_sub(since_ms) >= self.long_press_ms {
                    self.phase = Phase::Held;
                    Some(Gesture::LongPress)
                } else {
                    None
                }
            }
            (Phase::Pressed { since_ms }, false) => {
                self.phase = Phase::Released;
                // Released exactly at the threshold still counts as a hold
                if now_ms.wrapping_sub(since_ms) >= self.long_press_ms {
                    Some(Gesture::LongPress)
                } else {
                    Some(Gesture::Click)
                }
            }
            (Phase::Held, false) => {
                self.phase = Phase::Released;
                None
            }
            (Phase::Released, false) | (Phase::Held, true) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_on_release() {
        let mut button = ButtonTracker::new(2000);
        assert_eq!(button.update(true, 100), None);
        assert!(button.is_pressed());
        assert_eq!(button.update(true, 300), None);
        assert_eq!(button.update(false, 400), Some(Gesture::Click));
        assert!(!button.is_pressed());
        assert_eq!(button.update(false, 500), None);
    }

    #[test]
    fn test_long_press_fires_once() {
        let mut button = ButtonTracker::new(2000);
        button.update(true, 0);
        assert_eq!(button.update(true, 1999), None);
        assert_eq!(button.update(true, 2000), Some(Gesture::LongPress));
        assert_eq!(button.update(true, 2500), None);
        // Release after a long press is not a click
        assert_eq!(button.update(false, 3000), None);
        assert_eq!(button.update(false, 3100), None);
    }

    #[test]
    fn test_release_past_threshold_between_polls() {
        let mut button = ButtonTracker::new(2000);
        button.update(true, 0);
        assert_eq!(button.update(false, 2600), Some(Gesture::LongPress));
    }

    #[test]
    fn test_press_across_clock_wrap() {
        let mut button = ButtonTracker::new(2000);
        button.update(true, u32::MAX - 500);
        assert_eq!(button.update(true, 1000), None);
        assert_eq!(button.update(true, 1500), Some(Gesture::LongPress));
    }

    #[test]
    fn test_idle_release_ignored() {
        let mut button = ButtonTracker::new(2000);
        assert_eq!(button.update(false, 0), None);
        assert_eq!(button.update(false, 10_000), None);
    }
}
