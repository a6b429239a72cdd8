//! Setpoint value and its decimal wire format

use core::fmt::Write;
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wire representation of a setpoint ("0" to "100")
pub type SetpointPayload = String<3>;

/// Fan speed percentage, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Setpoint(u8);

impl Setpoint {
    /// Lowest setpoint
    pub const MIN: Setpoint = Setpoint(0);
    /// Highest setpoint
    pub const MAX: Setpoint = Setpoint(100);

    /// Create a setpoint, clamping into range
    pub fn clamped(value: i32) -> Self {
        Setpoint(value.clamp(0, 100) as u8)
    }

    /// Parse a payload permissively and clamp the result
    pub fn from_payload(payload: &[u8]) -> Self {
        Self::clamped(parse_decimal(payload))
    }

    /// Percentage value
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Value as a signed encoder position
    pub const fn as_position(self) -> i32 {
        self.0 as i32
    }

    /// Encode as a decimal string without padding
    pub fn to_payload(self) -> SetpointPayload {
        let mut s = SetpointPayload::new();
        // At most three digits
        let _ = write!(s, "{}", self.0);
        s
    }
}

impl From<Setpoint> for u8 {
    fn from(value: Setpoint) -> Self {
        value.0
    }
}

/// Parse a decimal integer the way `atol` does
///
/// Skips leading ASCII whitespace, accepts an optional sign, then consumes
/// digits until the first non-digit. No digits yields 0. Values beyond the
/// `i32` range saturate.
pub fn parse_decimal(payload: &[u8]) -> i32 {
    let mut bytes = payload
        .iter()
        .copied()
        .skip_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
        .peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for b in bytes {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = i32::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
