//! Free-text channel values (temperature readings)

use heapless::String;

/// Maximum stored text length in bytes
///
/// Longer payloads are cut at the last character boundary that fits.
pub const MAX_TEXT_LEN: usize = 24;

/// Placeholder shown until the first message arrives
pub const WAITING_TEXT: &str = "Waiting...";

/// Text received on a free-text channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValue {
    text: String<MAX_TEXT_LEN>,
}

impl Default for TextValue {
    fn default() -> Self {
        Self::waiting()
    }
}

impl TextValue {
    /// Placeholder value
    pub fn waiting() -> Self {
        let mut text = String::new();
        let _ = text.push_str(WAITING_TEXT);
        Self { text }
    }

    /// Build from raw payload bytes
    ///
    /// Invalid UTF-8 is cut at the first bad sequence, and the result is
    /// truncated to [`MAX_TEXT_LEN`] bytes on a character boundary.
    pub fn from_payload(payload: &[u8]) -> Self {
        let valid = match core::str::from_utf8(payload) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&payload[..e.valid_up_to()]).unwrap_or(""),
        };

        let mut end = valid.len().min(MAX_TEXT_LEN);
        while !valid.is_char_boundary(end) {
            end -= 1;
        }

        let mut text = String::new();
        let _ = text.push_str(&valid[..end]);
        Self { text }
    }

    /// Stored text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Returns true while no message has replaced the placeholder
    pub fn is_waiting(&self) -> bool {
        self.text.as_str() == WAITING_TEXT
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TextValue {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.text.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_waiting() {
        let v = TextValue::default();
        assert_eq!(v.as_str(), "Waiting...");
        assert!(v.is_waiting());
    }

    #[test]
    fn test_from_payload_verbatim() {
        let v = TextValue::from_payload(b"21.4");
        assert_eq!(v.as_str(), "21.4");
        assert!(!v.is_waiting());

        let v = TextValue::from_payload(b"");
        assert_eq!(v.as_str(), "");
    }

    #[test]
    fn test_truncates_long_payload() {
        let v = TextValue::from_payload(b"0123456789012345678901234567890");
        assert_eq!(v.as_str().len(), MAX_TEXT_LEN);
        assert_eq!(v.as_str(), "012345678901234567890123");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // 23 ASCII bytes followed by a two-byte character straddling the limit
        let mut payload = [b'a'; 25];
        payload[23] = 0xC2;
        payload[24] = 0xB0;
        let v = TextValue::from_payload(&payload);
        assert_eq!(v.as_str().len(), 23);
    }

    #[test]
    fn test_invalid_utf8_cut() {
        let v = TextValue::from_payload(b"19.5\xff\xfe");
        assert_eq!(v.as_str(), "19.5");
    }
}
