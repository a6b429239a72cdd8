//! Classification of messages delivered by the broker

use crate::channel::{Channel, ChannelMap};
use crate::setpoint::parse_decimal;
use crate::text::TextValue;

/// A message received from the broker, interpreted by channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Setpoint update; raw parsed value, not yet clamped
    Setpoint(i32),
    /// Inside temperature text
    InsideTemp(TextValue),
    /// Outside temperature text
    OutsideTemp(TextValue),
    /// Topic the dial never subscribed to
    Unknown,
}

impl InboundMessage {
    /// Interpret a `(topic, payload)` pair
    pub fn parse(channels: &ChannelMap, topic: &str, payload: &[u8]) -> Self {
        match channels.resolve(topic) {
            Some(Channel::Setpoint) => InboundMessage::Setpoint(parse_decimal(payload)),
            Some(Channel::InsideTemp) => {
                InboundMessage::InsideTemp(TextValue::from_payload(payload))
            }
            Some(Channel::OutsideTemp) => {
                InboundMessage::OutsideTemp(TextValue::from_payload(payload))
            }
            None => InboundMessage::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setpoint() {
        let map = ChannelMap::default();
        assert_eq!(
            InboundMessage::parse(&map, "fan01", b"64"),
            InboundMessage::Setpoint(64)
        );
        assert_eq!(
            InboundMessage::parse(&map, "fan01", b"junk"),
            InboundMessage::Setpoint(0)
        );
    }

    #[test]
    fn test_parse_text_channels() {
        let map = ChannelMap::default();
        match InboundMessage::parse(&map, "/T9602-1/temp", b"21.4") {
            InboundMessage::InsideTemp(v) => assert_eq!(v.as_str(), "21.4"),
            other => panic!("Wrong message: {:?}", other),
        }
        match InboundMessage::parse(&map, "/T9602/temp", b"-3.0") {
            InboundMessage::OutsideTemp(v) => assert_eq!(v.as_str(), "-3.0"),
            other => panic!("Wrong message: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_topic() {
        let map = ChannelMap::default();
        assert_eq!(
            InboundMessage::parse(&map, "fan02", b"50"),
            InboundMessage::Unknown
        );
    }
}
