//! Channel identities and the topic names they map to

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum topic name length
pub const MAX_CHANNEL_LEN: usize = 64;

/// Default setpoint topic
pub const DEFAULT_SETPOINT_TOPIC: &str = "fan01";
/// Default inside temperature topic
pub const DEFAULT_INSIDE_TOPIC: &str = "/T9602-1/temp";
/// Default outside temperature topic
pub const DEFAULT_OUTSIDE_TOPIC: &str = "/T9602/temp";

/// Logical channels the dial cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Shared fan speed percentage (published and subscribed)
    Setpoint,
    /// Inside temperature reading (subscribed only)
    InsideTemp,
    /// Outside temperature reading (subscribed only)
    OutsideTemp,
}

impl Channel {
    /// All channels, in subscription order
    pub const ALL: [Channel; 3] = [Channel::Setpoint, Channel::InsideTemp, Channel::OutsideTemp];
}

/// Errors building a channel map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Topic name is empty
    Empty(Channel),
    /// Topic name exceeds [`MAX_CHANNEL_LEN`]
    TooLong(Channel),
    /// Two channels share the same topic
    Duplicate(Channel),
}

/// Topic names for each logical channel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMap {
    setpoint: String<MAX_CHANNEL_LEN>,
    inside: String<MAX_CHANNEL_LEN>,
    outside: String<MAX_CHANNEL_LEN>,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            setpoint: fixed(DEFAULT_SETPOINT_TOPIC),
            inside: fixed(DEFAULT_INSIDE_TOPIC),
            outside: fixed(DEFAULT_OUTSIDE_TOPIC),
        }
    }
}

impl ChannelMap {
    /// Build a map from three topic names
    pub fn new(setpoint: &str, inside: &str, outside: &str) -> Result<Self, ChannelError> {
        let map = Self {
            setpoint: topic(Channel::Setpoint, setpoint)?,
            inside: topic(Channel::InsideTemp, inside)?,
            outside: topic(Channel::OutsideTemp, outside)?,
        };
        map.check_distinct()?;
        Ok(map)
    }

    /// Replace the topic of one channel
    pub fn set(&mut self, channel: Channel, name: &str) -> Result<(), ChannelError> {
        let name = topic(channel, name)?;
        match channel {
            Channel::Setpoint => self.setpoint = name,
            Channel::InsideTemp => self.inside = name,
            Channel::OutsideTemp => self.outside = name,
        }
        Ok(())
    }

    /// Topic name of a channel
    pub fn name(&self, channel: Channel) -> &str {
        match channel {
            Channel::Setpoint => self.setpoint.as_str(),
            Channel::InsideTemp => self.inside.as_str(),
            Channel::OutsideTemp => self.outside.as_str(),
        }
    }

    /// Find the logical channel for an incoming topic
    ///
    /// Matching is exact; MQTT wildcards are not interpreted.
    pub fn resolve(&self, name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| self.name(*c) == name)
    }

    /// Iterate `(channel, topic)` pairs in subscription order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &str)> {
        Channel::ALL.into_iter().map(move |c| (c, self.name(c)))
    }

    /// Ensure no two channels share a topic
    pub fn check_distinct(&self) -> Result<(), ChannelError> {
        if self.inside == self.setpoint {
            return Err(ChannelError::Duplicate(Channel::InsideTemp));
        }
        if self.outside == self.setpoint || self.outside == self.inside {
            return Err(ChannelError::Duplicate(Channel::OutsideTemp));
        }
        Ok(())
    }
}

fn topic(channel: Channel, name: &str) -> Result<String<MAX_CHANNEL_LEN>, ChannelError> {
    if name.is_empty() {
        return Err(ChannelError::Empty(channel));
    }
    String::try_from(name).map_err(|_| ChannelError::TooLong(channel))
}

fn fixed(name: &str) -> String<MAX_CHANNEL_LEN> {
    // Only used with the short compile-time defaults above
    let mut s = String::new();
    let _ = s.push_str(name);
    s
}
