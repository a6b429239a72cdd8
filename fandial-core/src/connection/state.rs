//! Connection state machine
//!
//! The session moves between three states. Anything not listed in
//! [`ConnectionState::transition`] leaves the state unchanged.

/// Broker session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No session; initial state
    #[default]
    Disconnected,
    /// Connect and subscribe in progress
    Connecting,
    /// Session up and all channels subscribed
    Connected,
}

/// Events that drive the connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionEvent {
    /// A connection attempt was started
    Attempt,
    /// Connect and all subscriptions succeeded
    Established,
    /// Connect or a subscription failed
    Failed,
    /// Transport reported the session gone
    LinkLost,
}

impl ConnectionState {
    /// Check if the session is usable
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: ConnectionEvent) -> Self {
        use ConnectionEvent::*;
        use ConnectionState::*;

        match (self, event) {
            (Disconnected, Attempt) => Connecting,

            (Connecting, Established) => Connected,
            (Connecting, Failed) => Disconnected,

            (Connected, LinkLost) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}
