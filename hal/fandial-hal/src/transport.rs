//! Publish/subscribe transport abstraction
//!
//! Provides the contract the dial needs from an MQTT client library.
//! Connection establishment below the session layer (WiFi association,
//! DHCP, DNS, TCP) is the implementation's business.

/// Classification of transport failures
///
/// Follows the `embedded-hal` convention: implementations keep their own
/// detailed error type and map it onto one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum TransportErrorKind {
    /// Broker rejected the session (bad credentials, client id in use)
    Refused,
    /// Broker did not answer in time
    Timeout,
    /// Operation needs an established session
    NotConnected,
    /// Underlying socket or network failure
    Io,
    /// Anything else
    Other,
}

/// Transport error
pub trait Error: core::fmt::Debug {
    /// Convert the implementation error into a generic kind
    fn kind(&self) -> TransportErrorKind;
}

impl Error for TransportErrorKind {
    fn kind(&self) -> TransportErrorKind {
        *self
    }
}

/// Session credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Broker user name
    pub username: &'a str,
    /// Broker password
    pub password: &'a str,
}

/// Messaging client
///
/// The dial drives the client from a single polling loop; none of these
/// methods are expected to be re-entrant.
pub trait Transport {
    /// Error type for transport operations
    type Error: Error;

    /// Open a session with the broker
    fn connect(
        &mut self,
        client_id: &str,
        credentials: Option<Credentials<'_>>,
    ) -> Result<(), Self::Error>;

    /// Subscribe to a channel (topic)
    fn subscribe(&mut self, channel: &str) -> Result<(), Self::Error>;

    /// Publish a payload on a channel
    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), Self::Error>;

    /// Check session liveness
    ///
    /// Keep-alive and timeout handling are internal to the implementation;
    /// this only reports the outcome.
    fn is_connected(&mut self) -> bool;

    /// Service the connection and deliver pending inbound messages
    ///
    /// Every message received since the last call is handed to
    /// `on_message` as `(channel, payload)`, in arrival order.
    fn poll(&mut self, on_message: &mut dyn FnMut(&str, &[u8])) -> Result<(), Self::Error>;
}
