//! Broker session management with retry backoff

use embedded_hal::delay::DelayNs;
use fandial_hal::transport::Error as _;
use fandial_hal::{Transport, TransportErrorKind};
use fandial_protocol::{Channel, ChannelMap};

use super::state::{ConnectionEvent, ConnectionState};
use crate::config::{DialConfig, MqttConfig};

/// Progress reported while (re)connecting, for status screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Attempt started
    Connecting,
    /// Session established and subscribed
    Connected,
    /// Attempt failed; backoff running
    Retrying,
}

/// Reasons a connection attempt did not produce a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectError {
    /// Broker connect failed
    Connect(TransportErrorKind),
    /// Subscribing one of the channels failed
    Subscribe(Channel, TransportErrorKind),
    /// Previous attempt failed and its backoff has not elapsed
    BackoffPending,
}

/// Attempt counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionStats {
    /// Total attempts since boot
    pub attempts: u32,
    /// Failures since the last successful attempt
    pub consecutive_failures: u32,
    /// Most recent failure
    pub last_failure: Option<ConnectError>,
}

/// Owns the connection state and the retry policy
///
/// The transport itself is passed into every call so the caller keeps
/// ownership of it between cycles.
pub struct ConnectionManager {
    state: ConnectionState,
    mqtt: MqttConfig,
    channels: ChannelMap,
    backoff_ms: u32,
    /// Earliest time of the next non-blocking attempt
    retry_at: Option<u32>,
    stats: ConnectionStats,
}

impl ConnectionManager {
    /// Create a manager for a broker session
    pub fn new(mqtt: MqttConfig, channels: ChannelMap, backoff_ms: u32) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            mqtt,
            channels,
            backoff_ms,
            retry_at: None,
            stats: ConnectionStats::default(),
        }
    }

    /// Create a manager from the dial configuration
    pub fn from_config(config: &DialConfig) -> Self {
        Self::new(
            config.mqtt.clone(),
            config.channels.clone(),
            config.timing.reconnect_backoff_ms,
        )
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Check the session is still up
    ///
    /// A session the transport no longer reports as connected is dropped.
    pub fn connected<T: Transport>(&mut self, transport: &mut T) -> bool {
        if self.state.is_connected() && !transport.is_connected() {
            self.link_lost();
        }
        self.state.is_connected()
    }

    /// Drop the session after the transport failed
    pub fn link_lost(&mut self) {
        if self.state.is_connected() {
            warn!("broker link lost");
            self.state = self.state.transition(ConnectionEvent::LinkLost);
        }
    }

    /// Make sure a session exists, blocking through the backoff on failure
    ///
    /// Makes at most one attempt per call. On failure `delay` is used to
    /// wait out the backoff before the error is returned.
    pub fn ensure_connected<T, D, F>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
        mut on_status: F,
    ) -> Result<(), ConnectError>
    where
        T: Transport,
        D: DelayNs,
        F: FnMut(LinkStatus),
    {
        if self.connected(transport) {
            return Ok(());
        }

        self.attempt(transport, &mut on_status).map_err(|e| {
            on_status(LinkStatus::Retrying);
            delay.delay_ms(self.backoff_ms);
            e
        })
    }

    /// Make sure a session exists without ever sleeping
    ///
    /// After a failure no new attempt is made until `backoff_ms` has passed;
    /// calls made earlier return [`ConnectError::BackoffPending`].
    pub fn poll_connect<T, F>(
        &mut self,
        transport: &mut T,
        now_ms: u32,
        mut on_status: F,
    ) -> Result<(), ConnectError>
    where
        T: Transport,
        F: FnMut(LinkStatus),
    {
        if self.connected(transport) {
            return Ok(());
        }

        if let Some(at) = self.retry_at {
            // Wrapping comparison; valid for deadlines up to ~24 days out
            if (now_ms.wrapping_sub(at) as i32) < 0 {
                return Err(ConnectError::BackoffPending);
            }
        }

        self.attempt(transport, &mut on_status).map_err(|e| {
            self.retry_at = Some(now_ms.wrapping_add(self.backoff_ms));
            on_status(LinkStatus::Retrying);
            e
        })
    }

    fn attempt<T, F>(&mut self, transport: &mut T, on_status: &mut F) -> Result<(), ConnectError>
    where
        T: Transport,
        F: FnMut(LinkStatus),
    {
        self.state = self.state.transition(ConnectionEvent::Attempt);
        self.stats.attempts = self.stats.attempts.wrapping_add(1);
        on_status(LinkStatus::Connecting);
        info!("connecting as {}", self.mqtt.client_id.as_str());

        match self.open_session(transport) {
            Ok(()) => {
                self.state = self.state.transition(ConnectionEvent::Established);
                self.stats.consecutive_failures = 0;
                self.retry_at = None;
                info!("broker session up");
                on_status(LinkStatus::Connected);
                Ok(())
            }
            Err(e) => {
                self.state = self.state.transition(ConnectionEvent::Failed);
                self.stats.consecutive_failures = self.stats.consecutive_failures.saturating_add(1);
                self.stats.last_failure = Some(e);
                warn!(
                    "connect failed: {}, retrying in {} ms",
                    e,
                    self.backoff_ms
                );
                Err(e)
            }
        }
    }

    /// Connect, then subscribe every channel in order
    fn open_session<T: Transport>(&self, transport: &mut T) -> Result<(), ConnectError> {
        transport
            .connect(self.mqtt.client_id.as_str(), self.mqtt.credentials())
            .map_err(|e| ConnectError::Connect(e.kind()))?;

        for (channel, name) in self.channels.iter() {
            transport
                .subscribe(name)
                .map_err(|e| ConnectError::Subscribe(channel, e.kind()))?;
            debug!("subscribed {}", name);
        }
        Ok(())
    }
}
