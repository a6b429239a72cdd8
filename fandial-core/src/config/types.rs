//! Configuration type definitions
//!
//! Defaults reproduce the stock M5Dial fan controller setup.

use heapless::String;

use fandial_hal::Credentials;
use fandial_protocol::{ChannelError, ChannelMap, Setpoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum broker host name length
pub const MAX_HOST_LEN: usize = 64;

/// Maximum client id length
pub const MAX_CLIENT_ID_LEN: usize = 32;

/// Maximum user name length
pub const MAX_USERNAME_LEN: usize = 32;

/// Maximum password length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum fan label length
pub const MAX_LABEL_LEN: usize = fandial_display::render::MAX_LABEL_LEN;

/// Broker session settings
///
/// Host and port are consumed by the transport implementation; the core
/// only uses the client id and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MqttConfig {
    /// Broker host name or address
    pub broker_host: String<MAX_HOST_LEN>,
    /// Broker TCP port
    pub broker_port: u16,
    /// Client identifier presented to the broker
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// User name (empty for anonymous sessions)
    pub username: String<MAX_USERNAME_LEN>,
    /// Password
    pub password: String<MAX_PASSWORD_LEN>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        let mut client_id = String::new();
        let _ = client_id.push_str("M5DialClient");
        Self {
            broker_host: String::new(),
            broker_port: 1883,
            client_id,
            username: String::new(),
            password: String::new(),
        }
    }
}

impl MqttConfig {
    /// Credentials for the session, if a user name is configured
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        if self.username.is_empty() {
            None
        } else {
            Some(Credentials {
                username: self.username.as_str(),
                password: self.password.as_str(),
            })
        }
    }
}

/// Timing parameters (all in milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Wait after a failed connection attempt
    pub reconnect_backoff_ms: u32,
    /// Period of the text band refresh
    pub render_interval_ms: u32,
    /// Hold time that turns a press into the shutdown gesture
    pub long_press_ms: u32,
    /// Time the power-off message stays up before power is cut
    pub shutdown_delay_ms: u32,
    /// Time the "Connected!" splash stays up
    pub connected_splash_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: 5000,
            render_interval_ms: 1000,
            long_press_ms: 2000,
            shutdown_delay_ms: 1000,
            connected_splash_ms: 500,
        }
    }
}

/// User interface settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UiConfig {
    /// Label drawn under the percentage
    pub fan_label: String<MAX_LABEL_LEN>,
    /// Encoder position restored by a short press (and at boot)
    pub reset_position: u8,
    /// Acknowledgement tone frequency
    pub tone_hz: u32,
    /// Acknowledgement tone duration
    pub tone_ms: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        let mut fan_label = String::new();
        let _ = fan_label.push_str("FAN01");
        Self {
            fan_label,
            reset_position: 10,
            tone_hz: 8000,
            tone_ms: 20,
        }
    }
}

impl UiConfig {
    /// Reset position as a setpoint
    pub fn reset_setpoint(&self) -> Setpoint {
        Setpoint::clamped(i32::from(self.reset_position))
    }
}

/// How the loop waits out the reconnect backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReconnectMode {
    /// Sleep through the backoff; nothing else runs meanwhile
    #[default]
    Blocking,
    /// Keep cycling and retry once the backoff deadline has passed
    NonBlocking,
}

/// What the dial does while the broker is unreachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OfflinePolicy {
    /// Freeze input and display until the session is back
    #[default]
    Hold,
    /// Keep following the dial locally; changes are not published
    LocalOnly,
}

/// Which text bands the periodic refresh repaints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BandRefresh {
    /// Repaint both bands on every tick
    #[default]
    Always,
    /// Repaint only bands whose text or highlight changed
    OnChange,
}

/// Behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BehaviorConfig {
    pub reconnect: ReconnectMode,
    pub offline: OfflinePolicy,
    pub band_refresh: BandRefresh,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Topic layout is invalid
    Channel(ChannelError),
    /// Client id is empty
    EmptyClientId,
    /// A timing value that must be positive is zero
    ZeroInterval,
    /// Reset position outside 0..=100
    PositionOutOfRange,
    /// Panel too small for the band layout
    InvalidDisplaySize,
}

impl From<ChannelError> for ConfigError {
    fn from(e: ChannelError) -> Self {
        ConfigError::Channel(e)
    }
}

/// Complete dial configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DialConfig {
    pub mqtt: MqttConfig,
    pub channels: ChannelMap,
    pub timing: TimingConfig,
    pub ui: UiConfig,
    pub behavior: BehaviorConfig,
}

impl DialConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.client_id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }

        self.channels.check_distinct()?;

        let t = &self.timing;
        if t.render_interval_ms == 0 || t.long_press_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.ui.reset_position > 100 {
            return Err(ConfigError::PositionOutOfRange);
        }

        Ok(())
    }
}
