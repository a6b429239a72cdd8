//! Setpoint reconciliation
//!
//! Local encoder changes and remote setpoint messages both write the same
//! value; the last writer wins. A local change that is published arms a
//! single echo flag so the broker's copy of our own publish is not applied
//! a second time. The flag is cleared by the next setpoint message,
//! whatever its value.
//!
//! The engine performs no I/O. Each entry point returns what the caller
//! has to do (publish, redraw, move the encoder).

use fandial_protocol::{Channel, ChannelMap, InboundMessage, Setpoint, SetpointPayload, TextValue};

/// Effects of a local input change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalChange {
    /// Committed setpoint; the fill must be redrawn for it
    pub setpoint: Setpoint,
    /// Payload to publish on the setpoint channel, if connected
    pub publish: Option<SetpointPayload>,
}

/// Effects of a message from the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteOutcome {
    /// Setpoint message discarded as the echo of our own publish
    EchoSuppressed(i32),
    /// Remote setpoint committed; redraw the fill and move the encoder
    SetpointApplied(Setpoint),
    /// A temperature text changed; its band is dirty
    TextUpdated(Channel),
    /// Topic not subscribed by the dial
    Ignored,
}

/// Message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncStats {
    pub local_changes: u32,
    pub published: u32,
    pub echoes_suppressed: u32,
    pub remote_applied: u32,
}

/// Shared setpoint and remote text state
pub struct SyncEngine {
    channels: ChannelMap,
    setpoint: Setpoint,
    echo_pending: bool,
    inside: TextValue,
    outside: TextValue,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create an engine with no pending echo and placeholder texts
    pub fn new(channels: ChannelMap, initial: Setpoint) -> Self {
        Self {
            channels,
            setpoint: initial,
            echo_pending: false,
            inside: TextValue::waiting(),
            outside: TextValue::waiting(),
            stats: SyncStats::default(),
        }
    }

    pub fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    /// Returns true while the echo of a local publish is expected
    pub fn echo_pending(&self) -> bool {
        self.echo_pending
    }

    pub fn inside(&self) -> &TextValue {
        &self.inside
    }

    pub fn outside(&self) -> &TextValue {
        &self.outside
    }

    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Topic local changes are published on
    pub fn setpoint_topic(&self) -> &str {
        self.channels.name(Channel::Setpoint)
    }

    /// Commit a new local encoder value
    ///
    /// The value is clamped to 0..=100. A publish is requested only when
    /// `connected`; offline changes are dropped rather than queued, and do
    /// not arm the echo flag.
    pub fn on_local_input_changed(&mut self, value: i32, connected: bool) -> LocalChange {
        let setpoint = Setpoint::clamped(value);
        self.setpoint = setpoint;
        self.stats.local_changes = self.stats.local_changes.wrapping_add(1);

        let publish = if connected {
            self.echo_pending = true;
            self.stats.published = self.stats.published.wrapping_add(1);
            Some(setpoint.to_payload())
        } else {
            debug!("offline, not publishing {}", setpoint.percent());
            None
        };

        LocalChange { setpoint, publish }
    }

    /// Apply a message delivered by the broker
    ///
    /// Never fails: unparseable setpoints read as 0, unknown topics are
    /// ignored.
    pub fn on_remote_message(&mut self, topic: &str, payload: &[u8]) -> RemoteOutcome {
        match InboundMessage::parse(&self.channels, topic, payload) {
            InboundMessage::Setpoint(raw) => {
                if self.echo_pending {
                    self.echo_pending = false;
                    self.stats.echoes_suppressed = self.stats.echoes_suppressed.wrapping_add(1);
                    trace!("echo suppressed ({})", raw);
                    RemoteOutcome::EchoSuppressed(raw)
                } else {
                    let setpoint = Setpoint::clamped(raw);
                    self.setpoint = setpoint;
                    self.stats.remote_applied = self.stats.remote_applied.wrapping_add(1);
                    info!("remote setpoint {}", setpoint.percent());
                    RemoteOutcome::SetpointApplied(setpoint)
                }
            }
            InboundMessage::InsideTemp(text) => {
                self.inside = text;
                RemoteOutcome::TextUpdated(Channel::InsideTemp)
            }
            InboundMessage::OutsideTemp(text) => {
                self.outside = text;
                RemoteOutcome::TextUpdated(Channel::OutsideTemp)
            }
            InboundMessage::Unknown => {
                debug!("ignoring message on {}", topic);
                RemoteOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;

    fn engine() -> SyncEngine {
        SyncEngine::new(ChannelMap::default(), Setpoint::clamped(10))
    }

    #[test]
    fn test_local_change_publishes_when_connected() {
        let mut sync = engine();
        let change = sync.on_local_input_changed(42, true);

        assert_eq!(change.setpoint, Setpoint::clamped(42));
        assert_eq!(change.publish.as_deref(), Some("42"));
        assert!(sync.echo_pending());
        assert_eq!(sync.setpoint_topic(), "fan01");
    }

    #[test]
    fn test_local_change_offline_not_published() {
        let mut sync = engine();
        let change = sync.on_local_input_changed(55, false);

        assert_eq!(change.setpoint, Setpoint::clamped(55));
        assert_eq!(change.publish, None);
        assert!(!sync.echo_pending());
        assert_eq!(sync.setpoint(), Setpoint::clamped(55));
    }

    #[test]
    fn test_local_change_clamped() {
        let mut sync = engine();
        assert_eq!(
            sync.on_local_input_changed(250, true).publish.as_deref(),
            Some("100")
        );
        assert_eq!(
            sync.on_local_input_changed(-7, true).publish.as_deref(),
            Some("0")
        );
    }

    #[test]
    fn test_echo_suppression() {
        let mut sync = engine();
        sync.on_local_input_changed(42, true);

        // Our own publish comes back: discarded, flag cleared
        let outcome = sync.on_remote_message("fan01", b"42");
        assert_eq!(outcome, RemoteOutcome::EchoSuppressed(42));
        assert_eq!(sync.setpoint(), Setpoint::clamped(42));
        assert!(!sync.echo_pending());

        // A genuine remote change afterwards is applied
        let outcome = sync.on_remote_message("fan01", b"77");
        assert_eq!(outcome, RemoteOutcome::SetpointApplied(Setpoint::clamped(77)));
        assert_eq!(sync.setpoint(), Setpoint::clamped(77));
    }

    #[test]
    fn test_echo_flag_discards_any_value() {
        let mut sync = engine();
        sync.on_local_input_changed(42, true);

        // Whatever arrives first is treated as the echo
        let outcome = sync.on_remote_message("fan01", b"90");
        assert_eq!(outcome, RemoteOutcome::EchoSuppressed(90));
        assert_eq!(sync.setpoint(), Setpoint::clamped(42));
        assert_eq!(sync.stats().echoes_suppressed, 1);
    }

    #[test]
    fn test_malformed_setpoint_reads_zero() {
        let mut sync = engine();
        let outcome = sync.on_remote_message("fan01", b"abc");
        assert_eq!(outcome, RemoteOutcome::SetpointApplied(Setpoint::MIN));
        assert_eq!(sync.setpoint(), Setpoint::MIN);
    }

    #[test]
    fn test_remote_setpoint_clamped() {
        let mut sync = engine();
        assert_eq!(
            sync.on_remote_message("fan01", b" 150"),
            RemoteOutcome::SetpointApplied(Setpoint::MAX)
        );
        assert_eq!(
            sync.on_remote_message("fan01", b"-3"),
            RemoteOutcome::SetpointApplied(Setpoint::MIN)
        );
        assert_eq!(
            sync.on_remote_message("fan01", b"64%"),
            RemoteOutcome::SetpointApplied(Setpoint::clamped(64))
        );
    }

    #[test]
    fn test_text_channels() {
        let mut sync = engine();
        assert!(sync.inside().is_waiting());
        assert!(sync.outside().is_waiting());

        assert_eq!(
            sync.on_remote_message("/T9602-1/temp", b"21.4"),
            RemoteOutcome::TextUpdated(Channel::InsideTemp)
        );
        assert_eq!(
            sync.on_remote_message("/T9602/temp", b"-2.0"),
            RemoteOutcome::TextUpdated(Channel::OutsideTemp)
        );
        assert_eq!(sync.inside().as_str(), "21.4");
        assert_eq!(sync.outside().as_str(), "-2.0");

        // Overwritten wholesale
        sync.on_remote_message("/T9602-1/temp", b"9");
        assert_eq!(sync.inside().as_str(), "9");
    }

    #[test]
    fn test_text_does_not_touch_echo_flag() {
        let mut sync = engine();
        sync.on_local_input_changed(30, true);
        sync.on_remote_message("/T9602-1/temp", b"20");
        assert!(sync.echo_pending());
    }

    #[test]
    fn test_unknown_topic_ignored() {
        let mut sync = engine();
        sync.on_local_input_changed(30, true);
        assert_eq!(sync.on_remote_message("fan02", b"99"), RemoteOutcome::Ignored);
        assert_eq!(sync.setpoint(), Setpoint::clamped(30));
        assert!(sync.echo_pending());
    }

    proptest! {
        #[test]
        fn prop_echo_cleared_exactly_once(local in -50i32..200, remote in any::<i32>()) {
            let mut sync = engine();
            sync.on_local_input_changed(local, true);

            let payload = std::format!("{}", remote);
            let first = sync.on_remote_message("fan01", payload.as_bytes());
            prop_assert_eq!(first, RemoteOutcome::EchoSuppressed(remote));
            prop_assert_eq!(sync.setpoint(), Setpoint::clamped(local));

            let second = sync.on_remote_message("fan01", payload.as_bytes());
            prop_assert_eq!(second, RemoteOutcome::SetpointApplied(Setpoint::clamped(remote)));
        }

        #[test]
        fn prop_setpoint_always_in_range(ops in proptest::collection::vec((any::<bool>(), any::<i32>()), 0..32)) {
            let mut sync = engine();
            for (local, value) in ops {
                if local {
                    sync.on_local_input_changed(value, true);
                } else {
                    let payload = std::format!("{}", value);
                    sync.on_remote_message("fan01", payload.as_bytes());
                }
                prop_assert!(sync.setpoint().percent() <= 100);
            }
        }
    }
}
