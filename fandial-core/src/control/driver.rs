//! The polling control loop
//!
//! One [`ControlLoop::step`] is one pass of the firmware main loop:
//!
//! 1. Make sure the broker session is up (drawing status screens)
//! 2. Drain inbound messages into the sync engine
//! 3. Read the encoder and publish local changes
//! 4. Refresh the temperature bands on the render interval (online only)
//! 5. Handle button gestures (reset and shutdown)
//!
//! Everything runs on the caller's thread. The only blocking waits are
//! the reconnect backoff in blocking mode, the connected splash and the
//! shutdown delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use fandial_display::{DisplayBackend, Layout, RenderState, StatusScreen};
use fandial_hal::transport::Error as _;
use fandial_hal::{Clock, PowerControl, RotaryEncoder, Speaker, Transport, TransportErrorKind};
use fandial_protocol::Setpoint;

use super::gesture::{ButtonTracker, Gesture};
use crate::config::{BandRefresh, ConfigError, DialConfig, OfflinePolicy, ReconnectMode};
use crate::connection::{ConnectionManager, LinkStatus};
use crate::sync::{RemoteOutcome, SyncEngine};

/// Smallest panel height that fits the band layout
const MIN_DISPLAY_HEIGHT: u32 = 200;

/// Hardware the loop drives
///
/// `button` is active low.
pub struct Peripherals<T, E, B, D, S, P, C, W> {
    pub transport: T,
    pub encoder: E,
    pub button: B,
    pub display: D,
    pub speaker: S,
    pub power: P,
    pub clock: C,
    pub delay: W,
}

/// Result of one loop pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Ran with a live broker session
    Ran,
    /// No session; see the offline policy for what still ran
    Offline,
    /// Shutdown gesture handled; power has been cut
    PoweredOff,
}

/// Owns all dial state and drives the peripherals
pub struct ControlLoop<T, E, B, D, S, P, C, W> {
    hw: Peripherals<T, E, B, D, S, P, C, W>,
    config: DialConfig,
    connection: ConnectionManager,
    engine: SyncEngine,
    render: RenderState,
    button: ButtonTracker,
    /// Treat the next encoder read as a change even if it matches
    force_local: bool,
    /// Fill must be repainted (status screen drawn or setpoint changed)
    fill_dirty: bool,
    last_render_ms: u32,
}

impl<T, E, B, D, S, P, C, W> ControlLoop<T, E, B, D, S, P, C, W>
where
    T: Transport,
    E: RotaryEncoder,
    B: InputPin,
    D: DisplayBackend,
    S: Speaker,
    P: PowerControl,
    C: Clock,
    W: DelayNs,
{
    /// Validate the configuration and prepare the dial
    ///
    /// The encoder is zeroed and moved to the reset position. The first
    /// cycle always treats that position as a local change.
    pub fn new(
        mut hw: Peripherals<T, E, B, D, S, P, C, W>,
        config: DialConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (width, height) = hw.display.dimensions();
        if width == 0 || height < MIN_DISPLAY_HEIGHT {
            return Err(ConfigError::InvalidDisplaySize);
        }

        hw.encoder.reset_baseline();
        hw.encoder
            .set_position(config.ui.reset_setpoint().as_position());

        let render = RenderState::new(Layout::new(width, height), &config.ui.fan_label);
        let now = hw.clock.now_ms();

        Ok(Self {
            connection: ConnectionManager::from_config(&config),
            engine: SyncEngine::new(config.channels.clone(), Setpoint::MIN),
            render,
            button: ButtonTracker::new(config.timing.long_press_ms),
            force_local: true,
            fill_dirty: false,
            last_render_ms: now,
            hw,
            config,
        })
    }

    pub fn config(&self) -> &DialConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn render(&self) -> &RenderState {
        &self.render
    }

    pub fn peripherals(&self) -> &Peripherals<T, E, B, D, S, P, C, W> {
        &self.hw
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<T, E, B, D, S, P, C, W> {
        &mut self.hw
    }

    /// Give the hardware back
    pub fn release(self) -> Peripherals<T, E, B, D, S, P, C, W> {
        self.hw
    }

    /// Run until the shutdown gesture
    pub fn run(&mut self) {
        info!("control loop started");
        while self.step() != CycleOutcome::PoweredOff {}
    }

    /// Run one loop pass
    pub fn step(&mut self) -> CycleOutcome {
        let online = self.maintain_connection();
        if online {
            self.drain_inbound();
        }

        if online || self.config.behavior.offline == OfflinePolicy::LocalOnly {
            let connected = online && self.connection.state().is_connected();
            self.sync_local_input(connected);
            if self.fill_dirty {
                self.redraw_fill();
            }
        }

        // Temperature bands only change with a live session
        if online {
            self.refresh_bands();
        }

        if self.poll_button() {
            return CycleOutcome::PoweredOff;
        }

        if online {
            CycleOutcome::Ran
        } else {
            CycleOutcome::Offline
        }
    }

    /// Returns true with a usable session
    fn maintain_connection(&mut self) -> bool {
        // Picks up link loss before deciding whether a reconnect happened
        let was_connected = self.connection.connected(&mut self.hw.transport);

        let mut status_shown = false;
        let render = &mut self.render;
        let display = &mut self.hw.display;
        let on_status = |status: LinkStatus| {
            status_shown = true;
            let screen = match status {
                LinkStatus::Connecting => StatusScreen::Connecting,
                LinkStatus::Connected => StatusScreen::Connected,
                LinkStatus::Retrying => StatusScreen::Reconnecting,
            };
            if let Err(e) = render.render_status(display, screen) {
                warn!("status screen failed: {}", e);
            }
        };

        let result = match self.config.behavior.reconnect {
            ReconnectMode::Blocking => {
                self.connection
                    .ensure_connected(&mut self.hw.transport, &mut self.hw.delay, on_status)
            }
            ReconnectMode::NonBlocking => {
                let now = self.hw.clock.now_ms();
                self.connection
                    .poll_connect(&mut self.hw.transport, now, on_status)
            }
        };

        if status_shown {
            // Status screens wipe the dial face
            self.fill_dirty = true;
        }

        match result {
            Ok(()) => {
                if !was_connected {
                    self.hw.delay.delay_ms(self.config.timing.connected_splash_ms);
                }
                true
            }
            Err(_) => false,
        }
    }

    fn drain_inbound(&mut self) {
        let engine = &mut self.engine;
        let mut applied = None;

        let result = self.hw.transport.poll(&mut |topic: &str, payload: &[u8]| {
            if let RemoteOutcome::SetpointApplied(setpoint) = engine.on_remote_message(topic, payload)
            {
                applied = Some(setpoint);
            }
        });

        if let Some(setpoint) = applied {
            // Keep the encoder in step so the next read is not a local change
            self.hw.encoder.set_position(setpoint.as_position());
            self.fill_dirty = true;
        }

        if let Err(e) = result {
            let kind = e.kind();
            warn!("transport poll failed: {}", kind);
            if kind == TransportErrorKind::NotConnected {
                self.connection.link_lost();
            }
        }
    }

    fn sync_local_input(&mut self, connected: bool) {
        let position = Setpoint::clamped(self.hw.encoder.read_position());
        if position == self.engine.setpoint() && !self.force_local {
            return;
        }
        self.force_local = false;

        let change = self
            .engine
            .on_local_input_changed(position.as_position(), connected);

        self.hw
            .speaker
            .tone(self.config.ui.tone_hz, self.config.ui.tone_ms);
        self.redraw_fill();

        if let Some(payload) = change.publish {
            let topic = self.engine.setpoint_topic();
            match self.hw.transport.publish(topic, payload.as_bytes()) {
                Ok(()) => info!("published {} to {}", payload.as_str(), topic),
                // Echo flag stays armed; the next setpoint message clears it
                Err(e) => warn!("publish failed: {}", e.kind()),
            }
        }
    }

    fn redraw_fill(&mut self) {
        self.fill_dirty = false;
        if let Err(e) = self
            .render
            .render_fill(&mut self.hw.display, self.engine.setpoint())
        {
            warn!("fill redraw failed: {}", e);
        }
    }

    fn refresh_bands(&mut self) {
        if self.hw.clock.elapsed_since(self.last_render_ms) < self.config.timing.render_interval_ms {
            return;
        }
        self.last_render_ms = self.hw.clock.now_ms();

        let inside = self.engine.inside();
        let outside = self.engine.outside();
        let setpoint = self.engine.setpoint();
        let result = match self.config.behavior.band_refresh {
            BandRefresh::Always => {
                self.render
                    .render_text_bands(&mut self.hw.display, inside, outside, setpoint)
            }
            BandRefresh::OnChange => self
                .render
                .render_stale_bands(&mut self.hw.display, inside, outside, setpoint)
                .map(|_| ()),
        };
        if let Err(e) = result {
            warn!("band refresh failed: {}", e);
        }
    }

    /// Returns true once power has been cut
    fn poll_button(&mut self) -> bool {
        let pressed = match self.hw.button.is_low() {
            Ok(pressed) => pressed,
            Err(_) => {
                warn!("button read failed");
                false
            }
        };

        match self.button.update(pressed, self.hw.clock.now_ms()) {
            Some(Gesture::Click) => {
                debug!("click: reset position");
                self.hw.encoder.reset_baseline();
                self.hw
                    .encoder
                    .set_position(self.config.ui.reset_setpoint().as_position());
                self.force_local = true;
                false
            }
            Some(Gesture::LongPress) => {
                self.shutdown();
                true
            }
            None => false,
        }
    }

    fn shutdown(&mut self) {
        info!("power off");
        if let Err(e) = self
            .render
            .render_status(&mut self.hw.display, StatusScreen::PowerOff)
        {
            warn!("status screen failed: {}", e);
        }
        self.hw.delay.delay_ms(self.config.timing.shutdown_delay_ms);
        self.hw.power.power_off();
    }
}
