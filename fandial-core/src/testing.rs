//! Mock collaborators shared by the unit tests

extern crate std;

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use fandial_display::{DisplayBackend, DisplayError, Region, Rgb565, TextStyle};
use fandial_hal::{Clock, Credentials, PowerControl, RotaryEncoder, Speaker, Transport, TransportErrorKind};

/// Scriptable broker connection
#[derive(Default)]
pub struct MockTransport {
    /// Results handed out by successive connects; empty means success
    pub connect_results: VecDeque<Result<(), TransportErrorKind>>,
    /// Topic whose subscription fails
    pub fail_subscribe: Option<&'static str>,
    pub fail_publish: bool,
    /// Error returned by the next poll
    pub fail_poll: Option<TransportErrorKind>,
    /// Loop publishes back like a broker does for subscribed topics
    pub echo: bool,
    pub connected: bool,
    pub client_id: Option<String>,
    pub credentials: Option<(String, String)>,
    pub subscribed: Vec<String>,
    pub published: Vec<(String, String)>,
    /// Messages delivered on the next poll
    pub inbox: VecDeque<(String, Vec<u8>)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        self.inbox.push_back((topic.to_string(), payload.to_vec()));
    }

    pub fn published_to(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }
}

impl Transport for MockTransport {
    type Error = TransportErrorKind;

    fn connect(
        &mut self,
        client_id: &str,
        credentials: Option<Credentials<'_>>,
    ) -> Result<(), Self::Error> {
        self.client_id = Some(client_id.to_string());
        self.credentials =
            credentials.map(|c| (c.username.to_string(), c.password.to_string()));
        let result = self.connect_results.pop_front().unwrap_or(Ok(()));
        self.connected = result.is_ok();
        result
    }

    fn subscribe(&mut self, channel: &str) -> Result<(), Self::Error> {
        if self.fail_subscribe.map_or(false, |t| t == channel) {
            return Err(TransportErrorKind::Io);
        }
        self.subscribed.push(channel.to_string());
        Ok(())
    }

    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(TransportErrorKind::NotConnected);
        }
        if self.fail_publish {
            return Err(TransportErrorKind::Io);
        }
        self.published.push((
            channel.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        if self.echo && self.subscribed.iter().any(|s| s == channel) {
            self.deliver(channel, payload);
        }
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn poll(&mut self, on_message: &mut dyn FnMut(&str, &[u8])) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(TransportErrorKind::NotConnected);
        }
        if let Some(kind) = self.fail_poll.take() {
            return Err(kind);
        }
        while let Some((topic, payload)) = self.inbox.pop_front() {
            on_message(&topic, &payload);
        }
        Ok(())
    }
}

/// Millisecond time shared by the clock and delay mocks
#[derive(Clone, Default)]
pub struct SharedTime(Rc<Cell<u32>>);

impl SharedTime {
    pub fn now(&self) -> u32 {
        self.0.get()
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

pub struct MockClock(pub SharedTime);

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.0.now()
    }
}

/// Delay that advances shared time instead of sleeping
pub struct MockDelay {
    time: SharedTime,
    total_ms: u32,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::with_time(SharedTime::default())
    }

    pub fn with_time(time: SharedTime) -> Self {
        Self { time, total_ms: 0 }
    }

    pub fn total_ms(&self) -> u32 {
        self.total_ms
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ms(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
        self.time.advance(ms);
    }
}

#[derive(Default)]
pub struct MockEncoder {
    pub position: i32,
    pub writes: Vec<i32>,
}

impl RotaryEncoder for MockEncoder {
    fn read_position(&mut self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
        self.writes.push(position);
    }
}

/// Active-low push button
#[derive(Default)]
pub struct MockButton {
    pub pressed: bool,
}

impl ErrorType for MockButton {
    type Error = core::convert::Infallible;
}

impl InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed)
    }
}

#[derive(Default)]
pub struct MockSpeaker {
    pub tones: Vec<(u32, u32)>,
}

impl Speaker for MockSpeaker {
    fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.tones.push((freq_hz, duration_ms));
    }
}

#[derive(Default)]
pub struct MockPower {
    pub off: bool,
}

impl PowerControl for MockPower {
    fn power_off(&mut self) {
        self.off = true;
    }
}

/// Display that records drawn text
pub struct MockDisplay {
    pub size: (u32, u32),
    pub texts: Vec<String>,
    pub fills: Vec<(Region, Rgb565)>,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self {
            size: (240, 240),
            texts: Vec::new(),
            fills: Vec::new(),
        }
    }
}

impl MockDisplay {
    /// Forget everything drawn so far
    pub fn take_texts(&mut self) -> Vec<String> {
        self.fills.clear();
        core::mem::take(&mut self.texts)
    }

    pub fn shows(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }
}

impl DisplayBackend for MockDisplay {
    fn clear(&mut self, _color: Rgb565) -> Result<(), DisplayError> {
        Ok(())
    }

    fn fill_rect(&mut self, region: Region, color: Rgb565) -> Result<(), DisplayError> {
        self.fills.push((region, color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        _x: i32,
        _y: i32,
        _style: TextStyle,
    ) -> Result<(), DisplayError> {
        self.texts.push(text.to_string());
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.size
    }
}
