//! Partial-redraw renderer
//!
//! `RenderState` remembers what was last drawn so callers can decide which
//! regions to repaint. The fill bar is always redrawn as a whole screen;
//! the two text bands can be repainted on their own.

use core::fmt::Write;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use fandial_protocol::{Setpoint, TextValue};
use heapless::String;

use crate::backend::{Anchor, DisplayBackend, DisplayError, Font, TextStyle};
use crate::color::{color_for, FILL_COLOR};
use crate::layout::{Layout, TextBand};

/// Maximum length of the fan label
pub const MAX_LABEL_LEN: usize = 16;

/// Caption drawn under the fan label
pub const CAPTION: &str = "Speed";

/// Background of uncovered bands and the cleared screen
const BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Full-screen status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusScreen {
    /// Session attempt in progress
    Connecting,
    /// Session established
    Connected,
    /// Attempt failed, waiting for the backoff
    Reconnecting,
    /// Shutdown gesture recognised
    PowerOff,
}

impl StatusScreen {
    /// Text shown on screen
    pub fn message(&self) -> &'static str {
        match self {
            StatusScreen::Connecting => "Connecting MQTT...",
            StatusScreen::Connected => "Connected!",
            StatusScreen::Reconnecting => "reconnecting...",
            StatusScreen::PowerOff => "power off!",
        }
    }

    fn style(&self) -> TextStyle {
        let font = match self {
            StatusScreen::Connecting => Font::Small,
            _ => Font::Medium,
        };
        TextStyle::new(font, Rgb565::GREEN, Anchor::Center)
    }
}

fn band_value<'a>(band: TextBand, inside: &'a TextValue, outside: &'a TextValue) -> &'a TextValue {
    match band {
        TextBand::Inside => inside,
        TextBand::Outside => outside,
    }
}

/// What a band looked like when last drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSnapshot {
    pub text: TextValue,
    pub background: Rgb565,
}

/// Last drawn content
///
/// `None` means the region was wiped (or never drawn) and must be repainted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub fill: Option<Setpoint>,
    pub inside: Option<BandSnapshot>,
    pub outside: Option<BandSnapshot>,
}

impl RenderSnapshot {
    fn band(&self, band: TextBand) -> Option<&BandSnapshot> {
        match band {
            TextBand::Inside => self.inside.as_ref(),
            TextBand::Outside => self.outside.as_ref(),
        }
    }

    fn band_mut(&mut self, band: TextBand) -> &mut Option<BandSnapshot> {
        match band {
            TextBand::Inside => &mut self.inside,
            TextBand::Outside => &mut self.outside,
        }
    }
}

/// Regions that differ from the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RedrawPlan {
    pub fill: bool,
    pub inside: bool,
    pub outside: bool,
}

impl RedrawPlan {
    /// Returns true if nothing needs repainting
    pub fn is_empty(&self) -> bool {
        !(self.fill || self.inside || self.outside)
    }

    /// Returns true if the given band needs repainting
    pub fn band(&self, band: TextBand) -> bool {
        match band {
            TextBand::Inside => self.inside,
            TextBand::Outside => self.outside,
        }
    }
}

/// Renderer state for the dial screen
pub struct RenderState {
    layout: Layout,
    label: String<MAX_LABEL_LEN>,
    snapshot: RenderSnapshot,
}

impl RenderState {
    /// Create a renderer for a panel layout
    ///
    /// `label` is truncated to [`MAX_LABEL_LEN`] bytes.
    pub fn new(layout: Layout, label: &str) -> Self {
        let mut end = label.len().min(MAX_LABEL_LEN);
        while !label.is_char_boundary(end) {
            end -= 1;
        }
        let mut stored = String::new();
        let _ = stored.push_str(&label[..end]);

        Self {
            layout,
            label: stored,
            snapshot: RenderSnapshot::default(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    /// Forget everything on screen (after something else drew over it)
    pub fn invalidate(&mut self) {
        self.snapshot = RenderSnapshot::default();
    }

    /// Background colour a band should have for a setpoint
    pub fn band_background(&self, band: TextBand, percentage: Setpoint) -> Rgb565 {
        if self.layout.band_covered(band, percentage) {
            color_for(percentage)
        } else {
            BACKGROUND
        }
    }

    /// Compare the desired screen with the snapshot
    pub fn plan(&self, inside: &TextValue, outside: &TextValue, percentage: Setpoint) -> RedrawPlan {
        RedrawPlan {
            fill: self.snapshot.fill != Some(percentage),
            inside: self.band_stale(TextBand::Inside, inside, percentage),
            outside: self.band_stale(TextBand::Outside, outside, percentage),
        }
    }

    fn band_stale(&self, band: TextBand, text: &TextValue, percentage: Setpoint) -> bool {
        match self.snapshot.band(band) {
            Some(drawn) => {
                drawn.text != *text || drawn.background != self.band_background(band, percentage)
            }
            None => true,
        }
    }

    /// Repaint the whole screen for a setpoint
    ///
    /// Clears the display, paints the fill bar from the bottom edge and
    /// draws the percentage, fan label and caption. The text bands are
    /// wiped in the process and must be redrawn separately.
    pub fn render_fill<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        percentage: Setpoint,
    ) -> Result<(), DisplayError> {
        self.invalidate();

        display.clear(BACKGROUND)?;

        let fill = self.layout.fill_region(percentage);
        if !fill.is_empty() {
            display.fill_rect(fill, FILL_COLOR)?;
        }

        let mut text: String<8> = String::new();
        let _ = write!(text, "{}%", percentage.percent());
        let (x, y) = self.layout.percent_anchor();
        display.draw_text(
            &text,
            x,
            y,
            TextStyle::new(Font::Large, Rgb565::GREEN, Anchor::Center),
        )?;

        let (x, y) = self.layout.label_anchor();
        display.draw_text(
            &self.label,
            x,
            y,
            TextStyle::new(Font::Large, Rgb565::WHITE, Anchor::TopCenter),
        )?;

        let (x, y) = self.layout.caption_anchor();
        display.draw_text(
            CAPTION,
            x,
            y,
            TextStyle::new(Font::Medium, Rgb565::GREEN, Anchor::TopCenter),
        )?;

        display.flush()?;
        self.snapshot.fill = Some(percentage);
        Ok(())
    }

    /// Repaint both text bands
    pub fn render_text_bands<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        inside: &TextValue,
        outside: &TextValue,
        percentage: Setpoint,
    ) -> Result<(), DisplayError> {
        for band in TextBand::ALL {
            self.render_band(display, band, band_value(band, inside, outside), percentage)?;
        }
        display.flush()
    }

    /// Repaint only the bands that differ from the snapshot
    ///
    /// Returns the plan that was carried out (the fill flag is reported but
    /// never acted upon here).
    pub fn render_stale_bands<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        inside: &TextValue,
        outside: &TextValue,
        percentage: Setpoint,
    ) -> Result<RedrawPlan, DisplayError> {
        let plan = self.plan(inside, outside, percentage);
        for band in TextBand::ALL {
            if plan.band(band) {
                self.render_band(display, band, band_value(band, inside, outside), percentage)?;
            }
        }
        if plan.inside || plan.outside {
            display.flush()?;
        }
        Ok(plan)
    }

    fn render_band<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        band: TextBand,
        value: &TextValue,
        percentage: Setpoint,
    ) -> Result<(), DisplayError> {
        let background = self.band_background(band, percentage);
        display.fill_rect(self.layout.band_region(band), background)?;

        let mut line: String<48> = String::new();
        let _ = write!(line, "{}{}\u{b0} C", band.label(), value.as_str());
        display.draw_text(
            &line,
            self.layout.center_x(),
            self.layout.band_text_y(band),
            TextStyle::new(Font::Small, Rgb565::WHITE, Anchor::TopCenter),
        )?;

        *self.snapshot.band_mut(band) = Some(BandSnapshot {
            text: value.clone(),
            background,
        });
        Ok(())
    }

    /// Show a full-screen status message
    ///
    /// Everything previously drawn is gone afterwards.
    pub fn render_status<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        screen: StatusScreen,
    ) -> Result<(), DisplayError> {
        self.invalidate();
        display.clear(BACKGROUND)?;
        let (x, y) = self.layout.status_anchor();
        display.draw_text(screen.message(), x, y, screen.style())?;
        display.flush()
    }
}
