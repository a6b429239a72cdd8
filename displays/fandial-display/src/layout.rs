//! Screen geometry
//!
//! All positions are derived from the display size so the same layout
//! works on the 240x240 M5Dial panel and on other round displays.

use fandial_protocol::Setpoint;

use crate::backend::Region;

/// Height of band text in pixels
pub const TEXT_HEIGHT: u32 = 16;

/// Padding above and below band text
pub const BAND_PADDING: u32 = 4;

/// Offset of the outside temperature band above the centre line
const OUTSIDE_BAND_OFFSET: i32 = 80;

/// Offset of the inside temperature band above the centre line
const INSIDE_BAND_OFFSET: i32 = 60;

/// Offset of the fan label below the centre line
const LABEL_OFFSET: i32 = 40;

/// Offset of the caption below the centre line
const CAPTION_OFFSET: i32 = 80;

/// Offset of status messages above the centre line
const STATUS_OFFSET: i32 = 20;

/// Fixed-height text rows for the temperature readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextBand {
    /// Lower band, inside temperature
    Inside,
    /// Upper band, outside temperature
    Outside,
}

impl TextBand {
    /// Both bands, top to bottom
    pub const ALL: [TextBand; 2] = [TextBand::Outside, TextBand::Inside];

    /// Text shown in front of the reading
    pub fn label(&self) -> &'static str {
        match self {
            TextBand::Inside => "Inside Temp:",
            TextBand::Outside => "Outside Temp:",
        }
    }
}

/// Screen geometry for a given panel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    width: u32,
    height: u32,
}

impl Default for Layout {
    /// M5Dial panel
    fn default() -> Self {
        Self::new(240, 240)
    }
}

impl Layout {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Horizontal centre
    pub const fn center_x(&self) -> i32 {
        (self.width / 2) as i32
    }

    /// Vertical centre
    pub const fn center_y(&self) -> i32 {
        (self.height / 2) as i32
    }

    /// Height of the fill bar for a setpoint
    pub fn fill_height(&self, percentage: Setpoint) -> u32 {
        self.height * u32::from(percentage.percent()) / 100
    }

    /// Region covered by the fill bar, anchored at the bottom edge
    pub fn fill_region(&self, percentage: Setpoint) -> Region {
        let fill = self.fill_height(percentage);
        Region::new(0, (self.height - fill) as i32, self.width, fill)
    }

    /// Y coordinate of the top of a band's text
    pub const fn band_text_y(&self, band: TextBand) -> i32 {
        match band {
            TextBand::Outside => self.center_y() - OUTSIDE_BAND_OFFSET,
            TextBand::Inside => self.center_y() - INSIDE_BAND_OFFSET,
        }
    }

    /// Region repainted when a band is redrawn
    pub fn band_region(&self, band: TextBand) -> Region {
        Region::new(
            0,
            self.band_text_y(band) - BAND_PADDING as i32,
            self.width,
            TEXT_HEIGHT + 2 * BAND_PADDING,
        )
    }

    /// Returns true once the fill bar has risen to the band's text row
    pub fn band_covered(&self, band: TextBand, percentage: Setpoint) -> bool {
        self.fill_region(percentage)
            .contains_row(self.band_text_y(band))
    }

    /// Anchor of the percentage readout
    pub const fn percent_anchor(&self) -> (i32, i32) {
        (self.center_x(), self.center_y())
    }

    /// Anchor of the fan label
    pub const fn label_anchor(&self) -> (i32, i32) {
        (self.center_x(), self.center_y() + LABEL_OFFSET)
    }

    /// Anchor of the caption under the fan label
    pub const fn caption_anchor(&self) -> (i32, i32) {
        (self.center_x(), self.center_y() + CAPTION_OFFSET)
    }

    /// Anchor of full-screen status messages
    pub const fn status_anchor(&self) -> (i32, i32) {
        (self.center_x(), self.center_y() - STATUS_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_region() {
        let layout = Layout::default();
        assert_eq!(layout.fill_region(Setpoint::MIN), Region::new(0, 240, 240, 0));
        assert_eq!(layout.fill_region(Setpoint::MAX), Region::new(0, 0, 240, 240));
        assert_eq!(
            layout.fill_region(Setpoint::clamped(50)),
            Region::new(0, 120, 240, 120)
        );
        // 240 * 33 / 100 = 79.2, truncated
        assert_eq!(layout.fill_height(Setpoint::clamped(33)), 79);
    }

    #[test]
    fn test_band_geometry() {
        let layout = Layout::default();
        assert_eq!(layout.band_text_y(TextBand::Outside), 40);
        assert_eq!(layout.band_text_y(TextBand::Inside), 60);
        assert_eq!(layout.band_region(TextBand::Outside), Region::new(0, 36, 240, 24));
        assert_eq!(layout.band_region(TextBand::Inside), Region::new(0, 56, 240, 24));

        // Smallest supported panel still has both bands on screen
        let short = Layout::new(240, 200);
        for band in TextBand::ALL {
            assert!(short.band_region(band).fits_within(240, 200));
        }
    }

    #[test]
    fn test_band_covered() {
        let layout = Layout::default();
        // Inside band text row at y=60 needs fill height >= 180 (75%)
        assert!(!layout.band_covered(TextBand::Inside, Setpoint::clamped(74)));
        assert!(layout.band_covered(TextBand::Inside, Setpoint::clamped(75)));
        // Outside band at y=40 needs fill height >= 200 (84% -> 201)
        assert!(!layout.band_covered(TextBand::Outside, Setpoint::clamped(83)));
        assert!(layout.band_covered(TextBand::Outside, Setpoint::clamped(84)));
        assert!(layout.band_covered(TextBand::Outside, Setpoint::MAX));
        assert!(!layout.band_covered(TextBand::Outside, Setpoint::MIN));
    }

    #[test]
    fn test_anchors() {
        let layout = Layout::default();
        assert_eq!(layout.percent_anchor(), (120, 120));
        assert_eq!(layout.label_anchor(), (120, 160));
        assert_eq!(layout.caption_anchor(), (120, 200));
        assert_eq!(layout.status_anchor(), (120, 100));
    }
}
