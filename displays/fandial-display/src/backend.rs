//! Display backend trait
//!
//! Defines the region-scoped primitives the renderer needs.

use embedded_graphics::pixelcolor::Rgb565;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The draw target rejected the operation
    Communication,
    /// Region extends past the panel edges
    InvalidCoordinates,
}

/// Rectangular screen region in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the horizontal line `y` falls inside the region
    pub fn contains_row(&self, y: i32) -> bool {
        y >= self.y && y < self.y + self.height as i32
    }

    /// Returns true if the region lies within a `width` x `height` panel
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = u32::try_from(self.x)
            .ok()
            .and_then(|x| x.checked_add(self.width));
        let bottom = u32::try_from(self.y)
            .ok()
            .and_then(|y| y.checked_add(self.height));
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

/// Font size classes
///
/// Backends pick concrete fonts; the renderer only distinguishes sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Band text and connection progress (~8x16)
    Small,
    /// Captions and status messages (~24 px)
    Medium,
    /// Percentage readout and fan label (~32 px)
    Large,
}

/// Which point of the text box the coordinates refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    /// Horizontal and vertical centre
    Center,
    /// Horizontal centre, top edge
    TopCenter,
}

/// Text rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Rgb565,
    pub anchor: Anchor,
}

impl TextStyle {
    pub const fn new(font: Font, color: Rgb565, anchor: Anchor) -> Self {
        Self {
            font,
            color,
            anchor,
        }
    }
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to displays.
/// Implementations handle the specifics of TFT controllers or framebuffers.
pub trait DisplayBackend {
    /// Fill the entire display with one colour
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(&mut self, region: Region, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw text anchored at `(x, y)`
    ///
    /// Only glyph pixels are drawn; the background is left untouched.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle)
        -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    ///
    /// For displays without internal buffers this is a no-op.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Get the pixel dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32);
}
