//! `embedded-graphics` adapter
//!
//! Wraps any RGB565 draw target (a TFT driver such as the GC9A01 on the
//! M5Dial, or a framebuffer) and implements [`DisplayBackend`] on it.

use embedded_graphics::mono_font::{ascii, iso_8859_1, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::backend::{Anchor, DisplayBackend, DisplayError, Font, Region, TextStyle};

/// Band text needs the degree sign, hence the Latin-1 variant
fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &iso_8859_1::FONT_8X13,
        Font::Medium => &ascii::FONT_9X18_BOLD,
        Font::Large => &ascii::FONT_10X20,
    }
}

fn baseline(anchor: Anchor) -> Baseline {
    match anchor {
        Anchor::Center => Baseline::Middle,
        Anchor::TopCenter => Baseline::Top,
    }
}

/// Display backend over an `embedded-graphics` draw target
pub struct GraphicsBackend<D> {
    target: D,
}

impl<D> GraphicsBackend<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Get access to the underlying draw target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Get mutable access to the underlying draw target
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Unwrap the draw target
    pub fn release(self) -> D {
        self.target
    }
}

impl<D> DisplayBackend for GraphicsBackend<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.target
            .clear(color)
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(&mut self, region: Region, color: Rgb565) -> Result<(), DisplayError> {
        if region.is_empty() {
            return Ok(());
        }
        let size = self.target.size();
        if !region.fits_within(size.width, size.height) {
            return Err(DisplayError::InvalidCoordinates);
        }
        Rectangle::new(
            Point::new(region.x, region.y),
            Size::new(region.width, region.height),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(&mut self.target)
        .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        let character_style = MonoTextStyle::new(mono_font(style.font), style.color);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(baseline(style.anchor))
            .build();

        Text::with_text_style(text, Point::new(x, y), character_style, text_style)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u32, u32) {
        let size = self.target.size();
        (size.width, size.height)
    }
}
