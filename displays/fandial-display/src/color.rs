//! Percentage to colour mapping
//!
//! The text bands are highlighted with a blue-to-green gradient once the
//! fill bar reaches them. The fill bar itself always uses [`FILL_COLOR`].

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use fandial_protocol::Setpoint;

/// Fixed colour of the fill bar
pub const FILL_COLOR: Rgb565 = Rgb565::BLUE;

/// Re-map a number from one range to another
///
/// Integer arithmetic with truncating division, as in the Arduino
/// `map()` helper. Ranges may be inverted.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Gradient colour in 8-bit components
///
/// Red stays off, blue fades out from 255 and green fades in to 255.
pub fn gradient_rgb(percentage: Setpoint) -> Rgb888 {
    let p = i32::from(percentage.percent());
    let blue = map_range(p, 0, 100, 255, 0);
    let green = map_range(p, 0, 100, 0, 255);
    Rgb888::new(0, green as u8, blue as u8)
}

/// Gradient colour in the display's native format
pub fn color_for(percentage: Setpoint) -> Rgb565 {
    Rgb565::from(gradient_rgb(percentage))
}
