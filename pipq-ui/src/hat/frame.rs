//! 128x64 monochrome frame and the drawing helpers the panel screens use.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;

/// Advance of one glyph in the panel font.
pub const CHAR_WIDTH: i32 = 6;

/// Rendered width of `text` in pixels.
pub fn text_width(text: &str) -> i32 {
    i32::try_from(text.chars().count())
        .unwrap_or(i32::MAX / CHAR_WIDTH)
        .saturating_mul(CHAR_WIDTH)
}

#[derive(Clone, PartialEq, Eq)]
pub struct HatFrame {
    pixels: Vec<bool>,
}

impl HatFrame {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; WIDTH * HEIGHT],
        }
    }

    pub fn clear_all(&mut self) {
        self.pixels.fill(false);
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Off-screen parts are clipped.
    pub fn text(&mut self, text: &str, x: i32, y: i32, inverted: bool) {
        let color = if inverted { BinaryColor::Off } else { BinaryColor::On };
        let style = MonoTextStyle::new(&FONT_6X10, color);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Draw a text line that may be scrolling: the copy at `x - offset`, and a
    /// second copy one text width plus `gap` further right once scrolling has
    /// started, so the loop is seamless.
    pub fn marquee_text(&mut self, text: &str, x: i32, y: i32, offset: i32, gap: i32, inverted: bool) {
        let start = x - offset;
        self.text(text, start, y, inverted);
        if offset > 0 {
            let wrap_x = start + text_width(text) + gap;
            if wrap_x < WIDTH as i32 {
                self.text(text, wrap_x, y, inverted);
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(self);
    }
}

impl Default for HatFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HatFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HatFrame({} lit)", self.lit_pixels())
    }
}

impl OriginDimensions for HatFrame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for HatFrame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x < WIDTH && y < HEIGHT {
                self.pixels[y * WIDTH + x] = color.is_on();
            }
        }
        Ok(())
    }
}
