//! Hardware seams of the six-button panel. The client only talks to these
//! traits, so the real LCD, the terminal emulator and test doubles are
//! interchangeable.

use std::io;
use std::time::Duration;

use super::buttons::{Button, ButtonEvent};
use super::frame::HatFrame;
use crate::ui::Color;

pub const LED_COUNT: usize = 6;

pub type Backlight = [Color; LED_COUNT];

pub trait DisplaySurface {
    /// Put a complete frame on the screen.
    fn show(&mut self, frame: &HatFrame) -> io::Result<()>;
}

pub trait ButtonSource {
    /// Wait up to `timeout` for the next button event.
    fn poll_button(&mut self, timeout: Duration) -> Option<(Button, ButtonEvent)>;
}

pub trait BacklightControl {
    /// Set all six backlight LEDs, left to right.
    fn set_backlight(&mut self, leds: &Backlight) -> io::Result<()>;
}

/// Everything the panel client needs from the hardware.
pub trait Panel: DisplaySurface + ButtonSource + BacklightControl {}

impl<T: DisplaySurface + ButtonSource + BacklightControl> Panel for T {}
