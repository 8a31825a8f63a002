//! Terminal stand-in for the six-button panel.
//!
//! The LCD is drawn with half-block glyphs (two pixel rows per terminal row),
//! tinted by the LED above each sixth of the screen. Keys map to buttons:
//! arrows, Enter, Esc/Backspace for Back, and Space for a long Enter press.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::buttons::{Button, ButtonEvent};
use super::frame::{HatFrame, HEIGHT, WIDTH};
use super::panel::{Backlight, BacklightControl, ButtonSource, DisplaySurface, LED_COUNT};
use crate::ui::layout_helpers::center_rect;
use crate::ui::{AppEvent, Color, InputEvent, InputSource, KeyCode, Rect, RenderBuf, Style, TerminalSession};

const PIXEL_ON: Color = Color::new(16, 16, 16);

/// What a key press stands for on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatedInput {
    Buttons(Vec<(Button, ButtonEvent)>),
    Quit,
    Ignored,
}

fn tap(button: Button) -> EmulatedInput {
    EmulatedInput::Buttons(vec![(button, ButtonEvent::Press), (button, ButtonEvent::Release)])
}

/// Terminals report no key releases, so every key becomes a complete press.
pub fn map_key(event: &InputEvent) -> EmulatedInput {
    if event.is_ctrl('c') || event.is_char('q') {
        return EmulatedInput::Quit;
    }
    match event.key {
        KeyCode::Up => tap(Button::Up),
        KeyCode::Down => tap(Button::Down),
        KeyCode::Left => tap(Button::Left),
        KeyCode::Right => tap(Button::Right),
        KeyCode::Enter => tap(Button::Enter),
        KeyCode::Escape | KeyCode::Backspace => tap(Button::Back),
        KeyCode::Char(' ') => EmulatedInput::Buttons(vec![
            (Button::Enter, ButtonEvent::Press),
            (Button::Enter, ButtonEvent::Held),
            (Button::Enter, ButtonEvent::Held),
            (Button::Enter, ButtonEvent::Release),
        ]),
        _ => EmulatedInput::Ignored,
    }
}

pub struct TerminalPanel {
    terminal: TerminalSession,
    leds: Backlight,
    pending: VecDeque<(Button, ButtonEvent)>,
    quit: Arc<AtomicBool>,
}

impl TerminalPanel {
    /// Take over the terminal. `q` or Ctrl-C raise `quit`.
    pub fn new(quit: Arc<AtomicBool>) -> io::Result<Self> {
        Ok(Self {
            terminal: TerminalSession::open()?,
            leds: [Color::BLACK; LED_COUNT],
            pending: VecDeque::new(),
            quit,
        })
    }
}

/// LED covering column `x` of the LCD.
fn led_for_column(x: usize) -> usize {
    (x * LED_COUNT / WIDTH).min(LED_COUNT - 1)
}

fn draw_panel(buf: &mut RenderBuf, area: Rect, frame: &HatFrame, leds: &Backlight) {
    let rows = (HEIGHT / 2) as u16;
    let outer = center_rect(area, WIDTH as u16 + 2, rows + 5);
    let border = Style::new().fg(Color::GRAY);
    let inner = buf.draw_block(outer, " Pi-Pianoteq ", border, border.bold());

    for row in 0..rows.min(inner.height) {
        for col in 0..(WIDTH as u16).min(inner.width) {
            let x = usize::from(col);
            let y = usize::from(row) * 2;
            let backlight = leds[led_for_column(x)];
            let upper = if frame.pixel(x, y) { PIXEL_ON } else { backlight };
            let lower = if frame.pixel(x, y + 1) { PIXEL_ON } else { backlight };
            buf.set_cell(inner.x + col, inner.y + row, '▀', Style::new().fg(upper).bg(lower));
        }
    }

    let help_y = inner.y + rows + 1;
    if help_y < inner.y + inner.height {
        buf.draw_str(
            inner.x,
            help_y,
            " arrows: navigate  enter: select  space: long press  esc: back  q: quit",
            Style::new().fg(Color::DARK_GRAY),
        );
    }
}

impl DisplaySurface for TerminalPanel {
    fn show(&mut self, frame: &HatFrame) -> io::Result<()> {
        let leds = self.leds;
        self.terminal.draw(|buf, area| draw_panel(buf, area, frame, &leds))
    }
}

impl BacklightControl for TerminalPanel {
    /// Stored and applied with the next `show`.
    fn set_backlight(&mut self, leds: &Backlight) -> io::Result<()> {
        self.leds = *leds;
        Ok(())
    }
}

impl ButtonSource for TerminalPanel {
    fn poll_button(&mut self, timeout: Duration) -> Option<(Button, ButtonEvent)> {
        if let Some(next) = self.pending.pop_front() {
            return Some(next);
        }
        let AppEvent::Key(event) = self.terminal.poll_event(timeout)? else {
            return None;
        };
        match map_key(&event) {
            EmulatedInput::Buttons(events) => {
                self.pending.extend(events);
                self.pending.pop_front()
            }
            EmulatedInput::Quit => {
                self.quit.store(true, Ordering::SeqCst);
                None
            }
            EmulatedInput::Ignored => None,
        }
    }
}
