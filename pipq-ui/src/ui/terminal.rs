//! Raw-mode terminal shared by the terminal client and the panel emulator.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode as CtKey, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, style::Style as RatatuiStyle, Terminal};

use super::{AppEvent, Color, InputEvent, InputSource, KeyCode, Modifiers, Rect, RenderBuf};

/// Owns the terminal between `open` and `close` (or drop).
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    pub fn open() -> io::Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Give the terminal back. Safe to call twice.
    pub fn close(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }

    /// Draw one frame on a black background.
    pub fn draw(&mut self, render: impl FnOnce(&mut RenderBuf, Rect)) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let buffer = frame.buffer_mut();
            buffer.set_style(area, RatatuiStyle::default().bg(Color::BLACK.into()));
            render(&mut RenderBuf::new(buffer), area);
        })?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl InputSource for TerminalSession {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut wait = timeout;
        loop {
            if !event::poll(wait).ok()? {
                return None;
            }
            // Only the first read waits; anything unusable is drained.
            wait = Duration::ZERO;
            match event::read().ok()? {
                Event::Key(key) => {
                    if let Some(input) = translate_key(key) {
                        return Some(AppEvent::Key(input));
                    }
                }
                Event::Resize(w, h) => return Some(AppEvent::Resize(w, h)),
                _ => {}
            }
        }
    }
}

/// Crossterm key to our key; releases and unmapped keys give `None`.
fn translate_key(event: KeyEvent) -> Option<InputEvent> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        CtKey::Char(c) => KeyCode::Char(c),
        CtKey::Enter => KeyCode::Enter,
        CtKey::Esc => KeyCode::Escape,
        CtKey::Backspace => KeyCode::Backspace,
        CtKey::Up => KeyCode::Up,
        CtKey::Down => KeyCode::Down,
        CtKey::Left => KeyCode::Left,
        CtKey::Right => KeyCode::Right,
        _ => return None,
    };
    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    };
    Some(InputEvent::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn crossterm_key(code: CtKey, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn ctrl_letters_keep_their_modifier() {
        let event = translate_key(crossterm_key(
            CtKey::Char('c'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        ));
        assert_eq!(event, Some(InputEvent::ctrl('c')));
    }

    #[test]
    fn releases_and_unmapped_keys_are_dropped() {
        let release = crossterm_key(CtKey::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate_key(release), None);
        let tab = crossterm_key(CtKey::Tab, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate_key(tab), None);
    }

    #[test]
    fn repeats_count_as_presses() {
        let repeat = crossterm_key(CtKey::Down, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(translate_key(repeat), Some(InputEvent::key(KeyCode::Down)));
    }
}
