use std::time::Duration;

/// What the terminal delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(InputEvent),
    Resize(u16, u16),
}

/// Keys both clients react to. Everything else is dropped at the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// Ctrl+`ch`
    pub fn ctrl(ch: char) -> Self {
        Self::new(
            KeyCode::Char(ch),
            Modifiers {
                ctrl: true,
                alt: false,
            },
        )
    }

    /// `ch` typed without Ctrl or Alt.
    pub fn is_char(&self, ch: char) -> bool {
        self.typed_char() == Some(ch)
    }

    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.ctrl && self.key == KeyCode::Char(ch)
    }

    /// The printable character this key inserts into a text field, if any.
    pub fn typed_char(&self) -> Option<char> {
        match self.key {
            KeyCode::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

pub trait InputSource {
    /// Wait up to `timeout`; `None` when nothing arrived.
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_keys_are_not_text() {
        let event = InputEvent::ctrl('n');
        assert!(event.is_ctrl('n'));
        assert!(!event.is_char('n'));
        assert_eq!(event.typed_char(), None);
    }

    #[test]
    fn plain_chars_are_text() {
        let event = InputEvent::key(KeyCode::Char('q'));
        assert!(event.is_char('q'));
        assert_eq!(event.typed_char(), Some('q'));
        assert_eq!(InputEvent::key(KeyCode::Enter).typed_char(), None);
    }
}
