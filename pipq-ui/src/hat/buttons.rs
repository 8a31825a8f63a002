use std::time::{Duration, Instant};

/// The six capacitive buttons, in the panel's channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Back,
    Left,
    Enter,
    Right,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Up,
        Button::Down,
        Button::Back,
        Button::Left,
        Button::Enter,
        Button::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            Button::Up => 0,
            Button::Down => 1,
            Button::Back => 2,
            Button::Left => 3,
            Button::Enter => 4,
            Button::Right => 5,
        }
    }
}

/// `Held` repeats for as long as the button stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    Held,
    Release,
}

/// `Held` events needed before a held button acts.
pub const HELD_THRESHOLD: u32 = 2;

/// Window after a navigation press during which Enter releases are ignored.
pub const SUPPRESSION_WINDOW: Duration = Duration::from_millis(300);

/// Ignores an Enter release that lands right after a navigation press, which
/// is usually a thumb brushing the middle button.
#[derive(Debug, Clone)]
pub struct ButtonSuppression {
    window: Duration,
    last_trigger: Option<Instant>,
}

impl ButtonSuppression {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_trigger: None,
        }
    }

    pub fn record(&mut self, now: Instant) {
        self.last_trigger = Some(now);
    }

    pub fn allow_action(&self, now: Instant) -> bool {
        match self.last_trigger {
            Some(at) => now.saturating_duration_since(at) >= self.window,
            None => true,
        }
    }
}

impl Default for ButtonSuppression {
    fn default() -> Self {
        Self::new(SUPPRESSION_WINDOW)
    }
}

/// Per-button count of `Held` events since the last press.
#[derive(Debug, Clone, Default)]
pub struct HeldCounter {
    counts: [u32; 6],
}

impl HeldCounter {
    pub fn reset(&mut self, button: Button) {
        self.counts[button.index()] = 0;
    }

    pub fn reset_all(&mut self) {
        self.counts = [0; 6];
    }

    /// Count one `Held` event; true once the threshold is reached.
    pub fn held(&mut self, button: Button) -> bool {
        let count = &mut self.counts[button.index()];
        *count = count.saturating_add(1);
        *count >= HELD_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppression_blocks_inside_window() {
        let start = Instant::now();
        let mut suppression = ButtonSuppression::default();
        assert!(suppression.allow_action(start));

        suppression.record(start);
        assert!(!suppression.allow_action(start + Duration::from_millis(100)));
        assert!(suppression.allow_action(start + Duration::from_millis(300)));
    }

    #[test]
    fn held_counter_fires_from_second_event() {
        let mut held = HeldCounter::default();
        assert!(!held.held(Button::Down));
        assert!(held.held(Button::Down));
        assert!(held.held(Button::Down));
        assert!(!held.held(Button::Up));

        held.reset(Button::Down);
        assert!(!held.held(Button::Down));
    }

    #[test]
    fn channel_order_matches_index() {
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
    }
}
